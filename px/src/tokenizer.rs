//! Prompt tokenization
//!
//! Splits raw prompt text into top-level comma-separated segments while
//! respecting `{}` and `()` nesting. This is the single source of truth
//! for tokenization; per-segment enable/disable filtering composes on top
//! of it.

use tracing::debug;

/// Prefix glyph marking a token as disabled (U+1F512 LOCK).
pub const DISABLED_TOKEN_PREFIX: &str = "\u{1F512}";

/// Split a prompt into top-level tokens.
///
/// Carriage returns and line feeds are treated as commas. A comma only
/// delimits when both the `{}` depth and the `()` depth are zero; the two
/// depths are tracked independently with plain counters and deliberately
/// not clamped, so unbalanced brackets never fail - a stray closer drives
/// its depth negative and suppresses splitting until matching openers
/// recover it. Each token is trimmed; empty tokens are dropped.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    if input.is_empty() {
        return tokens;
    }

    let mut current = String::new();
    let mut brace_depth: i32 = 0;
    let mut paren_depth: i32 = 0;

    for c in input.chars() {
        let c = if c == '\r' || c == '\n' { ',' } else { c };
        match c {
            '{' => {
                brace_depth += 1;
                current.push(c);
            }
            '}' => {
                brace_depth -= 1;
                current.push(c);
            }
            '(' => {
                paren_depth += 1;
                current.push(c);
            }
            ')' => {
                paren_depth -= 1;
                current.push(c);
            }
            ',' if brace_depth == 0 && paren_depth == 0 => {
                let token = current.trim();
                if !token.is_empty() {
                    tokens.push(token.to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }

    let token = current.trim();
    if !token.is_empty() {
        tokens.push(token.to_string());
    }

    tokens
}

/// Drop tokens marked disabled and rejoin the enabled ones with `", "`.
pub fn filter_disabled(tokens: &[String]) -> String {
    let enabled: Vec<&str> = tokens
        .iter()
        .map(String::as_str)
        .filter(|t| !t.starts_with(DISABLED_TOKEN_PREFIX))
        .collect();
    debug!(
        total = tokens.len(),
        enabled = enabled.len(),
        "filter_disabled: rejoining enabled tokens"
    );
    enabled.join(", ")
}
