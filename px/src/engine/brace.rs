//! Brace expression grammar
//!
//! The text between `{` and `}` is a quantified random choice:
//! an optional `N$$` or `N-M$$` quantifier, an optional custom separator
//! terminated by a further `$$`, then a `|`-separated choice list.
//! Parsing never fails; malformed pieces degrade to defaults.

use regex::Regex;
use tracing::debug;

/// Default separator joining multiple picks
pub const DEFAULT_SEPARATOR: &str = ", ";

/// One entry of a brace expression's choice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Verbatim text, one pool entry
    Literal(String),
    /// An item exactly of the form `__name__`; every candidate line of
    /// `name` is flattened into the pool at evaluation time
    Wildcard(String),
}

/// Compiled patterns for brace parsing, built once per expander
#[derive(Debug)]
pub struct BracePatterns {
    /// `N$$` / `N-M$$` prefix; the remainder is capture 3
    quantifier: Regex,
    /// An item that is exactly `__name__`
    wildcard_item: Regex,
}

impl BracePatterns {
    pub fn new() -> Self {
        Self {
            // The remainder is matched without DOTALL: content after a
            // newline does not survive a quantifier match.
            quantifier: Regex::new(r"^(\d+)(?:-(\d+))?\$\$(.+)").expect("static pattern compiles"),
            wildcard_item: Regex::new(r"^__([\s\S]+?)__$").expect("static pattern compiles"),
        }
    }
}

impl Default for BracePatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Parsed form of the text between `{` and `}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraceExpr {
    /// Minimum number of picks
    pub min: usize,
    /// Maximum number of picks (equals `min` when the quantifier has no
    /// range part)
    pub max: usize,
    /// Separator joining the picks
    pub separator: String,
    /// Ordered choice list
    pub choices: Vec<Choice>,
}

impl BraceExpr {
    /// Parse brace content.
    ///
    /// Never fails: a quantifier whose numbers do not fit a `usize`
    /// silently falls back to a single pick, and a missing separator
    /// falls back to [`DEFAULT_SEPARATOR`].
    pub fn parse(content: &str, patterns: &BracePatterns) -> Self {
        let (min, max, rest) = match patterns.quantifier.captures(content) {
            Some(caps) => {
                let rest = caps.get(3).map_or("", |m| m.as_str());
                let min: Option<usize> = caps[1].parse().ok();
                let max: Option<usize> = match caps.get(2) {
                    Some(m) => m.as_str().parse().ok(),
                    None => min,
                };
                match (min, max) {
                    (Some(min), Some(max)) => (min, max, rest),
                    _ => {
                        debug!(%content, "BraceExpr::parse: unparseable quantifier, defaulting to one pick");
                        (1, 1, rest)
                    }
                }
            }
            None => (1, 1, content),
        };

        let (separator, choices_text) = match rest.split_once("$$") {
            Some((sep, rest)) => (sep.to_string(), rest),
            None => (DEFAULT_SEPARATOR.to_string(), rest),
        };

        let choices = choices_text
            .split('|')
            .map(str::trim)
            .map(|item| match patterns.wildcard_item.captures(item) {
                Some(caps) => Choice::Wildcard(caps[1].to_string()),
                None => Choice::Literal(item.to_string()),
            })
            .collect();

        Self {
            min,
            max,
            separator,
            choices,
        }
    }
}
