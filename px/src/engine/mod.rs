//! Seeded prompt expansion
//!
//! The rewrite loop applies two rules per iteration - every non-nested
//! `{...}` span, then every `__...__` span - until the string stops
//! changing or an iteration cap is hit. Brace content may surface new
//! wildcard references and wildcard lines may surface new brace syntax,
//! so the two rules interleave across iterations rather than running to
//! their own fixpoints independently.

mod brace;

pub use brace::{BraceExpr, BracePatterns, Choice, DEFAULT_SEPARATOR};

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use regex::{Captures, Regex};
use tracing::{debug, warn};
use vocabstore::VocabStore;

/// Default cap on rewrite iterations before giving up on a fixpoint
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Seeded, single-use prompt rewriter.
///
/// Construction is cheap; build one per `(prompt, seed)` call. The
/// vocabulary store handle is shared and long-lived, the PRNG is not:
/// sharing an expander across threads would interleave draws and break
/// seed reproducibility.
pub struct Expander {
    store: Arc<VocabStore>,
    rng: StdRng,
    max_iterations: usize,
    /// Innermost `{...}` spans; does not recurse into nested braces
    /// within one pass
    brace_re: Regex,
    /// `__...__` spans, shortest match
    wildcard_re: Regex,
    patterns: BracePatterns,
}

impl Expander {
    /// Create an expander over `store`, seeding the PRNG with the full
    /// 64-bit seed.
    pub fn new(store: Arc<VocabStore>, seed: i64) -> Self {
        debug!(seed, "Expander::new: called");
        Self {
            store,
            rng: StdRng::seed_from_u64(seed as u64),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            brace_re: Regex::new(r"\{([^{}]+)\}").expect("static pattern compiles"),
            wildcard_re: Regex::new(r"__([\s\S]+?)__").expect("static pattern compiles"),
            patterns: BracePatterns::new(),
        }
    }

    /// Override the fixpoint iteration cap.
    pub fn with_max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = cap;
        self
    }

    /// Resolve every `{...}` and `__...__` span in `input`.
    ///
    /// Returns the first fixpoint, or the last computed string when the
    /// iteration cap is exhausted (mutually recursive vocabularies). The
    /// capped case logs a warning naming the original input and the
    /// partial result; it never returns an error.
    pub fn process(&mut self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }

        let mut current = input.to_string();
        for iteration in 0..self.max_iterations {
            let next = self.rewrite_once(&current);
            if next == current {
                debug!(iteration, "Expander::process: fixpoint reached");
                return next;
            }
            current = next;
        }

        warn!(
            original = %input,
            partial = %current,
            cap = self.max_iterations,
            "expansion did not reach a fixpoint within the iteration cap, returning partial result"
        );
        current
    }

    /// One full brace pass followed by one full wildcard pass.
    fn rewrite_once(&mut self, input: &str) -> String {
        let brace_re = self.brace_re.clone();
        let wildcard_re = self.wildcard_re.clone();

        let pass1 = brace_re.replace_all(input, |caps: &Captures| self.eval_brace(&caps[1]));
        wildcard_re
            .replace_all(&pass1, |caps: &Captures| self.eval_wildcard(caps[1].trim()))
            .into_owned()
    }

    /// Evaluate the content of one `{...}` span.
    fn eval_brace(&mut self, content: &str) -> String {
        let expr = BraceExpr::parse(content, &self.patterns);

        // The draw is over flattened candidate lines, not over items: a
        // wildcard item contributes every one of its lines to the pool.
        let mut pool: Vec<String> = Vec::new();
        for choice in &expr.choices {
            match choice {
                Choice::Literal(text) => pool.push(text.clone()),
                Choice::Wildcard(name) => pool.extend(self.store.lines(name).iter().cloned()),
            }
        }

        if pool.is_empty() {
            return String::new();
        }

        let (mut min, mut max) = (expr.min, expr.max);
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        let lo = min.min(pool.len());
        let hi = max.min(pool.len());
        let count = self.rng.random_range(lo..=hi);

        // Shuffle then truncate: `count` picks without replacement
        pool.shuffle(&mut self.rng);
        pool.truncate(count);
        pool.join(&expr.separator)
    }

    /// Evaluate one standalone `__name__` reference.
    fn eval_wildcard(&mut self, name: &str) -> String {
        let lines = self.store.lines(name);
        match lines.choose(&mut self.rng) {
            Some(line) => line.clone(),
            // Unknown names stay visible as literal text
            None => format!("__{name}__"),
        }
    }
}
