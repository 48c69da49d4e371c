//! promptx - seeded wildcard prompt expansion
//!
//! Turns a prompt containing `__name__` wildcard references and `{...}`
//! stochastic choice spans into a fully resolved string, deterministically
//! for a given `(prompt, seed, vocabulary)` triple. Candidate lines come
//! from a [`vocabstore::VocabStore`] rooted at a directory of `.txt` and
//! YAML files.
//!
//! # Syntax
//!
//! ```text
//! __color__               one random line from wildcards/color.txt
//! __poses/style_*__       one random line across every matching name
//! {red|green|blue}        one random item
//! {2$$a|b|c}              exactly two distinct items, joined with ", "
//! {1-3$$ and $$a|b|c}     one to three items, joined with " and "
//! {art|__color__}         wildcard lines flatten into the choice pool
//! ```
//!
//! Wildcard lines may themselves contain further syntax; rewriting
//! iterates to a fixpoint, capped (default 100 iterations) so mutually
//! recursive vocabularies terminate with a partial result instead of
//! hanging.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use promptx::Expander;
//! use vocabstore::VocabStore;
//!
//! let store = Arc::new(VocabStore::open("wildcards")?);
//! let mut expander = Expander::new(store, 42);
//! let resolved = expander.process("a {2$$__medium__|photo} of __subject__");
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - bracket-aware top-level prompt splitting
//! - [`engine`] - the seeded rewrite loop and brace grammar
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod engine;
pub mod tokenizer;

// Re-export commonly used types
pub use config::Config;
pub use engine::{BraceExpr, BracePatterns, Choice, DEFAULT_MAX_ITERATIONS, DEFAULT_SEPARATOR, Expander};
pub use tokenizer::{DISABLED_TOKEN_PREFIX, filter_disabled, tokenize};
