//! VocabStore - file-backed wildcard vocabulary
//!
//! Maps wildcard names and `*` glob patterns to ordered candidate line
//! lists, merging two on-disk sources into one flat namespace under a
//! root directory.
//!
//! # Layout
//!
//! ```text
//! wildcards/
//! ├── color.txt            # entry "color", one candidate per line
//! ├── poses/
//! │   ├── style_action.txt # entry "poses/style_action"
//! │   └── style_dynamic.txt
//! └── styles.yaml          # nested mappings; each list leaf becomes an
//!                          # entry named by its slash-joined key path
//! ```
//!
//! `.txt` files contribute one entry each (blank and `#`-prefixed lines
//! excluded); YAML files are flattened once per store lifetime, and their
//! entries shadow same-named `.txt` files. Lookups are cached for the
//! lifetime of the store - including not-found results - so a vocabulary
//! edit made after first lookup of a name is not observed until
//! [`VocabStore::set_root`]/[`VocabStore::reset_root`].
//!
//! # Example
//!
//! ```ignore
//! use vocabstore::VocabStore;
//!
//! let store = VocabStore::open("wildcards")?;
//! let lines = store.lines("poses/style_*");
//! let names = store.all_names();
//! ```

pub mod cli;
mod store;

pub use store::{StoreError, StoreStats, VocabStore};

/// Default vocabulary root directory, relative to the working directory
pub const DEFAULT_ROOT: &str = "wildcards";
