//! Core VocabStore implementation

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use regex::{Regex, RegexBuilder};
use serde_yaml::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Errors from the store's own seams. Lookup paths never surface these:
/// read and parse failures are logged and degrade to empty entries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Aggregate statistics over every known name
#[derive(Debug, Clone)]
pub struct StoreStats {
    /// Distinct known names
    pub name_count: usize,
    /// Candidate lines summed across all names
    pub candidate_count: usize,
}

/// Mutable store state, all behind one lock so a root swap is atomic
struct State {
    root: PathBuf,
    /// Keyed by the literal requested name or glob string; populated at
    /// most once per key, not-found cached as empty
    content: HashMap<String, Arc<Vec<String>>>,
    /// Deduplicated, sorted list of every known name; lazy, glob-only
    names: Option<Arc<Vec<String>>>,
    yaml_ingested: bool,
}

/// The vocabulary store.
///
/// An explicit object rather than process-global state: construct one,
/// share it behind `Arc`, and inject the handle wherever lookups happen.
/// All cache mutation is first-writer-wins; entries are immutable until
/// [`set_root`](VocabStore::set_root) or
/// [`reset_root`](VocabStore::reset_root) drops every cache at once.
pub struct VocabStore {
    default_root: PathBuf,
    state: RwLock<State>,
}

impl VocabStore {
    /// Open a store rooted at `root`, creating the directory if missing.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        debug!(?root, "opened vocabulary store");
        Ok(Self {
            default_root: root.clone(),
            state: RwLock::new(State {
                root,
                content: HashMap::new(),
                names: None,
                yaml_ingested: false,
            }),
        })
    }

    /// Candidate lines for a wildcard name or `*` glob pattern.
    ///
    /// The result is cached under the literal requested string for the
    /// lifetime of the store; an unknown name caches (and returns) an
    /// empty list. This never fails - read and parse problems degrade to
    /// empty entries.
    pub fn lines(&self, pattern: &str) -> Arc<Vec<String>> {
        // YAML entries must be resident before any lookup completes, so
        // they shadow same-named .txt files.
        self.ensure_yaml_ingested();

        if let Some(cached) = self.read_state().content.get(pattern) {
            return Arc::clone(cached);
        }

        if pattern.contains('*') {
            let lines = self.lines_from_glob(pattern);
            let mut state = self.write_state();
            Arc::clone(state.content.entry(pattern.to_string()).or_insert(lines))
        } else {
            self.lookup_name(pattern, true)
        }
    }

    /// Every known wildcard name, deduplicated and sorted.
    ///
    /// Built lazily once per root from a recursive `.txt` scan plus every
    /// key already resident in the content cache (which by then includes
    /// all YAML-derived names). Only glob resolution consults this.
    pub fn all_names(&self) -> Arc<Vec<String>> {
        self.ensure_yaml_ingested();

        if let Some(names) = &self.read_state().names {
            return Arc::clone(names);
        }

        let mut state = self.write_state();
        if let Some(names) = &state.names {
            // Another thread built the index while we waited
            return Arc::clone(names);
        }

        let mut names = BTreeSet::new();
        for entry in WalkDir::new(&state.root).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("txt") {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(&state.root) {
                names.insert(path_to_name(&rel.with_extension("")));
            }
        }
        names.extend(state.content.keys().cloned());

        let names = Arc::new(names.into_iter().collect::<Vec<_>>());
        state.names = Some(Arc::clone(&names));
        debug!(count = names.len(), "built wildcard name index");
        names
    }

    /// Names matching a `*` glob pattern, in sorted order.
    pub fn matching_names(&self, pattern: &str) -> Vec<String> {
        let names = self.all_names();
        match glob_regex(pattern) {
            Some(regex) => names.iter().filter(|name| regex.is_match(name)).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Aggregate statistics over every known name.
    pub fn stats(&self) -> StoreStats {
        let names = self.all_names();
        let candidate_count = names.iter().map(|name| self.lines(name).len()).sum();
        StoreStats {
            name_count: names.len(),
            candidate_count,
        }
    }

    /// The currently active root directory.
    pub fn root(&self) -> PathBuf {
        self.read_state().root.clone()
    }

    /// Point the store at a different root and drop every cache.
    ///
    /// The swap happens under one write lock, so no lookup can observe
    /// the new root with stale entries. Intended for tests and for
    /// embedders that relocate the vocabulary at runtime.
    pub fn set_root(&self, root: impl AsRef<Path>) {
        let mut state = self.write_state();
        state.root = root.as_ref().to_path_buf();
        state.content.clear();
        state.names = None;
        state.yaml_ingested = false;
        info!(root = %state.root.display(), "vocabulary root overridden, caches cleared");
    }

    /// Restore the root this store was opened with and drop every cache.
    pub fn reset_root(&self) {
        let mut state = self.write_state();
        state.root = self.default_root.clone();
        state.content.clear();
        state.names = None;
        state.yaml_ingested = false;
        info!(root = %state.root.display(), "vocabulary root restored, caches cleared");
    }

    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().expect("vocab store lock poisoned")
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().expect("vocab store lock poisoned")
    }

    /// Parse every YAML file under the root into the content cache, once
    /// per store lifetime. Double-checked: the cheap read-lock probe is
    /// re-verified under the write lock, so concurrent first lookups
    /// cannot duplicate the parse.
    fn ensure_yaml_ingested(&self) {
        if self.read_state().yaml_ingested {
            return;
        }

        let mut state = self.write_state();
        if state.yaml_ingested {
            return;
        }

        if !state.root.exists() {
            if let Err(err) = fs::create_dir_all(&state.root) {
                warn!(root = %state.root.display(), %err, "could not create vocabulary root");
            }
            state.yaml_ingested = true;
            return;
        }

        let yaml_files: Vec<PathBuf> = WalkDir::new(&state.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                matches!(
                    e.path().extension().and_then(|x| x.to_str()),
                    Some("yaml") | Some("yml")
                )
            })
            .map(|e| e.into_path())
            .collect();

        for path in &yaml_files {
            if let Err(err) = ingest_yaml_file(&mut state.content, path) {
                error!(path = %path.display(), %err, "failed to parse YAML wildcard file, skipping");
            }
        }

        debug!(files = yaml_files.len(), "YAML vocabulary ingested");
        state.yaml_ingested = true;
    }

    /// Cache-first lookup of a single (non-glob) name.
    ///
    /// A file that exists is cached under its name whether the read
    /// succeeded or degraded to empty; a missing file is cached only when
    /// `cache_missing` is set (direct requests cache their not-found
    /// result, glob-internal lookups do not need to).
    fn lookup_name(&self, name: &str, cache_missing: bool) -> Arc<Vec<String>> {
        if let Some(cached) = self.read_state().content.get(name) {
            return Arc::clone(cached);
        }

        let path = txt_path(&self.read_state().root, name);
        if !path.is_file() {
            let empty = Arc::new(Vec::new());
            if !cache_missing {
                return empty;
            }
            let mut state = self.write_state();
            return Arc::clone(state.content.entry(name.to_string()).or_insert(empty));
        }

        let lines = match fs::read_to_string(&path) {
            Ok(text) => Arc::new(
                text.lines()
                    .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            ),
            Err(err) => {
                error!(path = %path.display(), %err, "failed to read wildcard file, treating as empty");
                Arc::new(Vec::new())
            }
        };

        let mut state = self.write_state();
        Arc::clone(state.content.entry(name.to_string()).or_insert(lines))
    }

    /// Concatenate the lines of every name matching a glob pattern, in
    /// name-sorted order, without deduplication.
    fn lines_from_glob(&self, pattern: &str) -> Arc<Vec<String>> {
        let mut lines = Vec::new();
        for name in self.matching_names(pattern) {
            lines.extend(self.lookup_name(&name, false).iter().cloned());
        }
        debug!(%pattern, count = lines.len(), "resolved glob pattern");
        Arc::new(lines)
    }
}

/// Anchored, case-insensitive regex for a `*` glob; `None` if the
/// escaped pattern somehow fails to compile
fn glob_regex(pattern: &str) -> Option<Regex> {
    let anchored = format!("^{}$", regex::escape(pattern).replace("\\*", ".*"));
    match RegexBuilder::new(&anchored).case_insensitive(true).build() {
        Ok(regex) => Some(regex),
        Err(err) => {
            warn!(%pattern, %err, "unusable glob pattern, treating as empty");
            None
        }
    }
}

/// `<root>/<name with '/' as path separator>.txt`
fn txt_path(root: &Path, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    let mut parts = name.split('/').peekable();
    while let Some(part) = parts.next() {
        if parts.peek().is_some() {
            path.push(part);
        } else {
            path.push(format!("{part}.txt"));
        }
    }
    path
}

/// Relative file path (extension already stripped) to slash-joined name
fn path_to_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn ingest_yaml_file(content: &mut HashMap<String, Arc<Vec<String>>>, path: &Path) -> Result<(), StoreError> {
    let text = fs::read_to_string(path)?;
    let root: Value = serde_yaml::from_str(&text)?;
    flatten_yaml(content, &root, "");
    Ok(())
}

/// Walk a YAML node, flattening nested mappings into slash-joined entry
/// names; list leaves become candidate lines. Fragments that are not
/// cleanly mappings or lists of scalars are ignored.
fn flatten_yaml(content: &mut HashMap<String, Arc<Vec<String>>>, node: &Value, path: &str) {
    match node {
        Value::Mapping(mapping) => {
            for (key, value) in mapping {
                let Some(key) = scalar_to_string(key) else {
                    continue;
                };
                let child = if path.is_empty() { key } else { format!("{path}/{key}") };
                flatten_yaml(content, value, &child);
            }
        }
        Value::Sequence(list) if !path.is_empty() => {
            let lines: Vec<String> = list.iter().filter_map(scalar_to_string).collect();
            // YAML entries shadow any .txt file of the same name
            content.insert(path.to_string(), Arc::new(lines));
        }
        _ => {}
    }
}

/// Non-string scalars are stringified; anything else is not a candidate
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, VocabStore) {
        let temp = TempDir::new().unwrap();
        for (rel, content) in files {
            let path = temp.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, content).unwrap();
        }
        let store = VocabStore::open(temp.path()).unwrap();
        (temp, store)
    }

    #[test]
    fn test_txt_lookup_filters_comments_and_blanks() {
        let (_temp, store) = store_with(&[("color.txt", "# palette\nred\n\ngreen\n  \nblue\n")]);
        assert_eq!(*store.lines("color"), vec!["red", "green", "blue"]);
    }

    #[test]
    fn test_lines_keep_internal_whitespace() {
        let (_temp, store) = store_with(&[("pose.txt", "  arms crossed  \n")]);
        assert_eq!(*store.lines("pose"), vec!["  arms crossed  "]);
    }

    #[test]
    fn test_nested_name_maps_to_subdirectory() {
        let (_temp, store) = store_with(&[("poses/style_action.txt", "action pose\n")]);
        assert_eq!(*store.lines("poses/style_action"), vec!["action pose"]);
    }

    #[test]
    fn test_missing_name_is_empty_and_cached() {
        let (temp, store) = store_with(&[]);
        assert!(store.lines("animal").is_empty());

        // The not-found entry is immutable for the store's lifetime:
        // a file created afterwards is not observed.
        fs::write(temp.path().join("animal.txt"), "cat\n").unwrap();
        assert!(store.lines("animal").is_empty());
    }

    #[test]
    fn test_glob_concatenates_in_name_sorted_order() {
        let (_temp, store) = store_with(&[
            ("poses/style_dynamic.txt", "dynamic pose\n"),
            ("poses/style_action.txt", "action pose\n"),
        ]);
        assert_eq!(*store.lines("poses/style_*"), vec!["action pose", "dynamic pose"]);
    }

    #[test]
    fn test_glob_is_case_insensitive() {
        let (_temp, store) = store_with(&[("poses/style_action.txt", "action pose\n")]);
        assert_eq!(*store.lines("POSES/Style_*"), vec!["action pose"]);
    }

    #[test]
    fn test_glob_matches_whole_name_only() {
        let (_temp, store) = store_with(&[
            ("pose.txt", "sitting\n"),
            ("poses/style_action.txt", "action pose\n"),
        ]);
        // "pose" alone must not match "poses/style_action"
        assert_eq!(*store.lines("pose"), vec!["sitting"]);
        let all = store.lines("pose*");
        assert_eq!(*all, vec!["sitting", "action pose"]);
    }

    #[test]
    fn test_yaml_entries_flatten_to_slash_paths() {
        let (_temp, store) = store_with(&[(
            "vocab.yaml",
            "artists:\n  modern:\n    - painter a\n    - painter b\n  classic:\n    - painter c\n",
        )]);
        assert_eq!(*store.lines("artists/modern"), vec!["painter a", "painter b"]);
        assert_eq!(*store.lines("artists/classic"), vec!["painter c"]);
    }

    #[test]
    fn test_yaml_shadows_txt_with_same_name() {
        let (_temp, store) = store_with(&[
            ("color.txt", "red\n"),
            ("anything.yaml", "color:\n  - yaml red\n"),
        ]);
        assert_eq!(*store.lines("color"), vec!["yaml red"]);
    }

    #[test]
    fn test_yaml_non_string_scalars_are_stringified() {
        let (_temp, store) = store_with(&[("nums.yaml", "steps:\n  - 20\n  - 30\n  - true\n")]);
        assert_eq!(*store.lines("steps"), vec!["20", "30", "true"]);
    }

    #[test]
    fn test_yaml_unclean_fragments_ignored() {
        let (_temp, store) = store_with(&[(
            "odd.yaml",
            "plain_scalar: hello\nlist_of_maps:\n  - key: value\nok:\n  - fine\n",
        )]);
        assert!(store.lines("plain_scalar").is_empty());
        assert!(store.lines("list_of_maps").is_empty());
        assert_eq!(*store.lines("ok"), vec!["fine"]);
    }

    #[test]
    fn test_malformed_yaml_is_skipped() {
        let (_temp, store) = store_with(&[
            ("broken.yaml", ": not yaml\n\t{{{\n"),
            ("color.txt", "red\n"),
        ]);
        // Ingestion soldiers on; .txt entries still resolve.
        assert_eq!(*store.lines("color"), vec!["red"]);
    }

    #[test]
    fn test_all_names_sorted_and_deduplicated() {
        let (_temp, store) = store_with(&[
            ("b.txt", "x\n"),
            ("a.txt", "y\n"),
            ("nested/c.txt", "z\n"),
            ("vocab.yaml", "a:\n  - from yaml\nd:\n  - w\n"),
        ]);
        assert_eq!(*store.all_names(), vec!["a", "b", "d", "nested/c"]);
    }

    #[test]
    fn test_set_root_clears_caches() {
        let (_temp_a, store) = store_with(&[("color.txt", "red\n")]);
        assert_eq!(*store.lines("color"), vec!["red"]);

        let temp_b = TempDir::new().unwrap();
        fs::write(temp_b.path().join("color.txt"), "blue\n").unwrap();
        store.set_root(temp_b.path());
        assert_eq!(*store.lines("color"), vec!["blue"]);

        store.reset_root();
        assert_eq!(*store.lines("color"), vec!["red"]);
    }

    #[test]
    fn test_open_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("deep").join("wildcards");
        let store = VocabStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert!(store.lines("anything").is_empty());
    }

    #[test]
    fn test_stats_counts_names_and_candidates() {
        let (_temp, store) = store_with(&[("a.txt", "1\n2\n"), ("b.txt", "3\n")]);
        let stats = store.stats();
        assert_eq!(stats.name_count, 2);
        assert_eq!(stats.candidate_count, 3);
    }
}
