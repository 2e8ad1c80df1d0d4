//! Source discovery
//!
//! Yields the files to ingest: configured explicit files first, then every
//! file under the configured directory roots whose path contains no ignored
//! entry name.

use crate::config::ScanConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A single ignore rule matched against an entry's file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreRule {
    /// Name must match exactly (`node_modules`, `.env`)
    Exact(String),
    /// Name must end with the suffix (`*.png` becomes `.png`)
    Suffix(String),
}

impl IgnoreRule {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_prefix("*.") {
            Some(ext) => IgnoreRule::Suffix(format!(".{}", ext)),
            None => IgnoreRule::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            IgnoreRule::Exact(exact) => name == exact,
            IgnoreRule::Suffix(suffix) => name.ends_with(suffix.as_str()),
        }
    }
}

/// Compiled ignore rules
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    rules: Vec<IgnoreRule>,
}

impl IgnoreRules {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        Self {
            rules: patterns
                .iter()
                .map(|p| IgnoreRule::parse(p.as_ref()))
                .collect(),
        }
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(name))
    }
}

/// Counters the walker keeps while it runs
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkStats {
    pub missing_files: usize,
    pub missing_dirs: usize,
    pub unreadable_entries: usize,
}

type EntryFilter = Box<dyn FnMut(&DirEntry) -> bool + Send>;
type FilteredWalk = walkdir::FilterEntry<walkdir::IntoIter, EntryFilter>;

/// Lazy iterator over files to ingest
///
/// Explicit files are checked for existence as they are reached; missing ones
/// are warned about and skipped. Directory roots are walked one at a time
/// and never follow symlinks.
pub struct SourceWalker {
    root: PathBuf,
    files: std::vec::IntoIter<String>,
    dirs: std::vec::IntoIter<String>,
    ignore: IgnoreRules,
    current: Option<FilteredWalk>,
    stats: WalkStats,
}

impl SourceWalker {
    pub fn new(root: &Path, scan: &ScanConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            files: scan.files.clone().into_iter(),
            dirs: scan.dirs.clone().into_iter(),
            ignore: IgnoreRules::new(&scan.ignore),
            current: None,
            stats: WalkStats::default(),
        }
    }

    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    fn next_explicit(&mut self) -> Option<PathBuf> {
        for rel in self.files.by_ref() {
            let full = self.root.join(&rel);
            if full.is_file() {
                return Some(full);
            }
            warn!("File not found: {}", rel);
            self.stats.missing_files += 1;
        }
        None
    }

    fn open_next_dir(&mut self) -> bool {
        for rel in self.dirs.by_ref() {
            let full = self.root.join(&rel);
            if !full.is_dir() {
                debug!("Scan root does not exist: {}", full.display());
                self.stats.missing_dirs += 1;
                continue;
            }

            let ignore = self.ignore.clone();
            // The root itself is never filtered, only what is beneath it
            let filter: EntryFilter = Box::new(move |entry| {
                entry.depth() == 0 || !ignore.is_ignored(&entry.file_name().to_string_lossy())
            });
            self.current = Some(
                WalkDir::new(full)
                    .follow_links(false)
                    .into_iter()
                    .filter_entry(filter),
            );
            return true;
        }
        false
    }
}

impl Iterator for SourceWalker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if let Some(path) = self.next_explicit() {
            return Some(path);
        }

        loop {
            if let Some(walker) = self.current.as_mut() {
                match walker.next() {
                    Some(Ok(entry)) if entry.file_type().is_file() => {
                        return Some(entry.into_path());
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("Skipping unreadable entry: {}", e);
                        self.stats.unreadable_entries += 1;
                        continue;
                    }
                    None => self.current = None,
                }
            }

            if !self.open_next_dir() {
                return None;
            }
        }
    }
}

/// Project-relative, forward-slash identity for `path`
pub fn source_id(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
