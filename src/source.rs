//! Loading source files from disk.
//!
//! Every entry point here is total: a missing, empty, unreadable or
//! non-UTF-8 path yields nothing rather than an error. Failures are logged
//! at `debug` level so a caller can still find out why a file was skipped.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use once_cell::sync::OnceCell;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::analysis::{self, FileFacts};
use crate::error::{LoadError, ParseError};

/// Directory names never descended into (build output).
const SKIPPED_DIRS: &[&str] = &["bin", "obj", "node_modules", "packages"];

const UTF8_BOM: char = '\u{feff}';

/// A source file read from disk.
///
/// The parsed facts are built on first use and cached for the lifetime of
/// the value, so several checks over the same `SourceFile` parse it once.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    text: String,
    facts: OnceCell<Option<FileFacts>>,
}

impl SourceFile {
    /// Create a source file from already-loaded text.
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            facts: OnceCell::new(),
        }
    }

    /// Path of the file (absolute when loaded from disk).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw source text (without a byte-order mark).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parsed facts, or `None` when the file cannot be analyzed.
    pub fn facts(&self) -> Option<&FileFacts> {
        self.facts.get_or_init(|| self.analyze()).as_ref()
    }

    fn analyze(&self) -> Option<FileFacts> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let result = match analysis::get_analyzer(ext) {
            Some(analyzer) => analyzer.analyze(&self.path, &self.text),
            None => Err(ParseError::UnsupportedExtension(ext.to_string())),
        };

        match result {
            Ok(facts) => {
                if facts.has_parse_errors {
                    debug!(path = %self.path.display(), language = %facts.language, "analyzing file with recovered syntax errors");
                }
                Some(facts)
            }
            Err(error @ ParseError::Language(_)) => {
                // A grammar that will not load fails every file, not just this one
                warn!(path = %self.path.display(), %error, "grammar failed to load");
                None
            }
            Err(error) => {
                debug!(path = %self.path.display(), %error, "skipping unparseable file");
                None
            }
        }
    }
}

/// Walks files and directories for analyzable sources.
#[derive(Debug, Clone, Default)]
pub struct SourceLoader {
    excluded: Option<GlobSet>,
}

impl SourceLoader {
    /// Create a loader with the default directory filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also skip paths matching any of the given glob patterns.
    ///
    /// Patterns use globset syntax, which supports `**` for recursive
    /// directory matching.
    pub fn with_excluded_paths(mut self, patterns: &[String]) -> anyhow::Result<Self> {
        if patterns.is_empty() {
            self.excluded = None;
            return Ok(self);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        self.excluded = Some(builder.build()?);
        Ok(self)
    }

    /// Load a single file. Returns `None` for a missing, unreadable or
    /// non-UTF-8 path.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Option<SourceFile> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return None;
        }

        match read_source(path) {
            Ok(file) => Some(file),
            Err(error) => {
                debug!(%error, "skipping file");
                None
            }
        }
    }

    /// Lazily walk a directory tree for analyzable files, in sorted path order.
    ///
    /// A missing or empty path yields an empty sequence.
    pub fn load_directory<P: AsRef<Path>>(&self, path: P) -> impl Iterator<Item = SourceFile> {
        let root = path.as_ref();
        let root = if root.as_os_str().is_empty() || !root.is_dir() {
            None
        } else {
            Some(absolute(root))
        };

        let loader = self.clone();
        root.into_iter().flat_map(move |root| {
            let filter = loader.clone();
            let reader = loader.clone();
            let walk_root = root.clone();
            WalkDir::new(root)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(move |e| filter.keep_entry(&walk_root, e))
                .filter_map(move |entry| match entry {
                    Ok(entry) if entry.file_type().is_file() => Some(entry.into_path()),
                    Ok(_) => None,
                    Err(error) => {
                        warn!(%error, "skipping directory entry");
                        None
                    }
                })
                .filter(|path| analysis::is_supported_path(path))
                .filter_map(move |path| reader.load_file(path))
        })
    }

    /// Load a file, or walk a directory. Anything else yields nothing.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> impl Iterator<Item = SourceFile> {
        let path = path.as_ref();
        let single = if path.is_file() {
            self.load_file(absolute(path))
        } else {
            None
        };
        // Owned, so the returned iterator does not borrow the caller's path
        single
            .into_iter()
            .chain(self.load_directory(path.to_path_buf()))
    }

    fn keep_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        // Never filter the root itself
        if entry.depth() == 0 {
            return true;
        }

        if entry.file_type().is_dir() {
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref()) {
                return false;
            }
        }

        match &self.excluded {
            Some(globs) => {
                let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                !globs.is_match(rel) && !globs.is_match(entry.path())
            }
            None => true,
        }
    }
}

/// Load a single file with the default loader.
pub fn load_file<P: AsRef<Path>>(path: P) -> Option<SourceFile> {
    SourceLoader::default().load_file(path)
}

/// Walk a directory with the default loader.
pub fn load_directory<P: AsRef<Path>>(path: P) -> impl Iterator<Item = SourceFile> {
    SourceLoader::default().load_directory(path)
}

fn read_source(path: &Path) -> Result<SourceFile, LoadError> {
    let metadata = fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(LoadError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| LoadError::Encoding {
        path: path.to_path_buf(),
    })?;
    let text = match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    };

    Ok(SourceFile::new(absolute(path), text))
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_and_empty_paths() {
        assert!(load_file("").is_none());
        assert!(load_file("/definitely/not/here.cs").is_none());
        assert_eq!(load_directory("").count(), 0);
        assert_eq!(load_directory("/definitely/not/here").count(), 0);
    }

    #[test]
    fn test_load_file_strips_bom() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Board.cs");
        fs::write(&path, "\u{feff}class Board {}").unwrap();

        let file = load_file(&path).expect("should load");
        assert_eq!(file.text(), "class Board {}");
        assert!(file.path().is_absolute());
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Broken.cs");
        fs::write(&path, [0xff, 0xfe, 0x00, 0xc3, 0x28]).unwrap();

        assert!(load_file(&path).is_none());
        assert_eq!(load_directory(temp.path()).count(), 0);
    }

    #[test]
    fn test_directory_walk_filters() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src/Tools")).unwrap();
        fs::create_dir_all(root.join("obj/Debug")).unwrap();
        fs::create_dir_all(root.join(".vs")).unwrap();

        fs::write(root.join("src/Board.cs"), "class Board {}").unwrap();
        fs::write(root.join("src/Tools/Pen.CS"), "class Pen {}").unwrap();
        fs::write(root.join("src/notes.txt"), "not code").unwrap();
        fs::write(root.join("obj/Debug/Generated.cs"), "class Generated {}").unwrap();
        fs::write(root.join(".vs/Cache.cs"), "class Cache {}").unwrap();

        let names: Vec<_> = load_directory(root)
            .map(|f| f.path().file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Board.cs", "Pen.CS"]);
    }

    #[test]
    fn test_excluded_paths() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("Generated")).unwrap();
        fs::write(root.join("Board.cs"), "class Board {}").unwrap();
        fs::write(root.join("Generated/Resources.cs"), "class Resources {}").unwrap();

        let loader = SourceLoader::new()
            .with_excluded_paths(&["Generated/**".to_string()])
            .unwrap();
        let files: Vec<_> = loader.load_directory(root).collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].path().ends_with("Board.cs"));
    }

    #[test]
    fn test_load_path_accepts_file_or_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Board.cs");
        fs::write(&path, "class Board {}").unwrap();

        let loader = SourceLoader::new();
        assert_eq!(loader.load_path(&path).count(), 1);
        assert_eq!(loader.load_path(temp.path()).count(), 1);
        assert_eq!(loader.load_path(temp.path().join("missing")).count(), 0);
    }

    #[test]
    fn test_load_path_outlives_its_argument() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Board.cs"), "class Board {}").unwrap();

        let loader = SourceLoader::new();
        let files = {
            let dir = temp.path().to_path_buf();
            loader.load_path(dir.as_path().to_path_buf())
        };
        assert_eq!(files.count(), 1);
    }

    #[test]
    fn test_facts_are_cached() {
        let file = SourceFile::new("Board.cs", "class Board { void Draw() {} }");
        let first = file.facts().expect("facts") as *const FileFacts;
        let second = file.facts().expect("facts") as *const FileFacts;
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_extension_has_no_facts() {
        let file = SourceFile::new("notes.txt", "class Board {}");
        assert!(file.facts().is_none());
    }
}
