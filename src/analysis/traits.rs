//! Core traits for language analysis.

use std::path::{Path, PathBuf};

use super::FileFacts;
use crate::error::ParseError;

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// This is kept separate from FileFacts so a tree can be walked for more
/// than one fact set without re-parsing.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: String,
    /// The file path (for error reporting).
    pub path: PathBuf,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }
}

/// Language-specific analyzer trait.
///
/// Each supported language implements this trait to turn source text into
/// [`FileFacts`]. Detection rules only ever see the facts.
///
/// # Thread Safety
///
/// tree_sitter::Parser is not Sync, so implementations create a parser per
/// call to `parse`.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "csharp").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse source text into a tree.
    ///
    /// Partial parse errors still produce a tree with ERROR nodes; only a
    /// source that yields no usable tree at all is a [`ParseError`].
    fn parse(&self, path: &Path, source: &str) -> Result<ParsedFile, ParseError>;

    /// Extract all facts from a parsed file in one walk.
    fn extract_facts(&self, parsed: &ParsedFile) -> FileFacts;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Parse and extract in one step.
    fn analyze(&self, path: &Path, source: &str) -> Result<FileFacts, ParseError> {
        let parsed = self.parse(path, source)?;
        Ok(self.extract_facts(&parsed))
    }
}
