//! Error types for loading and parsing source files.
//!
//! None of these escape the public analysis queries: they are logged and the
//! affected file contributes no findings.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a path into a [`SourceFile`](crate::source::SourceFile).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error("{} is not a regular file", path.display())]
    NotAFile { path: PathBuf },
}

/// Failure to build a syntax tree for a source file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no analyzer registered for extension {0:?}")]
    UnsupportedExtension(String),

    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no tree for {0}")]
    NoTree(String),

    #[error("{0} is not recognizable source")]
    Unrecognized(String),
}
