//! AST-backed code analysis module.
//!
//! This module turns source text into language-neutral "facts" using
//! tree-sitter. Facts include:
//! - Named declarations (types, methods, fields, locals, ...) with their kind
//! - Method bodies with their statement counts
//! - Numeric literals
//! - Import (`using`) directives
//! - Identifier references for usage counting
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ SourceFile      │────▶│ Analyzers    │────▶│ FileFacts     │
//! └─────────────────┘     │ (C#)         │     │ (Declarations,│
//!                         └──────────────┘     │  Imports, etc)│
//!                                              └───────────────┘
//!                                                      │
//!                                                      ▼
//!                         ┌──────────────┐     ┌───────────────┐
//!                         │ Detection    │◀────│ProjectContext │
//!                         │ Rules        │     │ (all files)   │
//!                         └──────────────┘     └───────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement `LanguageAnalyzer` trait
//! 3. Register the analyzer in `languages/mod.rs`
//!
//! See `languages/csharp.rs` for the reference implementation.

mod context;
mod facts;
mod languages;
mod traits;

pub use context::ProjectContext;
pub use facts::{
    symbol_name, Declaration, DeclarationKind, FileFacts, FunctionBody, Import, NumericLiteral,
    Reference, Span,
};
pub use languages::{get_analyzer, register_analyzers, CSharpAnalyzer};
pub use traits::{LanguageAnalyzer, ParsedFile};

use std::path::Path;

/// Whether an analyzer is registered for the path's extension.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| get_analyzer(ext).is_some())
        .unwrap_or(false)
}
