//! Smellcheck - static analysis for C# codebases.
//!
//! Four independent checks over C# source files:
//!
//! - [`find_long_methods`]: methods whose body has at least a threshold
//!   number of statements (default 50)
//! - [`find_magic_numbers`]: numeric literals other than -1, 0, 1 and 2
//! - [`check_naming_conventions`]: identifiers that break the casing rule
//!   for their kind
//! - [`find_dead_code`]: unused `using` directives and declarations never
//!   referenced anywhere in the project
//!
//! Every check takes a file or directory path and returns a lazy iterator
//! of plain finding records. None of them fail: a missing path, an
//! unreadable file or unparseable source contributes no findings.
//!
//! # Architecture
//!
//! The codebase uses tree-sitter for AST-based analysis:
//!
//! - `source`: Loading files and walking directories
//! - `analysis`: Parsing and fact extraction behind a `LanguageAnalyzer` trait
//! - `detect`: Detection rules that consume AST-derived facts
//! - `config`: YAML configuration schema
//! - `report`: Output formatting (pretty, JSON, SARIF)

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod report;
pub mod source;

pub use analysis::{
    register_analyzers, CSharpAnalyzer, Declaration, DeclarationKind, FileFacts,
    LanguageAnalyzer, ProjectContext,
};
pub use config::Config;
pub use detect::{
    check_naming_conventions, find_dead_code, find_long_methods, find_magic_numbers, Check,
    DeadCodeFinding, DeadCodeKind, IdentifierType, MagicNumberFinding, MethodInfo,
    NamingConvention, NamingViolation, Runner, ScanResult, Violation,
};
pub use error::{LoadError, ParseError};
pub use source::{load_directory, load_file, SourceFile, SourceLoader};
