//! Detection of code smells in C# sources.
//!
//! Each check is available as a free function returning a lazy sequence of
//! findings for a path, and as a per-file function over an already-loaded
//! [`SourceFile`](crate::source::SourceFile) for callers that run several
//! checks over the same files.

mod dead_code;
mod long_methods;
mod magic_numbers;
mod namespaces;
mod naming;
mod runner;
mod types;

pub use dead_code::{find_dead_code, find_dead_code_with, DeadCodeDetector, DEFAULT_ENTRY_POINTS};
pub use long_methods::{
    find_long_methods, find_long_methods_with, long_methods_in, DEFAULT_LONG_METHOD_THRESHOLD,
};
pub use magic_numbers::{
    find_magic_numbers, find_magic_numbers_with, is_common_literal, magic_numbers_in,
};
pub use namespaces::builtin_members;
pub use naming::{
    check_naming_conventions, check_naming_conventions_with, conforms, convention_for,
    identifier_type, naming_violations_in, CONVENTIONS,
};
pub use runner::{Check, Runner};
pub use types::{
    DeadCodeFinding, DeadCodeKind, IdentifierType, MagicNumberFinding, MethodInfo,
    NamingConvention, NamingViolation, ScanResult, Severity, Violation, ViolationRule,
};
