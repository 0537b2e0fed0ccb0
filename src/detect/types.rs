//! Core types for detection results.
//!
//! The four finding records are plain values: cloneable, comparable and
//! serializable, with no links back into the tree they came from.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A method whose statement count reached the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodInfo {
    pub method_name: String,
    pub declaring_file: PathBuf,
    pub start_line: usize,
    pub statement_count: usize,
}

/// A numeric literal outside the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MagicNumberFinding {
    /// Literal text as written, sign included.
    pub value: String,
    pub file: PathBuf,
    pub line: usize,
}

/// Declaration kinds checked for naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentifierType {
    Class,
    Interface,
    Struct,
    Enum,
    Record,
    Delegate,
    Method,
    Property,
    Event,
    EnumMember,
    Constant,
    Field,
    Parameter,
    LocalVariable,
}

impl IdentifierType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::Class => "Class",
            IdentifierType::Interface => "Interface",
            IdentifierType::Struct => "Struct",
            IdentifierType::Enum => "Enum",
            IdentifierType::Record => "Record",
            IdentifierType::Delegate => "Delegate",
            IdentifierType::Method => "Method",
            IdentifierType::Property => "Property",
            IdentifierType::Event => "Event",
            IdentifierType::EnumMember => "EnumMember",
            IdentifierType::Constant => "Constant",
            IdentifierType::Field => "Field",
            IdentifierType::Parameter => "Parameter",
            IdentifierType::LocalVariable => "LocalVariable",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq<&str> for IdentifierType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Casing rule an identifier must follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingConvention {
    /// `StrokeBuffer`
    UpperCamelCase,
    /// `strokeBuffer`
    LowerCamelCase,
}

impl NamingConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::UpperCamelCase => "UpperCamelCase",
            NamingConvention::LowerCamelCase => "lowerCamelCase",
        }
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A declaration whose identifier breaks the convention for its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamingViolation {
    /// Identifier as written.
    pub identifier_name: String,
    pub identifier_type: IdentifierType,
    pub file: PathBuf,
    pub line: usize,
    pub expected_convention: NamingConvention,
}

/// Kind of dead code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeadCodeKind {
    UnusedImport,
    UnreferencedDeclaration,
}

impl DeadCodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadCodeKind::UnusedImport => "UnusedImport",
            DeadCodeKind::UnreferencedDeclaration => "UnreferencedDeclaration",
        }
    }
}

impl fmt::Display for DeadCodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An import or declaration nothing refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeadCodeFinding {
    pub kind: DeadCodeKind,
    pub identifier: String,
    pub file: PathBuf,
    pub line: usize,
}

/// Severity levels for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Rule names, one per reportable finding kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationRule {
    #[serde(rename = "long_method")]
    LongMethod,
    #[serde(rename = "magic_number")]
    MagicNumber,
    #[serde(rename = "naming_convention")]
    NamingConvention,
    #[serde(rename = "unused_import")]
    UnusedImport,
    #[serde(rename = "unreferenced_declaration")]
    UnreferencedDeclaration,
}

impl ViolationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationRule::LongMethod => "long_method",
            ViolationRule::MagicNumber => "magic_number",
            ViolationRule::NamingConvention => "naming_convention",
            ViolationRule::UnusedImport => "unused_import",
            ViolationRule::UnreferencedDeclaration => "unreferenced_declaration",
        }
    }
}

impl fmt::Display for ViolationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A finding flattened for display (pretty and SARIF output).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub rule: ViolationRule,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub severity: Severity,
}

fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl From<&MethodInfo> for Violation {
    fn from(m: &MethodInfo) -> Self {
        Violation {
            rule: ViolationRule::LongMethod,
            message: format!(
                "method {:?} has {} statements",
                m.method_name, m.statement_count
            ),
            file: display_path(&m.declaring_file),
            line: m.start_line,
            severity: Severity::Warning,
        }
    }
}

impl From<&MagicNumberFinding> for Violation {
    fn from(m: &MagicNumberFinding) -> Self {
        Violation {
            rule: ViolationRule::MagicNumber,
            message: format!("magic number {}; consider a named constant", m.value),
            file: display_path(&m.file),
            line: m.line,
            severity: Severity::Info,
        }
    }
}

impl From<&NamingViolation> for Violation {
    fn from(n: &NamingViolation) -> Self {
        Violation {
            rule: ViolationRule::NamingConvention,
            message: format!(
                "{} {:?} should be {}",
                n.identifier_type, n.identifier_name, n.expected_convention
            ),
            file: display_path(&n.file),
            line: n.line,
            severity: Severity::Warning,
        }
    }
}

impl From<&DeadCodeFinding> for Violation {
    fn from(d: &DeadCodeFinding) -> Self {
        let (rule, message) = match d.kind {
            DeadCodeKind::UnusedImport => (
                ViolationRule::UnusedImport,
                format!("using directive {:?} is never used", d.identifier),
            ),
            DeadCodeKind::UnreferencedDeclaration => (
                ViolationRule::UnreferencedDeclaration,
                format!("{:?} is declared but never referenced", d.identifier),
            ),
        };
        Violation {
            rule,
            message,
            file: display_path(&d.file),
            line: d.line,
            severity: Severity::Warning,
        }
    }
}

/// Results of a scan: one list per check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Number of files loaded.
    pub scanned: usize,
    pub long_methods: Vec<MethodInfo>,
    pub magic_numbers: Vec<MagicNumberFinding>,
    pub naming_violations: Vec<NamingViolation>,
    pub dead_code: Vec<DeadCodeFinding>,
}

impl ScanResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of findings across all checks.
    pub fn total(&self) -> usize {
        self.long_methods.len()
            + self.magic_numbers.len()
            + self.naming_violations.len()
            + self.dead_code.len()
    }

    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// All findings flattened in check order.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::with_capacity(self.total());
        violations.extend(self.long_methods.iter().map(Violation::from));
        violations.extend(self.magic_numbers.iter().map(Violation::from));
        violations.extend(self.naming_violations.iter().map(Violation::from));
        violations.extend(self.dead_code.iter().map(Violation::from));
        violations
    }
}
