//! Naming convention checks.
//!
//! Every identifier type maps to exactly one convention through
//! [`CONVENTIONS`]; adding a kind means adding a row, not a branch.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{symbol_name, DeclarationKind};
use crate::source::{SourceFile, SourceLoader};

use super::{IdentifierType, NamingConvention, NamingViolation};

/// Required convention for each identifier type.
pub const CONVENTIONS: &[(IdentifierType, NamingConvention)] = &[
    (IdentifierType::Class, NamingConvention::UpperCamelCase),
    (IdentifierType::Interface, NamingConvention::UpperCamelCase),
    (IdentifierType::Struct, NamingConvention::UpperCamelCase),
    (IdentifierType::Enum, NamingConvention::UpperCamelCase),
    (IdentifierType::Record, NamingConvention::UpperCamelCase),
    (IdentifierType::Delegate, NamingConvention::UpperCamelCase),
    (IdentifierType::Method, NamingConvention::UpperCamelCase),
    (IdentifierType::Property, NamingConvention::UpperCamelCase),
    (IdentifierType::Event, NamingConvention::UpperCamelCase),
    (IdentifierType::EnumMember, NamingConvention::UpperCamelCase),
    (IdentifierType::Constant, NamingConvention::UpperCamelCase),
    (IdentifierType::Field, NamingConvention::LowerCamelCase),
    (IdentifierType::Parameter, NamingConvention::LowerCamelCase),
    (IdentifierType::LocalVariable, NamingConvention::LowerCamelCase),
];

lazy_static! {
    static ref UPPER_CAMEL: Regex = Regex::new(r"^\p{Lu}[\p{L}\p{Nd}]*$").unwrap();
    static ref LOWER_CAMEL: Regex = Regex::new(r"^\p{Ll}[\p{L}\p{Nd}]*$").unwrap();
}

/// Convention required for an identifier type.
pub fn convention_for(identifier_type: IdentifierType) -> Option<NamingConvention> {
    CONVENTIONS
        .iter()
        .find(|(t, _)| *t == identifier_type)
        .map(|(_, c)| *c)
}

/// Whether `identifier` (without a verbatim `@`) follows `convention`.
pub fn conforms(convention: NamingConvention, identifier: &str) -> bool {
    match convention {
        NamingConvention::UpperCamelCase => UPPER_CAMEL.is_match(identifier),
        NamingConvention::LowerCamelCase => LOWER_CAMEL.is_match(identifier),
    }
}

/// Identifier type a declaration is checked as, if any.
///
/// Namespaces, constructors, destructors, operators and accessors take
/// their names from elsewhere and are not checked.
pub fn identifier_type(kind: DeclarationKind) -> Option<IdentifierType> {
    match kind {
        DeclarationKind::Class => Some(IdentifierType::Class),
        DeclarationKind::Interface => Some(IdentifierType::Interface),
        DeclarationKind::Struct => Some(IdentifierType::Struct),
        DeclarationKind::Enum => Some(IdentifierType::Enum),
        DeclarationKind::Record => Some(IdentifierType::Record),
        DeclarationKind::Delegate => Some(IdentifierType::Delegate),
        DeclarationKind::Method | DeclarationKind::LocalFunction => Some(IdentifierType::Method),
        DeclarationKind::Property => Some(IdentifierType::Property),
        DeclarationKind::Event => Some(IdentifierType::Event),
        DeclarationKind::EnumMember => Some(IdentifierType::EnumMember),
        DeclarationKind::Constant => Some(IdentifierType::Constant),
        DeclarationKind::Field => Some(IdentifierType::Field),
        DeclarationKind::Parameter => Some(IdentifierType::Parameter),
        DeclarationKind::LocalVariable => Some(IdentifierType::LocalVariable),
        DeclarationKind::Namespace
        | DeclarationKind::Constructor
        | DeclarationKind::Destructor
        | DeclarationKind::Operator
        | DeclarationKind::Accessor => None,
    }
}

/// Check every named declaration under `path` (a file or a directory).
///
/// One violation per offending declaration, in file then source order. A
/// missing or empty path yields an empty sequence.
pub fn check_naming_conventions<P: AsRef<Path>>(
    path: P,
) -> impl Iterator<Item = NamingViolation> {
    check_naming_conventions_with(&SourceLoader::default(), path)
}

/// Like [`check_naming_conventions`], using a configured loader.
pub fn check_naming_conventions_with<P: AsRef<Path>>(
    loader: &SourceLoader,
    path: P,
) -> impl Iterator<Item = NamingViolation> {
    loader
        .load_path(path.as_ref().to_path_buf())
        .flat_map(|file| naming_violations_in(&file))
}

/// Naming violations in a single file.
pub fn naming_violations_in(file: &SourceFile) -> Vec<NamingViolation> {
    let Some(facts) = file.facts() else {
        return Vec::new();
    };

    let mut violations = Vec::new();
    for decl in &facts.declarations {
        let Some(identifier_type) = identifier_type(decl.kind) else {
            continue;
        };
        let Some(expected) = convention_for(identifier_type) else {
            continue;
        };

        let name = symbol_name(&decl.name);
        // Discards (`_`, `__`) carry no name to check
        if name.is_empty() || name.chars().all(|c| c == '_') {
            continue;
        }

        if !conforms(expected, name) {
            violations.push(NamingViolation {
                identifier_name: decl.name.clone(),
                identifier_type,
                file: facts.path.clone(),
                line: decl.line(),
                expected_convention: expected,
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn check(source: &str) -> Vec<NamingViolation> {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Test.cs");
        fs::write(&path, source).unwrap();
        check_naming_conventions(&path).collect()
    }

    #[test]
    fn test_every_type_has_a_convention() {
        for (identifier_type, _) in CONVENTIONS {
            assert!(convention_for(*identifier_type).is_some());
        }
        assert_eq!(
            convention_for(IdentifierType::Class),
            Some(NamingConvention::UpperCamelCase)
        );
        assert_eq!(
            convention_for(IdentifierType::Parameter),
            Some(NamingConvention::LowerCamelCase)
        );
    }

    #[test]
    fn test_conforms() {
        assert!(conforms(NamingConvention::UpperCamelCase, "StrokeBuffer"));
        assert!(conforms(NamingConvention::UpperCamelCase, "IRenderer"));
        assert!(conforms(NamingConvention::UpperCamelCase, "Vector2"));
        assert!(!conforms(NamingConvention::UpperCamelCase, "strokeBuffer"));
        assert!(!conforms(NamingConvention::UpperCamelCase, "Stroke_Buffer"));
        assert!(!conforms(NamingConvention::UpperCamelCase, "MAX_SIZE"));

        assert!(conforms(NamingConvention::LowerCamelCase, "strokeCount"));
        assert!(conforms(NamingConvention::LowerCamelCase, "i"));
        assert!(!conforms(NamingConvention::LowerCamelCase, "StrokeCount"));
        assert!(!conforms(NamingConvention::LowerCamelCase, "_strokeCount"));
        assert!(!conforms(NamingConvention::LowerCamelCase, "stroke_count"));
    }

    #[test]
    fn test_clean_file_has_no_violations() {
        let violations = check(
            r#"
namespace Classroom.Board
{
    public class TestClass
    {
        private int strokeCount;
        public const int MaxStrokes = 10;
        public string Title { get; set; }

        public TestClass(int initialCount)
        {
            strokeCount = initialCount;
        }

        public void TestMethod(int value)
        {
            var doubled = value * 2;
            strokeCount = doubled;
        }
    }
}
"#,
        );
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_lowercase_class_is_one_violation() {
        let violations = check(
            r#"
public class testClass
{
    public void TestMethod(int value) { }
}
"#,
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].identifier_name, "testClass");
        assert!(violations[0].identifier_type == "Class");
        assert_eq!(
            violations[0].expected_convention,
            NamingConvention::UpperCamelCase
        );
        assert_eq!(violations[0].line, 2);
    }

    #[test]
    fn test_member_and_local_violations() {
        let violations = check(
            r#"
public class Canvas
{
    private int Width;
    private int _height;
    public int zoom { get; set; }

    public void redraw(int Scale)
    {
        var Total = Scale;
    }
}
"#,
        );

        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.identifier_name.as_str(), v.identifier_type))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Width", IdentifierType::Field),
                ("_height", IdentifierType::Field),
                ("zoom", IdentifierType::Property),
                ("redraw", IdentifierType::Method),
                ("Scale", IdentifierType::Parameter),
                ("Total", IdentifierType::LocalVariable),
            ]
        );
    }

    #[test]
    fn test_pattern_loop_catch_and_lambda_bindings() {
        let violations = check(
            r#"
public class Importer
{
    public void Load(string[] lines, object input)
    {
        foreach (var Item in lines) { }
        if (input is string Text) { }
        if (int.TryParse("7", out var Parsed)) { }
        try { } catch (Exception Err) { }
        var lengths = lines.Select(Value => Value.Length);
        for (int Index = 0; Index < 3; Index++) { }
    }
}
"#,
        );

        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.identifier_name.as_str(), v.identifier_type))
            .collect();
        assert_eq!(
            found,
            vec![
                ("Item", IdentifierType::LocalVariable),
                ("Text", IdentifierType::LocalVariable),
                ("Parsed", IdentifierType::LocalVariable),
                ("Err", IdentifierType::LocalVariable),
                ("Value", IdentifierType::Parameter),
                ("Index", IdentifierType::LocalVariable),
            ]
        );
    }

    #[test]
    fn test_operators_and_accessors_are_not_named() {
        let violations = check(
            r#"
public struct Meter
{
    public int Reading { get { return 0; } set { } }
    public static Meter operator +(Meter a, Meter b) { return a; }
}
"#,
        );
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_verbatim_identifiers_and_discards() {
        let violations = check(
            r#"
public class Keywords
{
    public void Run(int @event)
    {
        var @class = @event;
        Func<int, int, int> f = (_, __) => 0;
    }
}
"#,
        );
        assert!(violations.is_empty(), "unexpected: {:?}", violations);
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(check_naming_conventions("").count(), 0);
        assert_eq!(check_naming_conventions("/no/such/Test.cs").count(), 0);
    }
}
