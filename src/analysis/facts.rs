//! Fact structures extracted from AST analysis.
//!
//! Detection rules never touch tree-sitter nodes directly; they consume
//! these language-neutral facts, so any grammar that can fill them in can
//! be plugged in behind [`LanguageAnalyzer`](super::LanguageAnalyzer).

use std::fmt;
use std::path::{Path, PathBuf};

/// Where a fact starts in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (0-indexed), for ordering facts within a file.
    pub start_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
}

impl Span {
    /// Create a span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self {
            start_byte: node.start_byte(),
            start_line: node.start_position().row + 1, // tree-sitter is 0-indexed
        }
    }
}

/// Kind of named declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Namespace,
    Class,
    Interface,
    Struct,
    Enum,
    Record,
    Delegate,
    Method,
    Constructor,
    Destructor,
    LocalFunction,
    /// `operator +`, `implicit operator T`
    Operator,
    /// `get`/`set`/`init`/`add`/`remove` bodies
    Accessor,
    Property,
    Event,
    EnumMember,
    Field,
    Constant,
    Parameter,
    LocalVariable,
}

impl DeclarationKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Namespace => "namespace",
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Record => "record",
            DeclarationKind::Delegate => "delegate",
            DeclarationKind::Method => "method",
            DeclarationKind::Constructor => "constructor",
            DeclarationKind::Destructor => "destructor",
            DeclarationKind::LocalFunction => "local function",
            DeclarationKind::Operator => "operator",
            DeclarationKind::Accessor => "accessor",
            DeclarationKind::Property => "property",
            DeclarationKind::Event => "event",
            DeclarationKind::EnumMember => "enum member",
            DeclarationKind::Field => "field",
            DeclarationKind::Constant => "constant",
            DeclarationKind::Parameter => "parameter",
            DeclarationKind::LocalVariable => "local variable",
        }
    }

    /// Check if this declares a type.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Interface
                | DeclarationKind::Struct
                | DeclarationKind::Enum
                | DeclarationKind::Record
                | DeclarationKind::Delegate
        )
    }

    /// Check if this has an executable body.
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Method
                | DeclarationKind::Constructor
                | DeclarationKind::Destructor
                | DeclarationKind::LocalFunction
                | DeclarationKind::Operator
                | DeclarationKind::Accessor
        )
    }

    /// Check if this is a member of a type (as opposed to a local or a type).
    pub fn is_member(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Method
                | DeclarationKind::Property
                | DeclarationKind::Event
                | DeclarationKind::EnumMember
                | DeclarationKind::Field
                | DeclarationKind::Constant
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named declaration extracted from source code.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// The identifier as written (a verbatim `@` prefix is kept).
    ///
    /// Operators and accessors have no identifier and get a synthesized
    /// name such as `operator +` or `get_Name`.
    pub name: String,
    /// The kind of declaration.
    pub kind: DeclarationKind,
    /// Span of the identifier.
    pub span: Span,
    /// Enclosing namespace, dotted (e.g. `Whiteboard.Ink`).
    pub namespace: Option<String>,
    /// Enclosing type path, dotted from the outermost type (`Outer.Inner`).
    pub container: Option<String>,
    /// Whether the declaration carries an `override` modifier.
    pub is_override: bool,
    /// A method whose first parameter is declared `this T`.
    pub is_extension: bool,
    /// Body information (only for callables).
    pub body: Option<FunctionBody>,
}

impl Declaration {
    /// The name used for symbol matching (without a verbatim `@`).
    pub fn symbol(&self) -> &str {
        symbol_name(&self.name)
    }

    /// Line of the identifier.
    pub fn line(&self) -> usize {
        self.span.start_line
    }
}

/// Information about a method body.
#[derive(Debug, Clone)]
pub struct FunctionBody {
    /// Number of statements directly inside the body.
    pub statement_count: usize,
}

/// A numeric literal expression.
#[derive(Debug, Clone)]
pub struct NumericLiteral {
    /// Literal text, with a leading `-` when directly negated.
    pub text: String,
    /// Source span (covers the minus sign when present).
    pub span: Span,
}

/// An import (`using`) directive.
#[derive(Debug, Clone)]
pub struct Import {
    /// The imported namespace or type, whitespace stripped.
    pub path: String,
    /// Alias for `using Alias = Some.Namespace;`.
    pub alias: Option<String>,
    /// `using static Some.Type;`
    pub is_static: bool,
    /// `global using ...;`
    pub is_global: bool,
    /// Source span.
    pub span: Span,
}

impl Import {
    /// The name this directive is reported under.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.path)
    }
}

/// An identifier occurrence that is not a declaration site.
#[derive(Debug, Clone)]
pub struct Reference {
    /// Referenced name (without a verbatim `@`).
    pub name: String,
    /// Line (1-indexed).
    pub line: usize,
}

/// All facts extracted from a single file.
#[derive(Debug, Clone)]
pub struct FileFacts {
    /// File path.
    pub path: PathBuf,
    /// Language identifier.
    pub language: String,
    /// Named declarations in source order.
    pub declarations: Vec<Declaration>,
    /// Numeric literals in source order.
    pub literals: Vec<NumericLiteral>,
    /// Import directives in source order.
    pub imports: Vec<Import>,
    /// Identifier references in source order.
    pub references: Vec<Reference>,
    /// Whether the file contains a LINQ query expression (`from x in ...`).
    pub uses_query_syntax: bool,
    /// Whether the tree contained (recovered) syntax errors.
    pub has_parse_errors: bool,
}

impl FileFacts {
    /// Create empty facts for a file.
    pub fn empty(path: &Path, language: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            language: language.to_string(),
            declarations: Vec::new(),
            literals: Vec::new(),
            imports: Vec::new(),
            references: Vec::new(),
            uses_query_syntax: false,
            has_parse_errors: false,
        }
    }

    /// Get all declarations with an executable body slot.
    pub fn callables(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.kind.is_callable())
    }
}

/// Strip a C#-style verbatim prefix (`@class` -> `class`).
pub fn symbol_name(identifier: &str) -> &str {
    identifier.strip_prefix('@').unwrap_or(identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(line: usize) -> Span {
        Span {
            start_byte: 0,
            start_line: line,
        }
    }

    #[test]
    fn test_declaration_symbol_strips_verbatim_prefix() {
        let decl = Declaration {
            name: "@event".to_string(),
            kind: DeclarationKind::Field,
            span: span(3),
            namespace: None,
            container: Some("Board".to_string()),
            is_override: false,
            is_extension: false,
            body: None,
        };
        assert_eq!(decl.symbol(), "event");
        assert_eq!(decl.name, "@event");
        assert_eq!(decl.line(), 3);
    }

    #[test]
    fn test_kind_classification() {
        assert!(DeclarationKind::Record.is_type());
        assert!(!DeclarationKind::Method.is_type());
        assert!(DeclarationKind::LocalFunction.is_callable());
        assert!(DeclarationKind::Accessor.is_callable());
        assert!(!DeclarationKind::Operator.is_member());
        assert!(DeclarationKind::Constant.is_member());
        assert!(!DeclarationKind::Parameter.is_member());
        assert_eq!(DeclarationKind::EnumMember.to_string(), "enum member");
    }

    #[test]
    fn test_import_display_name() {
        let mut import = Import {
            path: "System.Windows.Media".to_string(),
            alias: None,
            is_static: false,
            is_global: false,
            span: span(1),
        };
        assert_eq!(import.display_name(), "System.Windows.Media");

        import.alias = Some("Media".to_string());
        assert_eq!(import.display_name(), "Media");
    }
}
