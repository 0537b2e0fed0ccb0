//! C# language analyzer using tree-sitter.
//!
//! Facts are collected in a single pre-order walk driven by an explicit
//! stack, so deeply nested expressions cannot exhaust the call stack.

use std::collections::HashSet;
use std::path::Path;

use tree_sitter::{Language, Node, Parser};

use crate::analysis::{
    symbol_name, Declaration, DeclarationKind, FileFacts, FunctionBody, Import,
    LanguageAnalyzer, NumericLiteral, ParsedFile, Reference, Span,
};
use crate::error::ParseError;

const NUMERIC_LITERAL_KINDS: &[&str] = &["integer_literal", "real_literal"];

/// Map a type declaration node kind to its declaration kind.
fn type_kind(node_kind: &str) -> Option<DeclarationKind> {
    match node_kind {
        "class_declaration" => Some(DeclarationKind::Class),
        "interface_declaration" => Some(DeclarationKind::Interface),
        "struct_declaration" => Some(DeclarationKind::Struct),
        "enum_declaration" => Some(DeclarationKind::Enum),
        "record_declaration" | "record_struct_declaration" => Some(DeclarationKind::Record),
        _ => None,
    }
}

/// Map a member/local declaration node kind to its declaration kind.
fn member_kind(node_kind: &str) -> Option<DeclarationKind> {
    match node_kind {
        "delegate_declaration" => Some(DeclarationKind::Delegate),
        "method_declaration" => Some(DeclarationKind::Method),
        "constructor_declaration" => Some(DeclarationKind::Constructor),
        "destructor_declaration" => Some(DeclarationKind::Destructor),
        "local_function_statement" => Some(DeclarationKind::LocalFunction),
        "property_declaration" => Some(DeclarationKind::Property),
        "event_declaration" => Some(DeclarationKind::Event),
        "enum_member_declaration" => Some(DeclarationKind::EnumMember),
        "parameter" => Some(DeclarationKind::Parameter),
        _ => None,
    }
}

/// Whether a block child counts as a statement.
fn is_statement(node: &Node) -> bool {
    node.is_named() && node.kind() != "comment" && !node.kind().starts_with("preproc")
}

/// The identifier or designation a pattern binds, if any.
fn designation<'t>(node: Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("name")
        .or_else(|| node.child_by_field_name("designation"))
        .or_else(|| {
            let count = node.named_child_count();
            count.checked_sub(1).and_then(|last| node.named_child(last))
        })
        .filter(|n| matches!(n.kind(), "identifier" | "parenthesized_variable_designation"))
}

/// The parameter of a lambda written without parentheses.
fn lambda_identifier_parameter<'t>(node: Node<'t>) -> Option<Node<'t>> {
    let param = node.child_by_field_name("parameters").or_else(|| {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .take_while(|c| c.kind() != "=>")
            .filter(|c| c.is_named())
            .last();
        found
    })?;
    (param.kind() == "identifier").then_some(param)
}

/// Remove all whitespace (`System . Linq` -> `System.Linq`).
fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

pub struct CSharpAnalyzer {
    language: Language,
}

impl CSharpAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> Result<Parser, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl Default for CSharpAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for CSharpAnalyzer {
    fn language_id(&self) -> &'static str {
        "csharp"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["cs"]
    }

    fn parse(&self, path: &Path, source: &str) -> Result<ParsedFile, ParseError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree(path.display().to_string()))?;

        if tree.root_node().is_error() {
            return Err(ParseError::Unrecognized(path.display().to_string()));
        }

        Ok(ParsedFile {
            tree,
            source: source.to_string(),
            path: path.to_path_buf(),
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> FileFacts {
        FactWalker::new(parsed, self.language_id()).walk()
    }
}

/// Lexical context carried down the walk.
#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: Option<String>,
    container: Option<String>,
}

struct FactWalker<'a> {
    parsed: &'a ParsedFile,
    facts: FileFacts,
    /// Start bytes of identifiers that name a declaration.
    declaration_sites: HashSet<usize>,
    /// Set by a file-scoped namespace; applies to everything after it.
    file_namespace: Option<String>,
}

impl<'a> FactWalker<'a> {
    fn new(parsed: &'a ParsedFile, language: &str) -> Self {
        Self {
            parsed,
            facts: FileFacts::empty(&parsed.path, language),
            declaration_sites: HashSet::new(),
            file_namespace: None,
        }
    }

    fn walk(mut self) -> FileFacts {
        let root = self.parsed.tree.root_node();
        self.facts.has_parse_errors = root.has_error();

        let mut stack = vec![(root, Scope::default())];
        while let Some((node, scope)) = stack.pop() {
            let Some(child_scope) = self.visit(node, scope) else {
                continue;
            };
            let mut cursor = node.walk();
            let children: Vec<_> = node.children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, child_scope.clone()));
            }
        }

        self.facts
    }

    /// Record facts for one node. Returns the scope for its children, or
    /// `None` when the subtree is fully handled.
    fn visit(&mut self, node: Node<'a>, scope: Scope) -> Option<Scope> {
        let kind = node.kind();

        if let Some(decl_kind) = type_kind(kind) {
            let name = self.declare(node, decl_kind, &scope);
            let container = match (scope.container.clone(), name) {
                (Some(outer), Some(name)) => Some(format!("{}.{}", outer, name)),
                (outer, name) => name.or(outer),
            };
            return Some(Scope {
                namespace: self.effective_namespace(&scope),
                container,
            });
        }

        if let Some(decl_kind) = member_kind(kind) {
            self.declare(node, decl_kind, &scope);
            return Some(scope);
        }

        match kind {
            "using_directive" => {
                self.record_import(node);
                None
            }
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                let namespace = self.enter_namespace(node, &scope);
                if kind == "file_scoped_namespace_declaration" {
                    self.file_namespace = namespace.clone();
                }
                Some(Scope {
                    namespace,
                    container: None,
                })
            }
            "variable_declaration" => {
                self.declare_variables(node, &scope);
                Some(scope)
            }
            "operator_declaration" | "conversion_operator_declaration" => {
                self.declare_operator(node, &scope);
                Some(scope)
            }
            "accessor_declaration" => {
                self.declare_accessor(node, &scope);
                Some(scope)
            }
            // `out var parsed`, `catch (Exception err)`
            "declaration_expression" | "catch_declaration" => {
                self.declare(node, DeclarationKind::LocalVariable, &scope);
                Some(scope)
            }
            // `is string text`, `is var text`
            "declaration_pattern" | "var_pattern" => {
                if let Some(designation) = designation(node) {
                    self.declare_designated(node, designation, &scope);
                }
                Some(scope)
            }
            "foreach_statement" => {
                if node.child_by_field_name("type").is_some() {
                    if let Some(left) = node.child_by_field_name("left") {
                        self.declare_designated(node, left, &scope);
                    }
                }
                Some(scope)
            }
            "lambda_expression" => {
                // `value => value * 2`
                if let Some(param) = lambda_identifier_parameter(node) {
                    self.push_declaration(node, param, DeclarationKind::Parameter, &scope);
                }
                Some(scope)
            }
            "implicit_parameter" => {
                self.push_declaration(node, node, DeclarationKind::Parameter, &scope);
                None
            }
            "attribute" => {
                self.reference_attribute_class(node);
                Some(scope)
            }
            "query_expression" => {
                self.facts.uses_query_syntax = true;
                Some(scope)
            }
            "type_parameter" => {
                self.mark_declaration_sites(node);
                None
            }
            "prefix_unary_expression" => match self.negated_literal(node) {
                Some(operand) => {
                    self.facts.literals.push(NumericLiteral {
                        text: format!("-{}", self.parsed.node_text(operand)),
                        span: Span::from_node(node),
                    });
                    None
                }
                None => Some(scope),
            },
            k if NUMERIC_LITERAL_KINDS.contains(&k) => {
                self.facts.literals.push(NumericLiteral {
                    text: self.parsed.node_text(node).to_string(),
                    span: Span::from_node(node),
                });
                None
            }
            "identifier" => {
                if !self.declaration_sites.contains(&node.start_byte()) {
                    self.facts.references.push(Reference {
                        name: symbol_name(self.parsed.node_text(node)).to_string(),
                        line: node.start_position().row + 1,
                    });
                }
                None
            }
            _ => Some(scope),
        }
    }

    fn effective_namespace(&self, scope: &Scope) -> Option<String> {
        scope
            .namespace
            .clone()
            .or_else(|| self.file_namespace.clone())
    }

    /// Record a namespace declaration and return the namespace it opens.
    fn enter_namespace(&mut self, node: Node<'a>, scope: &Scope) -> Option<String> {
        let outer = self.effective_namespace(scope);
        let Some(name_node) = node.child_by_field_name("name") else {
            return outer;
        };
        self.mark_declaration_sites(name_node);

        let name = compact(self.parsed.node_text(name_node));
        let full = match outer {
            Some(outer) => format!("{}.{}", outer, name),
            None => name,
        };

        self.facts.declarations.push(Declaration {
            name: full.clone(),
            kind: DeclarationKind::Namespace,
            span: Span::from_node(name_node),
            namespace: None,
            container: None,
            is_override: false,
            is_extension: false,
            body: None,
        });
        Some(full)
    }

    /// Record a declaration named by the node's `name` field.
    fn declare(&mut self, node: Node<'a>, kind: DeclarationKind, scope: &Scope) -> Option<String> {
        let name_node = node.child_by_field_name("name")?;
        Some(self.push_declaration(node, name_node, kind, scope))
    }

    fn push_declaration(
        &mut self,
        node: Node<'a>,
        name_node: Node<'a>,
        kind: DeclarationKind,
        scope: &Scope,
    ) -> String {
        let name = self.parsed.node_text(name_node).to_string();
        self.push_named(node, name_node, name.clone(), kind, scope);
        name
    }

    /// Record a declaration whose name is not the text of `site`.
    fn push_named(
        &mut self,
        node: Node<'a>,
        site: Node<'a>,
        name: String,
        kind: DeclarationKind,
        scope: &Scope,
    ) {
        self.declaration_sites.insert(site.start_byte());

        let body = if kind.is_callable() {
            self.function_body(node)
        } else {
            None
        };
        let is_extension = kind == DeclarationKind::Method && self.is_extension_method(node);

        self.facts.declarations.push(Declaration {
            name,
            kind,
            span: Span::from_node(site),
            namespace: self.effective_namespace(scope),
            container: scope.container.clone(),
            is_override: self.has_modifier(node, "override"),
            is_extension,
            body,
        });
    }

    /// Declare every identifier a designation or tuple pattern introduces.
    fn declare_designated(&mut self, owner: Node<'a>, target: Node<'a>, scope: &Scope) {
        let mut stack = vec![target];
        while let Some(current) = stack.pop() {
            match current.kind() {
                "identifier" => {
                    self.push_declaration(owner, current, DeclarationKind::LocalVariable, scope);
                }
                "parenthesized_variable_designation" | "tuple_pattern" => {
                    let mut cursor = current.walk();
                    let children: Vec<_> = current.named_children(&mut cursor).collect();
                    stack.extend(children.into_iter().rev());
                }
                _ => {}
            }
        }
    }

    /// `operator +` and `implicit operator Celsius` are named after their
    /// operator token or target type.
    fn declare_operator(&mut self, node: Node<'a>, scope: &Scope) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        let Some(keyword_at) = children.iter().position(|c| c.kind() == "operator") else {
            return;
        };
        let keyword = children[keyword_at];

        let name = if node.kind() == "conversion_operator_declaration" {
            let direction = keyword_at
                .checked_sub(1)
                .map(|i| self.parsed.node_text(children[i]))
                .unwrap_or("implicit");
            let target = node
                .child_by_field_name("type")
                .or_else(|| children[keyword_at + 1..].iter().copied().find(|c| c.is_named()))
                .map(|t| compact(self.parsed.node_text(t)))
                .unwrap_or_default();
            format!("{} operator {}", direction, target)
        } else {
            let token = node.child_by_field_name("operator").or_else(|| {
                children[keyword_at + 1..]
                    .iter()
                    .copied()
                    .find(|c| c.kind() != "checked")
            });
            let token = token.map(|t| self.parsed.node_text(t)).unwrap_or_default();
            format!("operator {}", token)
        };

        self.push_named(node, keyword, name, DeclarationKind::Operator, scope);
    }

    /// Accessors are named the way the compiler names them: `get_Name`,
    /// `set_Item` for indexers, `add_Changed` for events.
    fn declare_accessor(&mut self, node: Node<'a>, scope: &Scope) {
        let keyword = node.child_by_field_name("name").or_else(|| {
            let mut cursor = node.walk();
            let found = node
                .children(&mut cursor)
                .find(|c| matches!(c.kind(), "get" | "set" | "init" | "add" | "remove"));
            found
        });
        let Some(keyword) = keyword else {
            return;
        };

        let owner = node.parent().and_then(|list| list.parent());
        let owner_name = match owner {
            Some(owner) if owner.kind() == "indexer_declaration" => "Item".to_string(),
            Some(owner) => owner
                .child_by_field_name("name")
                .map(|n| self.parsed.node_text(n).to_string())
                .unwrap_or_default(),
            None => String::new(),
        };
        let name = format!("{}_{}", self.parsed.node_text(keyword), owner_name);

        self.push_named(node, keyword, name, DeclarationKind::Accessor, scope);
    }

    /// Whether a method's first parameter carries the `this` modifier.
    fn is_extension_method(&self, node: Node<'a>) -> bool {
        let Some(params) = node.child_by_field_name("parameters") else {
            return false;
        };
        let mut cursor = params.walk();
        let first = params
            .named_children(&mut cursor)
            .find(|p| p.kind() == "parameter");
        let Some(first) = first else {
            return false;
        };

        let mut cursor = first.walk();
        let name_start = first.child_by_field_name("name").map(|n| n.start_byte());
        let found = first.children(&mut cursor).any(|c| {
            Some(c.start_byte()) != name_start && self.parsed.node_text(c) == "this"
        });
        found
    }

    /// `[Help]` names the class `HelpAttribute`; record both spellings.
    fn reference_attribute_class(&mut self, node: Node<'a>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let full = compact(self.parsed.node_text(name_node));
        let last = full
            .rsplit(|c: char| c == '.' || c == ':')
            .next()
            .unwrap_or(full.as_str());
        let last = last.split('<').next().unwrap_or(last);
        let last = symbol_name(last);
        if last.is_empty() || last.ends_with("Attribute") {
            return;
        }
        self.facts.references.push(Reference {
            name: format!("{}Attribute", last),
            line: node.start_position().row + 1,
        });
    }

    /// Fields, constants, event fields and locals all share `variable_declaration`.
    fn declare_variables(&mut self, node: Node<'a>, scope: &Scope) {
        let (kind, owner) = match node.parent() {
            Some(parent) if parent.kind() == "field_declaration" => {
                if self.has_modifier(parent, "const") {
                    (DeclarationKind::Constant, parent)
                } else {
                    (DeclarationKind::Field, parent)
                }
            }
            Some(parent) if parent.kind() == "event_field_declaration" => {
                (DeclarationKind::Event, parent)
            }
            _ => (DeclarationKind::LocalVariable, node),
        };

        let mut cursor = node.walk();
        let declarators: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|n| n.kind() == "variable_declarator")
            .collect();

        for declarator in declarators {
            let name_node = declarator.child_by_field_name("name").or_else(|| {
                let mut cursor = declarator.walk();
                let first = declarator
                    .named_children(&mut cursor)
                    .find(|n| n.kind() == "identifier");
                first
            });
            if let Some(name_node) = name_node {
                self.push_declaration(owner, name_node, kind, scope);
            }
        }
    }

    fn function_body(&self, node: Node<'a>) -> Option<FunctionBody> {
        let body = node.child_by_field_name("body").or_else(|| {
            let mut cursor = node.walk();
            let found = node
                .children(&mut cursor)
                .find(|n| matches!(n.kind(), "block" | "arrow_expression_clause"));
            found
        })?;

        match body.kind() {
            "block" => {
                let mut cursor = body.walk();
                let statement_count = body.children(&mut cursor).filter(is_statement).count();
                Some(FunctionBody { statement_count })
            }
            "arrow_expression_clause" => Some(FunctionBody { statement_count: 1 }),
            _ => None,
        }
    }

    fn has_modifier(&self, node: Node<'a>, modifier: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| child.kind() == "modifier" && self.parsed.node_text(child) == modifier);
        found
    }

    /// `-<literal>` is reported as one signed literal.
    fn negated_literal(&self, node: Node<'a>) -> Option<Node<'a>> {
        if node.named_child_count() != 1 {
            return None;
        }
        let operator = node.child(0)?;
        if operator.kind() != "-" {
            return None;
        }
        let operand = node.named_child(0)?;
        NUMERIC_LITERAL_KINDS
            .contains(&operand.kind())
            .then_some(operand)
    }

    /// Treat every identifier under `node` as a declaration site.
    fn mark_declaration_sites(&mut self, node: Node<'a>) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if current.kind() == "identifier" {
                self.declaration_sites.insert(current.start_byte());
                continue;
            }
            let mut cursor = current.walk();
            stack.extend(current.named_children(&mut cursor));
        }
    }

    fn record_import(&mut self, node: Node<'a>) {
        let mut is_global = false;
        let mut is_static = false;
        let mut has_equals = false;
        let mut alias = None;
        let mut names = Vec::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "global" => is_global = true,
                "static" => is_static = true,
                "=" => has_equals = true,
                "name_equals" => {
                    let mut inner = child.walk();
                    let ident = child
                        .named_children(&mut inner)
                        .find(|n| n.kind() == "identifier");
                    alias = ident.map(|n| self.parsed.node_text(n).to_string());
                }
                "comment" => {}
                _ if child.is_named() => names.push(child),
                _ => {}
            }
        }

        if alias.is_none() && has_equals && names.len() >= 2 {
            alias = Some(self.parsed.node_text(names[0]).to_string());
        }

        let Some(target) = names.last() else {
            return;
        };

        self.facts.imports.push(Import {
            path: compact(self.parsed.node_text(*target)),
            alias,
            is_static,
            is_global,
            span: Span::from_node(node),
        });
    }
}
