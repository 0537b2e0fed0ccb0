//! Dead code detection: unused `using` directives and unreferenced
//! declarations.
//!
//! Two passes over the whole project. Pass 1 extracts facts from every file
//! (in parallel) and builds a [`ProjectContext`]; pass 2 walks each file's
//! imports and declarations and checks them against the references.
//!
//! Resolution is textual, not semantic. A reference to `Foo` anywhere counts
//! as a use of every declaration named `Foo`, and an import counts as used
//! when the file mentions any name the imported namespace is known to
//! provide. Anything uncertain counts as used: a directive is only reported
//! when every way it could be needed has been ruled out.

use std::collections::{HashMap, HashSet};
use std::iter;
use std::path::Path;

use tracing::debug;

use crate::analysis::{Declaration, DeclarationKind, FileFacts, Import, ProjectContext};
use crate::source::{SourceFile, SourceLoader};

use super::namespaces::{builtin_members, is_open_namespace};
use super::{DeadCodeFinding, DeadCodeKind};

/// Methods invoked by the runtime rather than by project code.
pub const DEFAULT_ENTRY_POINTS: &[&str] = &["Main"];

/// Namespace that query expressions (`from x in xs select x`) bind to.
const QUERY_NAMESPACE: &str = "System.Linq";

/// Cross-file dead code detector.
#[derive(Debug, Clone)]
pub struct DeadCodeDetector {
    entry_points: HashSet<String>,
    /// Extra namespace -> provided names, for libraries the built-in table
    /// does not cover.
    known_namespaces: HashMap<String, Vec<String>>,
}

impl Default for DeadCodeDetector {
    fn default() -> Self {
        Self {
            entry_points: DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect(),
            known_namespaces: HashMap::new(),
        }
    }
}

impl DeadCodeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry point names.
    pub fn with_entry_points<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_points = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add names provided by namespaces outside the project.
    pub fn with_known_namespaces(mut self, namespaces: HashMap<String, Vec<String>>) -> Self {
        for (namespace, names) in namespaces {
            self.known_namespaces
                .entry(namespace)
                .or_default()
                .extend(names);
        }
        self
    }

    /// Run both passes over a set of loaded files.
    ///
    /// Findings come in file order, then source order within a file.
    pub fn detect(&self, sources: &[SourceFile]) -> Vec<DeadCodeFinding> {
        let ctx = ProjectContext::from_sources(sources);
        debug!(
            files = sources.len(),
            parsed = ctx.len(),
            references = ctx.referenced_names().len(),
            "dead code: project indexed"
        );
        self.detect_in(&ctx)
    }

    /// Pass 2 over an already-built context.
    pub fn detect_in(&self, ctx: &ProjectContext<'_>) -> Vec<DeadCodeFinding> {
        let mut findings = Vec::new();

        for facts in ctx.files() {
            let file_refs: HashSet<&str> = facts.references.iter().map(|r| r.name.as_str()).collect();
            // Static classes declaring extension methods are used through them
            let extension_hosts: HashSet<&str> = facts
                .declarations
                .iter()
                .filter(|d| d.is_extension)
                .filter_map(|d| d.container.as_deref())
                .collect();

            // (start byte, finding) so imports and declarations interleave by position
            let mut file_findings: Vec<(usize, DeadCodeFinding)> = Vec::new();

            for import in &facts.imports {
                let used = if import.is_global {
                    self.import_is_used(ctx, import, ctx.referenced_names(), ctx.uses_query_syntax())
                } else {
                    self.import_is_used(ctx, import, &file_refs, facts.uses_query_syntax)
                };
                if !used {
                    file_findings.push((
                        import.span.start_byte,
                        finding(DeadCodeKind::UnusedImport, import.display_name(), facts, import.span.start_line),
                    ));
                }
            }

            for decl in &facts.declarations {
                let hosts_extensions = decl.kind.is_type()
                    && decl.container.is_none()
                    && extension_hosts.contains(decl.symbol());
                if self.is_candidate(decl) && !hosts_extensions && !ctx.is_referenced(decl.symbol()) {
                    file_findings.push((
                        decl.span.start_byte,
                        finding(DeadCodeKind::UnreferencedDeclaration, &decl.name, facts, decl.line()),
                    ));
                }
            }

            file_findings.sort_by_key(|(pos, _)| *pos);
            findings.extend(file_findings.into_iter().map(|(_, f)| f));
        }

        debug!(findings = findings.len(), "dead code: done");
        findings
    }

    /// Whether a declaration must be referenced somewhere to be alive.
    fn is_candidate(&self, decl: &Declaration) -> bool {
        match decl.kind {
            DeclarationKind::Namespace
            | DeclarationKind::Constructor
            | DeclarationKind::Destructor
            | DeclarationKind::LocalFunction
            | DeclarationKind::Operator
            | DeclarationKind::Accessor
            | DeclarationKind::Parameter
            | DeclarationKind::LocalVariable => false,
            _ => {
                let name = decl.symbol();
                !decl.is_override
                    && !name.is_empty()
                    && !name.chars().all(|c| c == '_')
                    && !self.entry_points.contains(name)
            }
        }
    }

    fn import_is_used(
        &self,
        ctx: &ProjectContext<'_>,
        import: &Import,
        refs: &HashSet<&str>,
        query_syntax: bool,
    ) -> bool {
        if let Some(alias) = &import.alias {
            return refs.contains(alias.as_str());
        }

        if is_open_namespace(&import.path) || (query_syntax && import.path == QUERY_NAMESPACE) {
            return true;
        }

        let mut known = false;

        if let Some(names) = ctx.declared_in(&import.path) {
            known = true;
            if names.iter().any(|n| refs.contains(n)) {
                return true;
            }
        }

        if let Some(names) = builtin_members(&import.path) {
            known = true;
            if names.iter().any(|n| refs.contains(n)) {
                return true;
            }
        }

        if let Some(names) = self.known_namespaces.get(&import.path) {
            known = true;
            if names.iter().any(|n| refs.contains(n.as_str())) {
                return true;
            }
        }

        // Nothing is known about what it provides
        !known
    }
}

fn finding(kind: DeadCodeKind, identifier: &str, facts: &FileFacts, line: usize) -> DeadCodeFinding {
    DeadCodeFinding {
        kind,
        identifier: identifier.to_string(),
        file: facts.path.clone(),
        line,
    }
}

/// Find unused imports and unreferenced declarations under `path`.
///
/// Every file is loaded before the first finding is produced; nothing is
/// read until the sequence is first polled. A missing or empty path yields
/// an empty sequence.
pub fn find_dead_code<P: AsRef<Path>>(path: P) -> impl Iterator<Item = DeadCodeFinding> {
    find_dead_code_with(&SourceLoader::default(), &DeadCodeDetector::default(), path)
}

/// Like [`find_dead_code`], using a configured loader and detector.
pub fn find_dead_code_with<P: AsRef<Path>>(
    loader: &SourceLoader,
    detector: &DeadCodeDetector,
    path: P,
) -> impl Iterator<Item = DeadCodeFinding> {
    let loader = loader.clone();
    let detector = detector.clone();
    let path = path.as_ref().to_path_buf();

    iter::once_with(move || {
        let sources: Vec<SourceFile> = loader.load_path(path).collect();
        detector.detect(&sources)
    })
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, text) in files {
            let path = temp.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, text).unwrap();
        }
        temp
    }

    fn of_kind(findings: &[DeadCodeFinding], kind: DeadCodeKind) -> Vec<&str> {
        findings
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.identifier.as_str())
            .collect()
    }

    #[test]
    fn test_two_of_three_imports_unused() {
        let temp = project(&[(
            "Program.cs",
            r#"using System;
using System.Linq;
using System.Text;

class Program
{
    static void Main()
    {
        Console.WriteLine("hello");
    }
}
"#,
        )]);

        let findings: Vec<_> = find_dead_code(temp.path().join("Program.cs")).collect();
        let unused = of_kind(&findings, DeadCodeKind::UnusedImport);
        assert_eq!(unused, vec!["System.Linq", "System.Text"]);

        let lines: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == DeadCodeKind::UnusedImport)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_references_cross_files() {
        let temp = project(&[
            (
                "Board/Canvas.cs",
                r#"namespace Whiteboard.Board
{
    public class Canvas
    {
        public void Draw() { }
        public void Unused() { }
    }
}
"#,
            ),
            (
                "App.cs",
                r#"using Whiteboard.Board;

class App
{
    static void Main()
    {
        var canvas = new Canvas();
        canvas.Draw();
    }
}
"#,
            ),
        ]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(of_kind(&findings, DeadCodeKind::UnusedImport).is_empty());
        assert_eq!(
            of_kind(&findings, DeadCodeKind::UnreferencedDeclaration),
            vec!["App", "Unused"]
        );
    }

    #[test]
    fn test_exclusions() {
        let temp = project(&[(
            "Shape.cs",
            r#"class Shape
{
    public Shape() { }
    ~Shape() { }
    public override string ToString() { return "shape"; }
    static void Main(string[] args)
    {
        int local = 3;
        Shape s = null;
    }
}
"#,
        )]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(findings.is_empty(), "unexpected: {:?}", findings);
    }

    #[test]
    fn test_alias_import() {
        let temp = project(&[(
            "Palette.cs",
            r#"using Media = System.Windows.Media;
using Ink = System.Windows.Ink;

class Palette
{
    static void Main()
    {
        var brush = Media.Brushes.Red;
    }
}
"#,
        )]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert_eq!(of_kind(&findings, DeadCodeKind::UnusedImport), vec!["Ink"]);
    }

    #[test]
    fn test_static_and_global_imports() {
        let temp = project(&[
            (
                "GlobalUsings.cs",
                "global using System.Linq;\nglobal using System.IO;\n",
            ),
            (
                "Geometry.cs",
                r#"using static System.Math;

class Geometry
{
    static void Main()
    {
        var items = new[] { 3, 4 };
        var first = items.First();
        var root = Sqrt(first);
    }
}
"#,
            ),
        ]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert_eq!(of_kind(&findings, DeadCodeKind::UnusedImport), vec!["System.IO"]);
    }

    #[test]
    fn test_query_syntax_and_contains_use_linq() {
        let temp = project(&[
            (
                "Query.cs",
                r#"using System.Linq;

class Query
{
    static void Main()
    {
        var evens = from n in new[] { 3, 4 } where n > 3 select n;
    }
}
"#,
            ),
            (
                "Lookup.cs",
                r#"using System.Linq;

class Lookup
{
    static bool Has(int[] a) { return a.Contains(3); }
}
"#,
            ),
        ]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(of_kind(&findings, DeadCodeKind::UnusedImport).is_empty(), "{:?}", findings);
    }

    #[test]
    fn test_system_is_never_reported() {
        let temp = project(&[(
            "Settings.cs",
            r#"using System;

[Serializable]
class Settings
{
    static void Main()
    {
        var parts = "a,b".Split(',', StringSplitOptions.RemoveEmptyEntries);
    }
}
"#,
        )]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(of_kind(&findings, DeadCodeKind::UnusedImport).is_empty());
    }

    #[test]
    fn test_project_extension_methods_use_their_namespace() {
        let temp = project(&[
            (
                "Ext.cs",
                r#"namespace Board.Ext
{
    public static class StrokeExtensions
    {
        public static string Smooth(this string stroke) { return stroke; }
    }
}
"#,
            ),
            (
                "App.cs",
                r#"using Board.Ext;

class App
{
    static void Main()
    {
        var s = "ink";
        var smoothed = s.Smooth();
    }
}
"#,
            ),
        ]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(of_kind(&findings, DeadCodeKind::UnusedImport).is_empty());
        let unreferenced = of_kind(&findings, DeadCodeKind::UnreferencedDeclaration);
        assert!(!unreferenced.contains(&"StrokeExtensions"));
        assert!(!unreferenced.contains(&"Smooth"));
    }

    #[test]
    fn test_attribute_short_name_uses_declaration() {
        let temp = project(&[
            (
                "Meta.cs",
                r#"namespace Board.Meta
{
    public class HelpAttribute : System.Attribute { }
}
"#,
            ),
            (
                "App.cs",
                r#"using Board.Meta;

[Help]
class App
{
    static void Main() { }
}
"#,
            ),
        ]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(of_kind(&findings, DeadCodeKind::UnusedImport).is_empty());
        assert_eq!(
            of_kind(&findings, DeadCodeKind::UnreferencedDeclaration),
            vec!["App"]
        );
    }

    #[test]
    fn test_static_import_of_nested_type() {
        let temp = project(&[
            (
                "Layout.cs",
                r#"namespace Whiteboard
{
    public class Outer
    {
        public class Inner
        {
            public const int Limit = 4;
        }
    }
}
"#,
            ),
            (
                "Used.cs",
                "using static Whiteboard.Outer.Inner;\nclass Used { static void Main() { var n = Limit; } }\n",
            ),
            (
                "Unused.cs",
                "using static Whiteboard.Outer.Inner;\nclass Unused { static void Main() { } }\n",
            ),
        ]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        let unused: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == DeadCodeKind::UnusedImport)
            .map(|f| f.file.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(unused, vec!["Unused.cs"]);
    }

    #[test]
    fn test_unknown_namespace_counts_as_used() {
        let temp = project(&[(
            "Vendor.cs",
            r#"using Acme.Widgets;

class Vendor
{
    static void Main() { }
}
"#,
        )]);

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        assert!(of_kind(&findings, DeadCodeKind::UnusedImport).is_empty());
    }

    #[test]
    fn test_configured_known_namespaces() {
        let temp = project(&[(
            "Vendor.cs",
            r#"using Acme.Widgets;

class Vendor
{
    static void Main() { }
}
"#,
        )]);

        let detector = DeadCodeDetector::new().with_known_namespaces(HashMap::from([(
            "Acme.Widgets".to_string(),
            vec!["Gauge".to_string()],
        )]));
        let findings: Vec<_> =
            find_dead_code_with(&SourceLoader::default(), &detector, temp.path()).collect();
        assert_eq!(
            of_kind(&findings, DeadCodeKind::UnusedImport),
            vec!["Acme.Widgets"]
        );
    }

    #[test]
    fn test_custom_entry_points() {
        let temp = project(&[(
            "Startup.cs",
            "class Startup { static void Main() { } void Configure() { } }\n",
        )]);

        let detector = DeadCodeDetector::new().with_entry_points(["Configure", "Startup"]);
        let findings: Vec<_> =
            find_dead_code_with(&SourceLoader::default(), &detector, temp.path()).collect();
        assert_eq!(
            of_kind(&findings, DeadCodeKind::UnreferencedDeclaration),
            vec!["Main"]
        );
    }

    #[test]
    fn test_unreadable_file_is_isolated() {
        let temp = project(&[(
            "Tool.cs",
            "class Tool { static void Main() { } void Helper() { } }\n",
        )]);
        // Invalid UTF-8 that would otherwise reference Helper
        fs::write(temp.path().join("Broken.cs"), b"class B { void X() { Helper(); } } \xff\xfe").unwrap();

        let findings: Vec<_> = find_dead_code(temp.path()).collect();
        let names = of_kind(&findings, DeadCodeKind::UnreferencedDeclaration);
        assert!(names.contains(&"Helper"));
        assert!(!names.contains(&"B"));
    }

    #[test]
    fn test_lazy_until_polled() {
        let temp = project(&[("A.cs", "class A { }\n")]);
        let findings = find_dead_code(temp.path());
        fs::write(temp.path().join("B.cs"), "class B { A a; }\n").unwrap();

        // B.cs is written before the first poll and is seen
        let names: Vec<_> = findings.map(|f| f.identifier).collect();
        assert_eq!(names, vec!["B", "a"]);
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(find_dead_code("").count(), 0);
        assert_eq!(find_dead_code("/no/such/dir").count(), 0);

        let temp = TempDir::new().unwrap();
        assert_eq!(find_dead_code(temp.path()).count(), 0);
    }

    #[test]
    fn test_order_is_stable() {
        let temp = project(&[
            ("B.cs", "class Beta { }\n"),
            ("A.cs", "using System.Text;\nclass Alpha { }\n"),
        ]);

        let first: Vec<_> = find_dead_code(temp.path()).collect();
        let second: Vec<_> = find_dead_code(temp.path()).collect();
        assert_eq!(first, second);

        let names: Vec<_> = first.iter().map(|f| f.identifier.as_str()).collect();
        assert_eq!(names, vec!["System.Text", "Alpha", "Beta"]);
    }
}
