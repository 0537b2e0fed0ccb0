//! Detection of overly long methods.
//!
//! The size metric is the number of statements directly inside a method
//! body, not physical lines: formatting and comments never change it.

use std::path::Path;

use crate::analysis::DeclarationKind;
use crate::source::{SourceFile, SourceLoader};

use super::MethodInfo;

/// Default statement count at which a method is reported.
pub const DEFAULT_LONG_METHOD_THRESHOLD: usize = 50;

/// Find methods with at least `threshold` statements under `path` (a file
/// or a directory).
///
/// Results come in file order, then declaration order. A missing or empty
/// path yields an empty sequence.
pub fn find_long_methods<P: AsRef<Path>>(
    path: P,
    threshold: usize,
) -> impl Iterator<Item = MethodInfo> {
    find_long_methods_with(&SourceLoader::default(), path, threshold)
}

/// Like [`find_long_methods`], using a configured loader.
pub fn find_long_methods_with<P: AsRef<Path>>(
    loader: &SourceLoader,
    path: P,
    threshold: usize,
) -> impl Iterator<Item = MethodInfo> {
    loader
        .load_path(path.as_ref().to_path_buf())
        .flat_map(move |file| long_methods_in(&file, threshold))
}

/// Long methods declared in a single file.
pub fn long_methods_in(file: &SourceFile, threshold: usize) -> Vec<MethodInfo> {
    let Some(facts) = file.facts() else {
        return Vec::new();
    };

    facts
        .callables()
        .filter_map(|decl| {
            let statement_count = decl.body.as_ref().map_or(0, |b| b.statement_count);
            if statement_count < threshold {
                return None;
            }
            // Destructors share the type's name
            let method_name = match decl.kind {
                DeclarationKind::Destructor => format!("~{}", decl.name),
                _ => decl.name.clone(),
            };
            Some(MethodInfo {
                method_name,
                declaring_file: facts.path.clone(),
                start_line: decl.line(),
                statement_count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn method_with_statements(name: &str, count: usize) -> String {
        let body: String = (0..count)
            .map(|i| format!("        Console.WriteLine(\"line {}\");\n", i))
            .collect();
        format!("    public void {}()\n    {{\n{}    }}\n", name, body)
    }

    fn write_class(dir: &Path, file: &str, methods: &[(&str, usize)]) -> std::path::PathBuf {
        let members: String = methods
            .iter()
            .map(|(name, count)| method_with_statements(name, *count))
            .collect();
        let path = dir.join(file);
        fs::write(&path, format!("public class Lesson\n{{\n{}}}\n", members)).unwrap();
        path
    }

    #[test]
    fn test_reports_method_at_threshold() {
        let temp = TempDir::new().unwrap();
        let path = write_class(temp.path(), "Lesson.cs", &[("LongMethod", 51)]);

        let found: Vec<_> = find_long_methods(&path, DEFAULT_LONG_METHOD_THRESHOLD).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].method_name, "LongMethod");
        assert_eq!(found[0].statement_count, 51);
        assert_eq!(found[0].start_line, 3);
        assert!(found[0].declaring_file.ends_with("Lesson.cs"));
    }

    #[test]
    fn test_short_method_not_reported() {
        let temp = TempDir::new().unwrap();
        let path = write_class(temp.path(), "Lesson.cs", &[("LongMethod", 3)]);

        assert_eq!(find_long_methods(&path, 50).count(), 0);
    }

    #[test]
    fn test_threshold_is_inclusive_and_monotonic() {
        let temp = TempDir::new().unwrap();
        let path = write_class(
            temp.path(),
            "Lesson.cs",
            &[("Small", 2), ("Medium", 10), ("Large", 20)],
        );

        let names = |t: usize| -> Vec<String> {
            find_long_methods(&path, t).map(|m| m.method_name).collect()
        };

        assert_eq!(names(10), vec!["Medium", "Large"]);
        assert_eq!(names(11), vec!["Large"]);
        assert_eq!(names(2), vec!["Small", "Medium", "Large"]);
        assert!(names(21).is_empty());

        let mut previous = names(0);
        for t in 1..=21 {
            let current = names(t);
            assert!(current.iter().all(|m| previous.contains(m)));
            previous = current;
        }
    }

    #[test]
    fn test_directory_order_is_stable() {
        let temp = TempDir::new().unwrap();
        write_class(temp.path(), "B.cs", &[("Second", 5)]);
        write_class(temp.path(), "A.cs", &[("First", 5), ("AlsoFirst", 6)]);

        let first: Vec<_> = find_long_methods(temp.path(), 5).collect();
        let names: Vec<_> = first.iter().map(|m| m.method_name.as_str()).collect();
        assert_eq!(names, vec!["First", "AlsoFirst", "Second"]);

        let second: Vec<_> = find_long_methods(temp.path(), 5).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(find_long_methods("", 50).count(), 0);
        assert_eq!(find_long_methods("/no/such/File.cs", 50).count(), 0);
        assert_eq!(find_long_methods("/no/such/dir", 0).count(), 0);
    }

    #[test]
    fn test_accessors_and_operators_are_measured() {
        let temp = TempDir::new().unwrap();
        let statements = |n: usize| -> String {
            (0..n).map(|i| format!("            total += {};\n", i)).collect()
        };
        let path = temp.path().join("Meter.cs");
        fs::write(
            &path,
            format!(
                "public class Meter\n{{\n    public int Reading\n    {{\n        get\n        {{\n            var total = 0;\n{}            return total;\n        }}\n        set {{ }}\n    }}\n\n    public static Meter operator +(Meter a, Meter b)\n    {{\n        var total = 0;\n{}        return a;\n    }}\n}}\n",
                statements(4),
                statements(4)
            ),
        )
        .unwrap();

        let found: Vec<_> = find_long_methods(&path, 6).collect();
        let names: Vec<_> = found.iter().map(|m| m.method_name.as_str()).collect();
        assert_eq!(names, vec!["get_Reading", "operator +"]);
        assert_eq!(found[0].statement_count, 6);
        assert_eq!(found[0].start_line, 5);
    }

    #[test]
    fn test_prefix_enumeration() {
        let temp = TempDir::new().unwrap();
        write_class(temp.path(), "Lesson.cs", &[("One", 4), ("Two", 4), ("Three", 4)]);

        let first: Vec<_> = find_long_methods(temp.path(), 1).take(2).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].method_name, "Two");
    }
}
