//! Project-wide view over the facts of many files.
//!
//! The ProjectContext provides:
//! - Parallel fact extraction for a batch of files
//! - The set of names referenced anywhere in the project
//! - Names declared under each namespace and each type

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::analysis::{Declaration, DeclarationKind, FileFacts};
use crate::source::SourceFile;

/// Facts for a set of files, indexed for cross-file lookups.
///
/// Files that could not be parsed contribute nothing. File order is the
/// order the files were given in.
pub struct ProjectContext<'a> {
    files: Vec<&'a FileFacts>,
    /// Every referenced name, across all files.
    referenced: HashSet<&'a str>,
    /// Namespace or `Namespace.Type` (`Namespace.Outer.Inner` when nested)
    /// -> names a `using` of it brings into scope.
    scopes: HashMap<String, HashSet<&'a str>>,
    /// Whether any file uses LINQ query syntax.
    query_syntax: bool,
}

impl<'a> ProjectContext<'a> {
    /// Parse every file (in parallel) and index the results.
    pub fn from_sources(sources: &'a [SourceFile]) -> Self {
        let files: Vec<&FileFacts> = sources.par_iter().filter_map(|f| f.facts()).collect();
        Self::from_facts(files)
    }

    /// Index already-extracted facts.
    pub fn from_facts(files: Vec<&'a FileFacts>) -> Self {
        let mut referenced = HashSet::new();
        let mut scopes: HashMap<String, HashSet<&'a str>> = HashMap::new();
        let mut query_syntax = false;

        for facts in files.iter().copied() {
            referenced.extend(facts.references.iter().map(|r| r.name.as_str()));
            query_syntax |= facts.uses_query_syntax;

            for decl in &facts.declarations {
                for (scope, name) in scope_entries(decl) {
                    scopes.entry(scope).or_default().insert(name);
                }
            }
        }

        Self {
            files,
            referenced,
            scopes,
            query_syntax,
        }
    }

    /// Facts of every parsed file, in input order.
    pub fn files(&self) -> &[&'a FileFacts] {
        &self.files
    }

    /// Whether `name` is referenced in any file.
    pub fn is_referenced(&self, name: &str) -> bool {
        self.referenced.contains(name)
    }

    /// All names referenced in the project.
    pub fn referenced_names(&self) -> &HashSet<&'a str> {
        &self.referenced
    }

    /// Names the project declares directly inside a namespace or type.
    pub fn declared_in(&self, scope: &str) -> Option<&HashSet<&'a str>> {
        self.scopes.get(scope)
    }

    /// Whether any file uses LINQ query syntax.
    pub fn uses_query_syntax(&self) -> bool {
        self.query_syntax
    }

    /// Number of files that parsed.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Where a declaration is visible by simple name after a `using`.
///
/// Extension methods are also usable after a `using` of their namespace,
/// without naming the static class that declares them.
fn scope_entries(decl: &Declaration) -> Vec<(String, &str)> {
    if decl.kind == DeclarationKind::Namespace {
        // `A.B.C` is a member of `A.B`
        return match decl.name.rsplit_once('.') {
            Some((parent, last)) => vec![(parent.to_string(), last)],
            None => Vec::new(),
        };
    }

    let qualify = |name: &str| match &decl.namespace {
        Some(ns) => format!("{}.{}", ns, name),
        None => name.to_string(),
    };

    let mut entries = Vec::new();
    match (&decl.container, decl.kind) {
        (Some(container), kind) if kind.is_member() || kind.is_type() => {
            entries.push((qualify(container.as_str()), decl.symbol()));
        }
        (None, kind) if kind.is_type() => {
            if let Some(ns) = &decl.namespace {
                entries.push((ns.clone(), decl.symbol()));
            }
        }
        _ => {}
    }

    if decl.is_extension {
        if let Some(ns) = &decl.namespace {
            entries.push((ns.clone(), decl.symbol()));
        }
    }
    entries
}
