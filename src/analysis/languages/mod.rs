//! Language-specific analyzer implementations.

mod csharp;

pub use csharp::CSharpAnalyzer;

use super::LanguageAnalyzer;
use once_cell::sync::OnceCell;

/// Static storage for C# analyzer.
static CSHARP_ANALYZER: OnceCell<CSharpAnalyzer> = OnceCell::new();

/// Register all available language analyzers.
///
/// This is idempotent - calling it multiple times is safe. Concurrent
/// callers block until the first initialization finishes.
pub fn register_analyzers() {
    CSHARP_ANALYZER.get_or_init(CSharpAnalyzer::new);
}

/// Get an analyzer for the given file extension (without dot, any case).
///
/// Returns None if no analyzer is registered for the extension.
pub fn get_analyzer(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    // Ensure analyzers are registered
    register_analyzers();

    CSHARP_ANALYZER
        .get()
        .filter(|a| a.handles_extension(ext))
        .map(|a| a as &'static dyn LanguageAnalyzer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_extension() {
        assert!(get_analyzer("cs").is_some());
        assert!(get_analyzer("CS").is_some());
        assert!(get_analyzer("java").is_none());
        assert!(get_analyzer("").is_none());
    }

    #[test]
    fn test_analyzer_identity() {
        let analyzer = get_analyzer("cs").expect("csharp analyzer");
        assert_eq!(analyzer.language_id(), "csharp");
        assert_eq!(analyzer.file_extensions(), &["cs"]);
    }
}
