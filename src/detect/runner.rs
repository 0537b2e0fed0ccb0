//! Detection runner that orchestrates all checks.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use tracing::info;

use crate::config::Config;
use crate::source::{SourceFile, SourceLoader};

use super::{
    long_methods_in, magic_numbers_in, naming_violations_in, DeadCodeDetector, ScanResult,
};

/// One of the four checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Check {
    LongMethods,
    MagicNumbers,
    Naming,
    DeadCode,
}

impl Check {
    pub const ALL: [Check; 4] = [
        Check::LongMethods,
        Check::MagicNumbers,
        Check::Naming,
        Check::DeadCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Check::LongMethods => "long-methods",
            Check::MagicNumbers => "magic-numbers",
            Check::Naming => "naming",
            Check::DeadCode => "dead-code",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Executes the selected checks against a file or directory.
pub struct Runner {
    config: Config,
    /// Explicit selection; when empty, checks enabled in the config run.
    checks: Vec<Check>,
    threshold: Option<usize>,
    max_findings: Option<usize>,
}

impl Runner {
    /// Create a new detection runner.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            checks: Vec::new(),
            threshold: None,
            max_findings: None,
        }
    }

    /// Run only these checks, regardless of the config's `enabled` flags.
    pub fn checks(mut self, checks: &[Check]) -> Self {
        self.checks = checks.to_vec();
        self
    }

    /// Override the config's long method threshold.
    pub fn threshold(mut self, threshold: Option<usize>) -> Self {
        self.threshold = threshold;
        self
    }

    /// Keep at most this many findings per check.
    pub fn max_findings(mut self, max: Option<usize>) -> Self {
        self.max_findings = max;
        self
    }

    /// Whether a check will run.
    pub fn is_enabled(&self, check: Check) -> bool {
        if !self.checks.is_empty() {
            return self.checks.contains(&check);
        }
        match check {
            Check::LongMethods => self.config.long_methods.enabled,
            Check::MagicNumbers => self.config.magic_numbers.enabled,
            Check::Naming => self.config.naming.enabled,
            Check::DeadCode => self.config.dead_code.enabled,
        }
    }

    /// Run all enabled checks. Each file is read and parsed once.
    pub fn run<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<ScanResult> {
        let loader = SourceLoader::new().with_excluded_paths(&self.config.excluded_paths)?;
        let files: Vec<SourceFile> = loader.load_path(path.as_ref()).collect();
        info!(files = files.len(), path = %path.as_ref().display(), "loaded sources");

        let limit = self.max_findings.unwrap_or(usize::MAX);
        let mut result = ScanResult::new();
        result.scanned = files.len();

        if self.is_enabled(Check::LongMethods) {
            let threshold = self.threshold.unwrap_or(self.config.long_methods.threshold);
            result.long_methods = files
                .iter()
                .flat_map(|f| long_methods_in(f, threshold))
                .take(limit)
                .collect();
            info!(count = result.long_methods.len(), threshold, "long methods");
        }

        if self.is_enabled(Check::MagicNumbers) {
            result.magic_numbers = files
                .iter()
                .flat_map(magic_numbers_in)
                .take(limit)
                .collect();
            info!(count = result.magic_numbers.len(), "magic numbers");
        }

        if self.is_enabled(Check::Naming) {
            result.naming_violations = files
                .iter()
                .flat_map(naming_violations_in)
                .take(limit)
                .collect();
            info!(count = result.naming_violations.len(), "naming violations");
        }

        if self.is_enabled(Check::DeadCode) {
            let detector = DeadCodeDetector::new()
                .with_entry_points(self.config.dead_code.entry_points.iter().cloned())
                .with_known_namespaces(self.config.dead_code.known_namespaces.clone());
            result.dead_code = detector.detect(&files);
            result.dead_code.truncate(limit);
            info!(count = result.dead_code.len(), "dead code");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_project(temp: &TempDir) {
        std::fs::write(
            temp.path().join("Screen.cs"),
            r#"using System.Text;

class screen
{
    static void Main()
    {
        var width = 1920;
        var height = 1080;
    }
}
"#,
        )
        .unwrap();
    }

    #[test]
    fn test_runner_all_checks() {
        let temp = TempDir::new().unwrap();
        write_project(&temp);

        let result = Runner::new(Config::default()).run(temp.path()).unwrap();

        assert_eq!(result.scanned, 1);
        assert!(result.long_methods.is_empty());
        assert_eq!(result.magic_numbers.len(), 2);
        assert_eq!(result.naming_violations.len(), 1);
        assert_eq!(result.naming_violations[0].identifier_name, "screen");
        // unused `using System.Text` and the unreferenced class
        assert_eq!(result.dead_code.len(), 2);
        assert_eq!(result.total(), 5);
    }

    #[test]
    fn test_runner_selected_checks_and_limits() {
        let temp = TempDir::new().unwrap();
        write_project(&temp);

        let result = Runner::new(Config::default())
            .checks(&[Check::MagicNumbers, Check::LongMethods])
            .threshold(Some(2))
            .max_findings(Some(1))
            .run(temp.path())
            .unwrap();

        assert_eq!(result.long_methods.len(), 1);
        assert_eq!(result.long_methods[0].method_name, "Main");
        assert_eq!(result.magic_numbers.len(), 1);
        assert_eq!(result.magic_numbers[0].value, "1920");
        assert!(result.naming_violations.is_empty());
        assert!(result.dead_code.is_empty());
    }

    #[test]
    fn test_runner_respects_config() {
        let temp = TempDir::new().unwrap();
        write_project(&temp);

        let mut config = Config::default();
        config.magic_numbers.enabled = false;
        config.dead_code.enabled = false;
        config.excluded_paths = vec!["Screen.cs".to_string()];

        let runner = Runner::new(config);
        assert!(!runner.is_enabled(Check::MagicNumbers));
        assert!(runner.is_enabled(Check::Naming));

        let result = runner.run(temp.path()).unwrap();
        assert_eq!(result.scanned, 0);
        assert!(result.is_clean());
    }

    #[test]
    fn test_check_names() {
        let names: Vec<_> = Check::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["long-methods", "magic-numbers", "naming", "dead-code"]);
    }
}
