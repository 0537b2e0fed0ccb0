//! Output formatting for smellcheck results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the typed finding records, for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::detect::{
    DeadCodeFinding, MagicNumberFinding, MethodInfo, NamingViolation, ScanResult, Severity,
    Violation,
};

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report: one array per check, holding the finding records as-is.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_scanned: usize,
    pub long_methods: Vec<MethodInfo>,
    pub magic_numbers: Vec<MagicNumberFinding>,
    pub naming_violations: Vec<NamingViolation>,
    pub dead_code: Vec<DeadCodeFinding>,
    pub total: usize,
}

/// Build the JSON report for a scan.
pub fn json_report(path: &str, result: &ScanResult) -> JsonReport {
    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_scanned: result.scanned,
        long_methods: result.long_methods.clone(),
        magic_numbers: result.magic_numbers.clone(),
        naming_violations: result.naming_violations.clone(),
        dead_code: result.dead_code.clone(),
        total: result.total(),
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, result: &ScanResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&json_report(path, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "smellcheck";

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifReport {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    pub rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "shortDescription")]
    pub short_description: SarifMessage,
    #[serde(rename = "fullDescription", skip_serializing_if = "Option::is_none")]
    pub full_description: Option<SarifMessage>,
    #[serde(rename = "defaultConfiguration")]
    pub default_config: SarifRuleConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRuleConfig {
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: SarifPhysicalLocation,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: SarifArtifact,
    pub region: SarifRegion,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifArtifact {
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SarifRegion {
    #[serde(rename = "startLine")]
    pub start_line: usize,
}

/// Rule metadata for SARIF output.
struct RuleInfo {
    name: &'static str,
    short_description: &'static str,
    full_description: &'static str,
    default_level: &'static str,
}

fn get_rule_info(rule_id: &str) -> RuleInfo {
    match rule_id {
        "long_method" => RuleInfo {
            name: "LongMethod",
            short_description: "Detects methods with too many statements",
            full_description: "Counts the statements directly inside each method body and reports methods at or above the configured threshold.",
            default_level: "warning",
        },
        "magic_number" => RuleInfo {
            name: "MagicNumber",
            short_description: "Detects numeric literals that should be named constants",
            full_description: "Reports every numeric literal other than -1, 0, 1 and 2, with its exact source text.",
            default_level: "note",
        },
        "naming_convention" => RuleInfo {
            name: "NamingConvention",
            short_description: "Detects identifiers that break the casing rule for their kind",
            full_description: "Types, methods, properties, events and constants must be UpperCamelCase; fields, parameters and locals must be lowerCamelCase.",
            default_level: "warning",
        },
        "unused_import" => RuleInfo {
            name: "UnusedImport",
            short_description: "Detects using directives nothing in scope relies on",
            full_description: "Reports a using directive when no identifier in its file (or, for global usings, in the project) is known to come from the imported namespace.",
            default_level: "warning",
        },
        "unreferenced_declaration" => RuleInfo {
            name: "UnreferencedDeclaration",
            short_description: "Detects declarations that are never referenced",
            full_description: "Reports types and members whose name never appears as a reference anywhere in the project.",
            default_level: "warning",
        },
        _ => RuleInfo {
            name: "Unknown",
            short_description: "Unknown rule type",
            full_description: "An unknown violation was detected.",
            default_level: "warning",
        },
    }
}

fn map_severity_to_level(severity: &Severity) -> &'static str {
    match severity {
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.to_string_lossy().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // If they're the same (single file scan), return just the filename
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Build the SARIF report for a scan. File URIs are relative to `base_path`.
pub fn sarif_report(base_path: &Path, result: &ScanResult) -> SarifReport {
    let violations = result.violations();

    // Sorted so the rules list is stable across runs
    let rule_set: BTreeSet<&'static str> = violations.iter().map(|v| v.rule.as_str()).collect();

    let rules: Vec<SarifRule> = rule_set
        .iter()
        .map(|rule_id| {
            let info = get_rule_info(rule_id);
            SarifRule {
                id: rule_id.to_string(),
                name: info.name.to_string(),
                short_description: SarifMessage {
                    text: info.short_description.to_string(),
                },
                full_description: Some(SarifMessage {
                    text: info.full_description.to_string(),
                }),
                default_config: SarifRuleConfig {
                    level: info.default_level.to_string(),
                },
            }
        })
        .collect();

    let results: Vec<SarifResult> = violations
        .iter()
        .map(|v| SarifResult {
            rule_id: v.rule.as_str().to_string(),
            level: map_severity_to_level(&v.severity).to_string(),
            message: SarifMessage {
                text: v.message.clone(),
            },
            locations: vec![SarifLocation {
                physical_location: SarifPhysicalLocation {
                    artifact_location: SarifArtifact {
                        uri: make_relative_path(&v.file, base_path),
                    },
                    region: SarifRegion {
                        start_line: if v.line > 0 { v.line } else { 1 },
                    },
                },
            }],
        })
        .collect();

    SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    }
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &ScanResult) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&sarif_report(base_path, result))?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, result: &ScanResult) {
    // Header
    println!();
    print!("  ");
    print!("{}", "smellcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    print!("  {}", "Files:    ".dimmed());
    println!("{}", result.scanned);
    println!();

    let violations = result.violations();
    if !violations.is_empty() {
        write_violations(&violations);
        println!();
    }

    write_breakdown(result);
    println!();

    write_final_status(result);
    println!();
}

fn write_violations(violations: &[Violation]) {
    println!("  {} ({}):", "Findings".bold(), violations.len());
    println!();

    for v in violations {
        write_severity_tag(&v.severity);
        print!("   ");
        print!("{:<26}", v.rule.as_str().dimmed());
        print!("{}", v.file.blue());
        if v.line > 0 {
            print!("{}", format!(":{}", v.line).dimmed());
        }
        println!();

        // Message on next line, indented
        println!("            {}", v.message);
        println!();
    }
}

fn write_severity_tag(severity: &Severity) {
    match severity {
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
        Severity::Info => print!("    {} ", "INFO ".blue()),
    }
}

fn write_breakdown(result: &ScanResult) {
    println!("  {}", "Breakdown:".bold());

    let rows = [
        ("long methods", result.long_methods.len()),
        ("magic numbers", result.magic_numbers.len()),
        ("naming", result.naming_violations.len()),
        ("dead code", result.dead_code.len()),
    ];
    for (check, count) in rows {
        let plural = if count != 1 { "s" } else { "" };
        let line = format!("    {:<20} {:>4} finding{}", check, count, plural);
        if count == 0 {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}

fn write_final_status(result: &ScanResult) {
    if result.is_clean() {
        println!("  {}", "✓ CLEAN".green());
    } else {
        println!(
            "  {}  {} total",
            "✗ FINDINGS".red(),
            result.total().to_string().bold()
        );
    }
}
