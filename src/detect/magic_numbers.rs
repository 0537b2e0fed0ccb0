//! Detection of magic numbers: numeric literals without a named constant.
//!
//! Small values used as loop bounds, flags or indices are idiomatic, so a
//! fixed allow-list is exempt rather than anything under a magnitude.

use std::path::Path;

use phf::phf_set;

use crate::source::{SourceFile, SourceLoader};

use super::MagicNumberFinding;

/// Literals that are never magic, by exact text.
static COMMON_LITERALS: phf::Set<&'static str> = phf_set! {
    "-1", "0", "1", "2",
};

/// Numeric values that are never magic, whatever their spelling.
const COMMON_VALUES: [f64; 4] = [-1.0, 0.0, 1.0, 2.0];

/// Find numeric literals outside the allow-list under `path` (a file or a
/// directory).
///
/// Every occurrence is reported once, with its exact source text as the
/// value. A missing or empty path yields an empty sequence.
pub fn find_magic_numbers<P: AsRef<Path>>(path: P) -> impl Iterator<Item = MagicNumberFinding> {
    find_magic_numbers_with(&SourceLoader::default(), path)
}

/// Like [`find_magic_numbers`], using a configured loader.
pub fn find_magic_numbers_with<P: AsRef<Path>>(
    loader: &SourceLoader,
    path: P,
) -> impl Iterator<Item = MagicNumberFinding> {
    loader
        .load_path(path.as_ref().to_path_buf())
        .flat_map(|file| magic_numbers_in(&file))
}

/// Magic numbers in a single file.
pub fn magic_numbers_in(file: &SourceFile) -> Vec<MagicNumberFinding> {
    let Some(facts) = file.facts() else {
        return Vec::new();
    };

    facts
        .literals
        .iter()
        .filter(|lit| !is_common_literal(&lit.text))
        .map(|lit| MagicNumberFinding {
            value: lit.text.clone(),
            file: facts.path.clone(),
            line: lit.span.start_line,
        })
        .collect()
}

/// Whether a literal is on the allow-list.
///
/// `0L`, `1.0`, `2f` and `0x0` count as their plain values.
pub fn is_common_literal(text: &str) -> bool {
    if COMMON_LITERALS.contains(text) {
        return true;
    }
    numeric_value(text)
        .map(|v| COMMON_VALUES.contains(&v))
        .unwrap_or(false)
}

/// Parse a C-family numeric literal (sign, separators, radix prefixes and
/// type suffixes allowed).
fn numeric_value(text: &str) -> Option<f64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text),
    };
    let body = body.replace('_', "");
    let lower = body.to_ascii_lowercase();

    let magnitude = if let Some(hex) = lower.strip_prefix("0x") {
        let digits = hex.trim_end_matches(['u', 'l']);
        u64::from_str_radix(digits, 16).ok()? as f64
    } else if let Some(bin) = lower.strip_prefix("0b") {
        let digits = bin.trim_end_matches(['u', 'l']);
        u64::from_str_radix(digits, 2).ok()? as f64
    } else {
        let digits = lower.trim_end_matches(['u', 'l', 'f', 'd', 'm']);
        digits.parse::<f64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}
