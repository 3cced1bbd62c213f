//! Classification of raw error records into presentation groups.
//!
//! ```text
//! records (raw rows)                     groups (sorted by severity)
//! ┌──────────────────────────────┐      ┌────────────────────────────────┐
//! │ INVALID_PRICING_VALUE  "abc" │      │ critical  Invalid Lender   (2) │
//! │ INVALID_LENDER         "ZZZ" │  →   │ warning   Missing Term     (1) │
//! │ MISSING_TERM           ""    │      │ info      Invalid Pricing  (1) │
//! │ INVALID_LENDER         "QQQ" │      └────────────────────────────────┘
//! └──────────────────────────────┘
//! ```
//!
//! Known error types get their metadata from [`ERROR_CATALOG`]; anything else
//! falls back to a title derived from the tag.

use std::collections::HashMap;

use crate::config::MAX_EXAMPLES;
use crate::models::{ProcessedErrorGroup, Severity, UploadErrorRecord};

/// Presentation metadata for one error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorKind {
    pub tag: &'static str,
    pub severity: Severity,
    pub title: &'static str,
    /// What the affected rows have, completing "N rows have ...".
    pub problem: &'static str,
    pub suggestion: &'static str,
    pub icon: &'static str,
}

/// Error types reported by the upload function.
pub const ERROR_CATALOG: &[ErrorKind] = &[
    ErrorKind {
        tag: "INVALID_LENDER",
        severity: Severity::Critical,
        title: "Invalid Lender",
        problem: "lender codes not found in the system",
        suggestion: "Check that the lender codes match lenders configured in the system.",
        icon: "building",
    },
    ErrorKind {
        tag: "INVALID_GEO_CODE",
        severity: Severity::Critical,
        title: "Invalid Geographic Code",
        problem: "unrecognized geographic codes",
        suggestion: "Use geographic codes that exist in the system (for example state or region codes).",
        icon: "map-pin",
    },
    ErrorKind {
        tag: "INVALID_CREDIT_PROFILE",
        severity: Severity::Warning,
        title: "Invalid Credit Profile",
        problem: "credit profiles that do not exist",
        suggestion: "Make sure the credit profile names match existing credit profiles exactly.",
        icon: "users",
    },
    ErrorKind {
        tag: "INVALID_PRICING_CONFIG",
        severity: Severity::Warning,
        title: "Invalid Pricing Configuration",
        problem: "pricing configurations that do not exist",
        suggestion: "Make sure the pricing configuration names match existing pricing configurations.",
        icon: "settings",
    },
    ErrorKind {
        tag: "INVALID_PRICING_VALUE",
        severity: Severity::Info,
        title: "Invalid Pricing Value",
        problem: "non-numeric or malformed pricing values",
        suggestion: "Pricing values must be numbers (rates as decimals, e.g. 0.0425).",
        icon: "dollar-sign",
    },
];

const DEFAULT_SUGGESTION: &str =
    "Review the detailed error list below and correct the affected rows.";
const DEFAULT_ICON: &str = "alert-triangle";

/// Catalog entry for `tag`, if known.
pub fn lookup(tag: &str) -> Option<&'static ErrorKind> {
    ERROR_CATALOG.iter().find(|kind| kind.tag == tag)
}

/// `SOME_ERROR_TYPE` -> `Some Error Type`.
pub fn humanize_tag(tag: &str) -> String {
    tag.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Group records by error type and attach presentation metadata.
///
/// Groups are ordered by severity (critical, warning, info); groups with the
/// same severity keep the order in which their type first appeared.
pub fn classify_errors(records: &[UploadErrorRecord]) -> Vec<ProcessedErrorGroup> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_type: HashMap<&str, Vec<&UploadErrorRecord>> = HashMap::new();

    for record in records {
        let tag = record.error_type.as_str();
        by_type
            .entry(tag)
            .or_insert_with(|| {
                order.push(tag);
                Vec::new()
            })
            .push(record);
    }

    let mut groups: Vec<ProcessedErrorGroup> = order
        .into_iter()
        .map(|tag| build_group(tag, &by_type[tag]))
        .collect();

    // sort_by_key is stable
    groups.sort_by_key(|group| group.severity.rank());
    groups
}

fn build_group(tag: &str, records: &[&UploadErrorRecord]) -> ProcessedErrorGroup {
    let count = records.len();
    let examples = example_values(records);

    match lookup(tag) {
        Some(kind) => ProcessedErrorGroup {
            error_type: tag.to_string(),
            severity: kind.severity,
            title: kind.title.to_string(),
            message: format!(
                "{} {} {}",
                count,
                plural(count, "row has", "rows have"),
                kind.problem
            ),
            suggestion: kind.suggestion.to_string(),
            count,
            examples,
            icon: kind.icon.to_string(),
        },
        None => {
            let title = humanize_tag(tag);
            ProcessedErrorGroup {
                error_type: tag.to_string(),
                severity: Severity::Warning,
                message: format!("{} {} of type \"{}\"", count, plural(count, "error", "errors"), title),
                title,
                suggestion: DEFAULT_SUGGESTION.to_string(),
                count,
                examples,
                icon: DEFAULT_ICON.to_string(),
            }
        }
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Distinct non-empty field values, in first-seen order, capped.
fn example_values(records: &[&UploadErrorRecord]) -> Vec<String> {
    let mut examples: Vec<String> = Vec::new();
    for value in records.iter().filter_map(|r| r.example_value()) {
        if examples.len() == MAX_EXAMPLES {
            break;
        }
        if !examples.iter().any(|seen| seen == value) {
            examples.push(value.to_string());
        }
    }
    examples
}
