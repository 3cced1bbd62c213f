//! Domain models for the bulletin upload flow.
//!
//! - [`UploadSession`] - Result of one upload attempt, as returned by the upload function
//! - [`UploadErrorRecord`] - One row-level validation failure, as stored by the backend
//! - [`Severity`] - Severity of an error group
//! - [`ProcessedErrorGroup`] - Client-side grouping of error records by type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Upload Session
// =============================================================================

/// Result of one upload attempt.
///
/// Every field is optional on the wire; failure bodies returned with non-2xx
/// statuses often carry only `message` or `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSession {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_records: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub valid_records: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub invalid_records: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadSession {
    /// Zero-record failed session used when the upload raised an error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Message to show the user: `message`, else `error`, else `fallback`.
    pub fn display_message<'a>(&'a self, fallback: &'a str) -> &'a str {
        if !self.message.trim().is_empty() {
            &self.message
        } else {
            self.error
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or(fallback)
        }
    }

    /// Whether row-level errors exist on the backend for this session.
    pub fn has_error_details(&self) -> bool {
        !self.success && !self.session_id.is_empty() && self.invalid_records > 0
    }
}

// =============================================================================
// Error Records
// =============================================================================

/// One row-level validation failure recorded by the upload function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadErrorRecord {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sheet_name: String,
    #[serde(default)]
    pub row_number: Option<i64>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error_message: String,
    #[serde(default)]
    pub field_value: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Explicit `null` decodes like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Row ids are uuids on some deployments and serial integers on others.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
        Null(Option<()>),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
        Id::Null(_) => String::new(),
    })
}

impl UploadErrorRecord {
    /// Non-empty field value, if any.
    pub fn example_value(&self) -> Option<&str> {
        self.field_value
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

// =============================================================================
// Error Groups
// =============================================================================

/// Severity of an error group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Sort rank: critical first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    /// Text prefix used by the terminal renderers.
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Critical => "❌",
            Severity::Warning => "⚠️",
            Severity::Info => "ℹ️",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// All records of one error type, with presentation metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedErrorGroup {
    /// Error type tag shared by the grouped records.
    pub error_type: String,
    pub severity: Severity,
    pub title: String,
    /// Summary line including the count.
    pub message: String,
    pub suggestion: String,
    pub count: usize,
    /// Up to three distinct, non-empty offending values.
    pub examples: Vec<String>,
    /// Icon reference for graphical front ends.
    pub icon: String,
}
