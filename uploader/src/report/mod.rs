//! Presentation of upload results.
//!
//! - [`SummaryView`] - Top error groups with example chips
//! - [`DetailView`] - Raw records, searchable and grouped by sheet
//! - [`render_session`] - One-paragraph description of an upload result

mod detail;
mod summary;

pub use detail::{matches_search, DetailView};
pub use summary::{ExampleChip, SummaryView};

use crate::models::UploadSession;

/// Headline and record counts of an upload result.
pub fn render_session(session: &UploadSession) -> String {
    let headline = if session.success {
        format!("✅ {}", session.display_message("Upload successful"))
    } else {
        format!("❌ {}", session.display_message("Upload failed"))
    };

    let mut out = headline;
    if session.total_records > 0 || session.invalid_records > 0 {
        out.push_str(&format!(
            "\n   Records: {} total, {} valid, {} invalid",
            session.total_records, session.valid_records, session.invalid_records
        ));
    }
    if !session.session_id.is_empty() {
        out.push_str(&format!("\n   Session: {}", session.session_id));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_failed_session() {
        let session = UploadSession {
            success: false,
            session_id: "abc".to_string(),
            total_records: 10,
            valid_records: 7,
            invalid_records: 3,
            message: "fail".to_string(),
            error: None,
        };
        assert_eq!(
            render_session(&session),
            "❌ fail\n   Records: 10 total, 7 valid, 3 invalid\n   Session: abc"
        );
    }

    #[test]
    fn test_render_synthetic_session() {
        let session = UploadSession::failed("Upload failed: HTTP 418");
        assert_eq!(render_session(&session), "❌ Upload failed: HTTP 418");
    }
}
