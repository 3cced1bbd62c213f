//! CSV export of a session's error records.
//!
//! The export always re-fetches the full list from the store, so a search
//! filter active in the detail view never narrows the file.

use std::path::{Path, PathBuf};

use crate::error::ExportResult;
use crate::models::UploadErrorRecord;
use crate::notice::NoticeCenter;
use crate::store::ErrorStore;

/// Header line of the export.
pub const CSV_HEADER: &str = "Sheet Name,Row Number,Column Name,Error Type,Error Message,Field Value";

/// MIME type of the export.
pub const CSV_MIME: &str = "text/csv";

/// `bulletin_upload_errors_<sessionId>.csv`
pub fn export_file_name(session_id: &str) -> String {
    format!("bulletin_upload_errors_{}.csv", session_id)
}

/// Header line plus one line per record, every data field double-quoted.
pub fn errors_to_csv(records: &[UploadErrorRecord]) -> ExportResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for record in records {
        let row_number = record.row_number.map(|n| n.to_string()).unwrap_or_default();
        writer.write_record([
            record.sheet_name.as_str(),
            row_number.as_str(),
            record.column_name.as_deref().unwrap_or(""),
            record.error_type.as_str(),
            record.error_message.as_str(),
            record.field_value.as_deref().unwrap_or(""),
        ])?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(e.error().kind(), e.to_string()))?;

    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + body.len());
    out.push_str(CSV_HEADER);
    out.push('\n');
    // Every field came from a String, so the bytes are valid UTF-8
    out.push_str(&String::from_utf8_lossy(&body));
    Ok(out)
}

/// Fetch every error of `session_id` and write the CSV into `dir`.
///
/// Returns the written path, or `None` when the session has no errors or the
/// export failed; both cases raise a notice.
pub async fn export_errors(
    store: &dyn ErrorStore,
    session_id: &str,
    dir: &Path,
    notices: &NoticeCenter,
) -> Option<PathBuf> {
    match try_export(store, session_id, dir).await {
        Ok(Some(path)) => {
            notices.success(format!("Error report exported to {}", path.display()));
            Some(path)
        }
        Ok(None) => {
            notices.info("No errors to export");
            None
        }
        Err(e) => {
            log::error!("Error exporting upload errors for session {}: {}", session_id, e);
            notices.error("Failed to export errors");
            None
        }
    }
}

async fn try_export(
    store: &dyn ErrorStore,
    session_id: &str,
    dir: &Path,
) -> ExportResult<Option<PathBuf>> {
    let records = store.fetch_errors(session_id).await?;
    if records.is_empty() {
        return Ok(None);
    }

    let csv = errors_to_csv(&records)?;
    let path = dir.join(export_file_name(session_id));
    tokio::fs::write(&path, csv).await?;
    log::info!("Exported {} error records to {} ({})", records.len(), path.display(), CSV_MIME);
    Ok(Some(path))
}
