//! File intake: only `.xlsx` workbooks are accepted.

use std::path::Path;

use crate::config::ALLOWED_EXTENSION;
use crate::error::{UploadError, UploadResult};

/// A workbook accepted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Whether `name` ends in `.xlsx`, ignoring case.
pub fn is_accepted(name: &str) -> bool {
    name.to_lowercase().ends_with(ALLOWED_EXTENSION)
}

/// File name part of `path`, as shown to the user.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reject anything that is not an `.xlsx` file name.
pub fn check_file_name(name: &str) -> UploadResult<()> {
    if is_accepted(name) {
        Ok(())
    } else {
        Err(UploadError::UnsupportedFile(name.to_string()))
    }
}

/// Read an accepted workbook from disk.
pub async fn read_file(path: &Path) -> UploadResult<SelectedFile> {
    let name = display_name(path);
    check_file_name(&name)?;

    let bytes = tokio::fs::read(path).await?;
    Ok(SelectedFile { name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(is_accepted("bulletin.xlsx"));
        assert!(is_accepted("BULLETIN_Q3.XLSX"));
        assert!(is_accepted("Mixed.XlSx"));
    }

    #[test]
    fn test_rejects_other_extensions() {
        for name in ["report.csv", "bulletin.xls", "bulletin.xlsx.bak", "xlsx", "notes"] {
            assert!(!is_accepted(name), "{} should be rejected", name);
        }
        assert!(matches!(
            check_file_name("report.csv"),
            Err(UploadError::UnsupportedFile(n)) if n == "report.csv"
        ));
    }

    #[test]
    fn test_display_name_uses_file_name() {
        assert_eq!(display_name(Path::new("/tmp/in/bulletin.xlsx")), "bulletin.xlsx");
    }

    #[tokio::test]
    async fn test_read_file_rejects_before_reading() {
        // Path does not exist: the extension check must fail first
        let err = read_file(Path::new("/nonexistent/report.csv")).await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedFile(_)));
    }
}
