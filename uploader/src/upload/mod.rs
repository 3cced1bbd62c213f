//! Upload orchestration.
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌─────────────┐   ┌──────────────┐
//! │  Intake  │──▶│  Token   │──▶│ Transport │──▶│ Interpreter │──▶│ Error fetch  │
//! │ (.xlsx)  │   │ (auth)   │   │ (POST)    │   │ (JSON)      │   │ (on failure) │
//! └──────────┘   └──────────┘   └───────────┘   └─────────────┘   └──────────────┘
//! ```
//!
//! State machine: `Idle → Uploading → {Succeeded | FailedWithDetail | FailedGeneric}`.
//! Only [`UploadOrchestrator::reset`] returns to `Idle`.

pub mod intake;
pub mod interpret;
pub mod transport;

use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

use crate::auth::AuthProvider;
use crate::classify::classify_errors;
use crate::error::{AuthError, UploadError, UploadResult};
use crate::models::{ProcessedErrorGroup, UploadErrorRecord, UploadSession};
use crate::notice::NoticeCenter;
use crate::store::{ErrorFetcher, ErrorStore};

pub use intake::{is_accepted, SelectedFile};
pub use interpret::interpret;
pub use transport::{HttpTransport, RawResponse, UploadTransport};

/// Progress of the in-flight request. There is no byte-level progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    NotStarted,
    InProgress,
    Complete,
}

/// Upload lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Uploading,
    Succeeded,
    FailedWithDetail,
    FailedGeneric,
}

/// Why an upload was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Not an `.xlsx` file.
    UnsupportedFile,
    /// A previous result is still displayed; call `reset` first.
    NotIdle,
}

/// Result of one call to [`UploadOrchestrator::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was transmitted.
    Rejected { file_name: String, reason: RejectReason },
    /// The server accepted and stored every record.
    Succeeded(UploadSession),
    /// The server answered with a structured failure.
    FailedWithDetail {
        session: UploadSession,
        errors: Vec<UploadErrorRecord>,
    },
    /// The upload raised an error; `session` is a synthetic zero-record result.
    FailedGeneric { session: UploadSession, error: String },
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Succeeded(_))
    }

    pub fn session(&self) -> Option<&UploadSession> {
        match self {
            UploadOutcome::Rejected { .. } => None,
            UploadOutcome::Succeeded(session)
            | UploadOutcome::FailedWithDetail { session, .. }
            | UploadOutcome::FailedGeneric { session, .. } => Some(session),
        }
    }
}

/// Invoked once per successful upload.
pub type CompletionCallback = Box<dyn FnMut(&UploadSession) + Send>;

const SUCCESS_FALLBACK: &str = "Bulletin pricing uploaded successfully";
const FAILURE_FALLBACK: &str = "Upload failed";

/// User-facing guidance for an upload error.
pub fn user_message(err: &UploadError) -> String {
    match err {
        UploadError::UnsupportedFile(_) => "Please select an Excel file (.xlsx).".to_string(),
        UploadError::Auth(AuthError::Required) => {
            "Authentication required. Please sign in and try again.".to_string()
        }
        UploadError::Auth(AuthError::InvalidToken(_)) | UploadError::Http { status: 401, .. } => {
            "Authentication failed. Please sign in again and retry the upload.".to_string()
        }
        UploadError::Http { status: 403, .. } => {
            "You do not have permission to upload bulletin pricing.".to_string()
        }
        UploadError::Http { status: 413, .. } => {
            "The file is too large. Reduce the file size and try again.".to_string()
        }
        UploadError::Http { status: 500, .. } => {
            "The server could not process the file. Check the workbook format and try again."
                .to_string()
        }
        UploadError::Network(_) => {
            "Could not reach the upload service. Check your connection and try again.".to_string()
        }
        other => format!("Upload failed: {}", other),
    }
}

/// Drives one upload at a time and keeps the resulting state.
pub struct UploadOrchestrator {
    transport: Arc<dyn UploadTransport>,
    auth: Arc<dyn AuthProvider>,
    fetcher: ErrorFetcher,
    notices: NoticeCenter,
    on_complete: Option<CompletionCallback>,
    state: watch::Sender<UploadState>,
    progress: watch::Sender<Progress>,
    result: Option<UploadSession>,
}

impl UploadOrchestrator {
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        store: Arc<dyn ErrorStore>,
        auth: Arc<dyn AuthProvider>,
        notices: NoticeCenter,
    ) -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        let (progress, _) = watch::channel(Progress::NotStarted);

        Self {
            transport,
            auth,
            fetcher: ErrorFetcher::new(store, notices.clone()),
            notices,
            on_complete: None,
            state,
            progress,
            result: None,
        }
    }

    /// Set the callback invoked after a successful upload.
    pub fn on_complete(mut self, callback: impl FnMut(&UploadSession) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> UploadState {
        *self.state.borrow()
    }

    pub fn progress(&self) -> Progress {
        *self.progress.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn watch_progress(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Session of the last upload, if any.
    pub fn result(&self) -> Option<&UploadSession> {
        self.result.as_ref()
    }

    /// Error records loaded for the last failed upload.
    pub fn errors(&self) -> &[UploadErrorRecord] {
        self.fetcher.errors()
    }

    /// Error records grouped for the summary view.
    pub fn groups(&self) -> Vec<ProcessedErrorGroup> {
        classify_errors(self.fetcher.errors())
    }

    pub fn is_loading_errors(&self) -> bool {
        self.fetcher.is_loading()
    }

    /// `true` while the error records of a failed upload are being loaded.
    pub fn watch_loading_errors(&self) -> watch::Receiver<bool> {
        self.fetcher.watch_loading()
    }

    pub fn store(&self) -> Arc<dyn ErrorStore> {
        self.fetcher.store()
    }

    pub fn notices(&self) -> &NoticeCenter {
        &self.notices
    }

    /// Discard the last result and return to `Idle`.
    pub fn reset(&mut self) {
        self.result = None;
        self.fetcher.clear();
        self.state.send_replace(UploadState::Idle);
        self.progress.send_replace(Progress::NotStarted);
    }

    /// Upload the workbook at `path`.
    ///
    /// Never returns an error: every failure ends as a notice plus a failed
    /// outcome.
    pub async fn upload(&mut self, path: &Path) -> UploadOutcome {
        let file_name = intake::display_name(path);

        if !is_accepted(&file_name) {
            self.notices.error(format!(
                "\"{}\" is not an Excel file. Please select a .xlsx file.",
                file_name
            ));
            return UploadOutcome::Rejected {
                file_name,
                reason: RejectReason::UnsupportedFile,
            };
        }

        if self.state() != UploadState::Idle {
            self.notices
                .warning("Close the current upload result before starting a new upload.");
            return UploadOutcome::Rejected {
                file_name,
                reason: RejectReason::NotIdle,
            };
        }

        self.state.send_replace(UploadState::Uploading);
        self.progress.send_replace(Progress::InProgress);
        log::info!("Starting upload of {}", file_name);

        let attempt = self.submit(path).await;
        self.progress.send_replace(Progress::Complete);

        match attempt {
            Ok(session) if session.success => self.finish_success(session),
            Ok(session) => self.finish_failure(session).await,
            Err(err) => self.finish_error(err),
        }
    }

    async fn submit(&self, path: &Path) -> UploadResult<UploadSession> {
        let token = self.auth.access_token()?;
        let file = intake::read_file(path).await?;
        let response = self.transport.send(file, &token).await?;
        interpret(&response)
    }

    fn finish_success(&mut self, session: UploadSession) -> UploadOutcome {
        log::info!(
            "Upload succeeded: {} of {} records valid",
            session.valid_records,
            session.total_records
        );
        self.notices.success(session.display_message(SUCCESS_FALLBACK));

        if let Some(callback) = self.on_complete.as_mut() {
            callback(&session);
        }

        self.result = Some(session.clone());
        self.state.send_replace(UploadState::Succeeded);
        UploadOutcome::Succeeded(session)
    }

    async fn finish_failure(&mut self, session: UploadSession) -> UploadOutcome {
        log::warn!(
            "Upload rejected: {} invalid of {} records (session {:?})",
            session.invalid_records,
            session.total_records,
            session.session_id
        );
        self.notices.error(session.display_message(FAILURE_FALLBACK));
        self.result = Some(session.clone());

        if session.has_error_details() {
            self.fetcher.load(&session.session_id).await;
        }

        self.state.send_replace(UploadState::FailedWithDetail);
        UploadOutcome::FailedWithDetail {
            errors: self.fetcher.errors().to_vec(),
            session,
        }
    }

    fn finish_error(&mut self, err: UploadError) -> UploadOutcome {
        log::error!("Upload error: {}", err);
        let message = user_message(&err);
        self.notices.error(message.clone());

        let session = UploadSession::failed(message.clone());
        self.result = Some(session.clone());
        self.state.send_replace(UploadState::FailedGeneric);
        UploadOutcome::FailedGeneric { session, error: message }
    }
}
