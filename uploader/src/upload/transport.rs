//! Upload transport: sends the workbook to the upload function.

use async_trait::async_trait;

use super::intake::SelectedFile;
use crate::auth::AccessToken;
use crate::config::{Config, XLSX_MIME};
use crate::error::{UploadError, UploadResult};

/// Status and raw body of the upload function's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one workbook and returns whatever the server answered.
///
/// Only failures to obtain a response are errors; non-2xx statuses are
/// returned as [`RawResponse`]s for the interpreter.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(&self, file: SelectedFile, token: &AccessToken) -> UploadResult<RawResponse>;
}

/// Multipart POST over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    anon_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.upload_url(),
            anon_key: config.anon_key.clone(),
        }
    }
}

#[async_trait]
impl UploadTransport for HttpTransport {
    async fn send(&self, file: SelectedFile, token: &AccessToken) -> UploadResult<RawResponse> {
        log::info!("Uploading {} ({} bytes) to {}", file.name, file.bytes.len(), self.url);

        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(XLSX_MIME)
            .map_err(|e| UploadError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self
            .client
            .post(&self.url)
            .header("Authorization", token.bearer())
            .multipart(form);
        if let Some(key) = &self.anon_key {
            request = request.header("apikey", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        log::info!("Upload response status: {}", status);
        Ok(RawResponse { status, body })
    }
}
