//! Mock of the hosted backend: the upload function and the error records table.
//!
//! The upload function answers according to the uploaded file name:
//!
//! | File name           | Answer                                            |
//! |---------------------|---------------------------------------------------|
//! | `good.xlsx`         | 200, success                                      |
//! | `bad.xlsx`          | 200, soft failure with three stored error rows    |
//! | `structured.xlsx`   | 422, failure JSON with two stored error rows      |
//! | `huge.xlsx`         | 413, plain-text body                              |
//! | anything else       | 500, plain-text body                              |
//!
//! Requests without `Bearer test-token` get a plain-text 401.

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const TOKEN: &str = "test-token";
pub const ANON_KEY: &str = "anon-key";

/// Everything the mock saw, plus the rows it serves.
#[derive(Clone, Default)]
pub struct MockState {
    rows: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    pub uploads: Arc<Mutex<Vec<(String, usize)>>>,
    pub error_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    pub api_keys: Arc<Mutex<Vec<String>>>,
}

impl MockState {
    pub fn uploads(&self) -> Vec<(String, usize)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn error_queries(&self) -> Vec<HashMap<String, String>> {
        self.error_queries.lock().unwrap().clone()
    }

    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().unwrap().clone()
    }

    pub fn insert_rows(&self, session_id: &str, rows: Vec<Value>) {
        self.rows.lock().unwrap().insert(session_id.to_string(), rows);
    }
}

pub struct MockBackend {
    pub url: String,
    pub state: MockState,
}

/// Start the mock on an ephemeral port.
pub async fn spawn_backend() -> MockBackend {
    let state = MockState::default();
    let app = Router::new()
        .route("/functions/v1/bulletin-pricing-upload", post(upload_function))
        .route("/rest/v1/bulletin_upload_errors", get(error_rows))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend {
        url: format!("http://{}", addr),
        state,
    }
}

/// Write a fake workbook named `name` into a fresh temp dir.
pub fn workbook(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, b"PK\x03\x04 fake workbook").unwrap();
    (dir, path)
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

fn record_api_key(state: &MockState, headers: &HeaderMap) {
    if let Some(key) = headers.get("apikey").and_then(|v| v.to_str().ok()) {
        state.api_keys.lock().unwrap().push(key.to_string());
    }
}

fn row(id: Value, session: &str, sheet: &str, row: i64, column: &str, error_type: &str, message: &str, value: &str) -> Value {
    json!({
        "id": id,
        "session_id": session,
        "sheet_name": sheet,
        "row_number": row,
        "column_name": column,
        "error_type": error_type,
        "error_message": message,
        "field_value": value,
        "created_at": "2024-05-01T10:00:00+00:00",
    })
}

async fn upload_function(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    record_api_key(&state, &headers);
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, "Invalid JWT").into_response();
    }

    let mut file: Option<(String, usize)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or("").to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            file = Some((name, bytes.len()));
        }
    }

    let Some((name, size)) = file else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "No file provided"}))).into_response();
    };
    state.uploads.lock().unwrap().push((name.clone(), size));

    let session_id = uuid::Uuid::new_v4().to_string();
    match name.as_str() {
        "good.xlsx" => Json(json!({
            "success": true,
            "sessionId": session_id,
            "totalRecords": 12,
            "validRecords": 12,
            "invalidRecords": 0,
            "message": "Uploaded 12 pricing records",
        }))
        .into_response(),

        "bad.xlsx" => {
            // Deliberately out of order
            state.insert_rows(
                &session_id,
                vec![
                    row(json!(3), &session_id, "PROG002_RETAIL", 4, "Rate", "INVALID_PRICING_VALUE", "Not a number", "abc"),
                    row(json!(1), &session_id, "PROG001_LEASE", 7, "Lender", "INVALID_LENDER", "Unknown lender", "ZZZ"),
                    row(json!(2), &session_id, "PROG001_LEASE", 2, "Lender", "INVALID_LENDER", "Unknown lender", "YYY"),
                ],
            );
            Json(json!({
                "success": false,
                "sessionId": session_id,
                "totalRecords": 10,
                "validRecords": 7,
                "invalidRecords": 3,
                "message": "3 rows failed validation",
            }))
            .into_response()
        }

        "structured.xlsx" => {
            state.insert_rows(
                &session_id,
                vec![
                    row(json!(null), &session_id, "PROG001_LEASE", 3, "Region", "INVALID_GEO_CODE", "Unknown region", "XX"),
                    row(json!("r-2"), &session_id, "PROG001_LEASE", 5, "Region", "INVALID_GEO_CODE", "Unknown region", "QQ"),
                ],
            );
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "success": false,
                    "sessionId": session_id,
                    "totalRecords": 5,
                    "validRecords": 3,
                    "invalidRecords": 2,
                    "error": "Validation failed",
                })),
            )
                .into_response()
        }

        "huge.xlsx" => (StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large").into_response(),

        _ => (StatusCode::INTERNAL_SERVER_ERROR, "").into_response(),
    }
}

async fn error_rows(
    State(state): State<MockState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record_api_key(&state, &headers);
    state.error_queries.lock().unwrap().push(params.clone());

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "JWT expired"}))).into_response();
    }

    let session_id = params
        .get("session_id")
        .and_then(|filter| filter.strip_prefix("eq."))
        .unwrap_or("");
    if session_id == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "relation does not exist").into_response();
    }

    let rows = state
        .rows
        .lock()
        .unwrap()
        .get(session_id)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(rows)).into_response()
}
