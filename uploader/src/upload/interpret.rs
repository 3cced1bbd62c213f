//! Turns the upload function's raw response into an [`UploadSession`].
//!
//! | Status | Body                  | Result                                   |
//! |--------|-----------------------|------------------------------------------|
//! | 2xx    | upload result JSON    | `Ok(session)` (success or soft failure)  |
//! | 2xx    | anything else         | `Err(InvalidResponse)`                   |
//! | non-2xx| JSON object           | `Ok(session)` with `success` forced false |
//! | non-2xx| anything else         | `Err(Http { status, body })`             |

use serde_json::Value;

use super::transport::RawResponse;
use crate::error::{UploadError, UploadResult};
use crate::models::UploadSession;

/// Interpret a raw upload response.
///
/// A non-2xx response whose body is a JSON object is handled exactly like a
/// 2xx validation failure; its status code is not kept.
pub fn interpret(response: &RawResponse) -> UploadResult<UploadSession> {
    if response.is_success() {
        return serde_json::from_str::<UploadSession>(&response.body)
            .map_err(|e| UploadError::InvalidResponse(e.to_string()));
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value @ Value::Object(_)) => {
            let mut session: UploadSession = serde_json::from_value(value)
                .map_err(|e| UploadError::InvalidResponse(e.to_string()))?;
            session.success = false;
            Ok(session)
        }
        _ => Err(UploadError::Http {
            status: response.status,
            body: response.body.clone(),
        }),
    }
}
