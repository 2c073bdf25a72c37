use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ports::ApiError;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Decode a `{success, errors?, message?, ...payload}` body.
///
/// A non-2xx status or `success: false` becomes `ApiError::Rejected` with the
/// most specific message the body offers.
pub(super) fn decode<T: DeserializeOwned>(
    status: u16,
    status_ok: bool,
    text: &str,
) -> Result<T, ApiError> {
    let body: Value = match serde_json::from_str(text) {
        Ok(body) => body,
        Err(e) if status_ok => return Err(ApiError::Decode(e.to_string())),
        Err(_) => {
            return Err(ApiError::Rejected {
                status,
                message: format!("HTTP error! status: {status}"),
            });
        }
    };

    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !status_ok || !success {
        return Err(ApiError::Rejected {
            status,
            message: error_message(&body),
        });
    }

    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `errors.general`, then any other `errors` entry, then `message`.
pub(super) fn error_message(body: &Value) -> String {
    let errors = body.get("errors").and_then(Value::as_object);
    let from_errors = errors.and_then(|errors| {
        errors
            .get("general")
            .and_then(Value::as_str)
            .or_else(|| errors.values().find_map(Value::as_str))
    });
    from_errors
        .or_else(|| body.get("message").and_then(Value::as_str))
        .unwrap_or(UNKNOWN_ERROR)
        .to_string()
}
