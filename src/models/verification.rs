// src/models/verification.rs
//! Responses of the Base Verify `base_verify_token` endpoint.
//!
//! The backend answers with a handful of distinct shapes. They are decoded
//! once, at the client boundary, into [`VerificationOutcome`] so callers match
//! on variants instead of probing JSON fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decoded verification response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// The subject meets the requirements. `token` is unique per verified
    /// identity and can be used for Sybil resistance.
    Verified { token: Option<String>, payload: Value },

    /// The address has never verified with the provider (HTTP 404).
    NotFound { message: Option<String> },

    /// The subject is verified but does not meet the trait requirements (HTTP 412).
    PreconditionFailed { message: Option<String> },

    /// Any other non-success answer.
    Failed { status: u16, message: Option<String> },
}

impl VerificationOutcome {
    /// Decodes a raw HTTP status and body.
    ///
    /// Bodies that are not JSON are kept verbatim as the message of the
    /// non-success variants and as a JSON string payload for success.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload: Value =
            serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));

        match status {
            200..=299 => {
                let token = payload
                    .get("token")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                VerificationOutcome::Verified { token, payload }
            }
            404 => VerificationOutcome::NotFound {
                message: error_message(&payload),
            },
            412 => VerificationOutcome::PreconditionFailed {
                message: error_message(&payload),
            },
            _ => VerificationOutcome::Failed {
                status,
                message: error_message(&payload),
            },
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, VerificationOutcome::Verified { .. })
    }

    /// HTTP status that best represents the outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            VerificationOutcome::Verified { .. } => 200,
            VerificationOutcome::NotFound { .. } => 404,
            VerificationOutcome::PreconditionFailed { .. } => 412,
            VerificationOutcome::Failed { status, .. } => *status,
        }
    }
}

fn error_message(payload: &Value) -> Option<String> {
    match payload {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Object(fields) => ["error", "message"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_with_token() {
        let outcome = VerificationOutcome::from_response(200, r#"{"token":"abc"}"#);
        assert_eq!(
            outcome,
            VerificationOutcome::Verified {
                token: Some("abc".to_string()),
                payload: json!({"token": "abc"}),
            }
        );
        assert!(outcome.is_verified());
    }

    #[test]
    fn test_not_found() {
        let outcome = VerificationOutcome::from_response(404, r#"{"error":"verification not found"}"#);
        assert_eq!(
            outcome,
            VerificationOutcome::NotFound {
                message: Some("verification not found".to_string())
            }
        );
        assert_eq!(outcome.status_code(), 404);
    }

    #[test]
    fn test_precondition_failed() {
        let outcome = VerificationOutcome::from_response(412, r#"{"message":"traits not met"}"#);
        assert!(matches!(
            outcome,
            VerificationOutcome::PreconditionFailed { message: Some(ref m) } if m == "traits not met"
        ));
    }

    #[test]
    fn test_other_status_with_plain_body() {
        let outcome = VerificationOutcome::from_response(502, "Bad Gateway");
        assert_eq!(
            outcome,
            VerificationOutcome::Failed {
                status: 502,
                message: Some("Bad Gateway".to_string())
            }
        );
    }
}
