//! The API error taxonomy.
//!
//! Nothing here is retried automatically: every failure is terminal for
//! its submission and requires explicit user action. Backend field errors
//! are folded into the same [`FieldErrors`] shape as client-side
//! validation so the two surface identically.

use serde_json::Value;
use thiserror::Error;

use vivaha_core::validate::FieldErrors;

/// Errors surfaced by the bureau API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client-side validation failed; nothing reached the network.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// No usable response was received; the user must retry manually.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Credential expired or missing. Triggers the embedding
    /// application's session-termination path; never silently retried.
    #[error("unauthorized: session expired or credential rejected")]
    Unauthorized,

    /// Stale id - the record is gone; a list refresh is recommended.
    #[error("not found: {0}")]
    NotFound(String),

    /// Any other failure, including structured per-field errors.
    #[error("server error ({status}): {}", summary(detail, errors))]
    Server {
        status: u16,
        detail: Option<String>,
        errors: FieldErrors,
    },

    /// The response body did not parse as the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Map a non-success HTTP response into the taxonomy.
    #[must_use]
    pub fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(trimmed_detail(body)),
            _ => {
                let (detail, errors) = parse_error_body(body);
                Self::Server {
                    status: status.as_u16(),
                    detail,
                    errors,
                }
            }
        }
    }

    /// Field-level errors carried by this failure, if any.
    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Server { errors, .. } if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }

    /// Whether this failure must terminate the session.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

fn summary(detail: &Option<String>, errors: &FieldErrors) -> String {
    match detail {
        Some(detail) if errors.is_empty() => detail.clone(),
        Some(detail) => format!("{detail}; {errors}"),
        None if errors.is_empty() => "no further detail".to_string(),
        None => errors.to_string(),
    }
}

/// Parse a structured error payload: `{field: [messages]}` and/or
/// `{detail: message}`. Anything unrecognized degrades to no field errors
/// rather than failing.
#[must_use]
pub fn parse_error_body(body: &str) -> (Option<String>, FieldErrors) {
    let mut errors = FieldErrors::new();
    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) else {
        return (None, errors);
    };

    let mut detail = None;
    for (field, value) in map {
        match value {
            Value::String(message) if field == "detail" => detail = Some(message),
            Value::String(message) => errors.push(field, message),
            Value::Array(messages) => {
                for message in messages {
                    if let Value::String(message) = message {
                        errors.push(field.clone(), message);
                    }
                }
            }
            _ => {}
        }
    }
    (detail, errors)
}

fn trimmed_detail(body: &str) -> String {
    let (detail, _) = parse_error_body(body);
    detail.unwrap_or_else(|| "resource no longer exists".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_payload() {
        let (detail, errors) =
            parse_error_body(r#"{"payment_status": ["Invalid choice."], "payment_amount": ["Must be positive.", "Too large."]}"#);
        assert_eq!(detail, None);
        assert_eq!(errors.get("payment_status"), ["Invalid choice."]);
        assert_eq!(errors.get("payment_amount").len(), 2);
    }

    #[test]
    fn test_detail_payload() {
        let (detail, errors) = parse_error_body(r#"{"detail": "Update rejected."}"#);
        assert_eq!(detail.as_deref(), Some("Update rejected."));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_unstructured_body_degrades() {
        let (detail, errors) = parse_error_body("<html>gateway timeout</html>");
        assert_eq!(detail, None);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_status_mapping() {
        let err = ApiError::from_response(reqwest::StatusCode::UNAUTHORIZED, "");
        assert!(err.is_auth());

        let err = ApiError::from_response(
            reqwest::StatusCode::NOT_FOUND,
            r#"{"detail": "No such customer."}"#,
        );
        assert!(matches!(err, ApiError::NotFound(detail) if detail == "No such customer."));

        let err = ApiError::from_response(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"agreement_status": ["This field is required."]}"#,
        );
        let ApiError::Server { status, errors, .. } = err else {
            panic!("expected server error");
        };
        assert_eq!(status, 400);
        assert_eq!(errors.get("agreement_status"), ["This field is required."]);
    }

    #[test]
    fn test_server_error_display_summary() {
        let err = ApiError::from_response(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"detail": "Fix the payment section.", "payment_method": ["Unknown method."]}"#,
        );
        let rendered = err.to_string();
        assert!(rendered.contains("Fix the payment section."));
        assert!(rendered.contains("payment_method: Unknown method."));
    }
}
