use serde_json::Value;
use thiserror::Error;

/// Client-side rejection of an author form; never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,
    #[error("birthDate must be YYYY-MM-DD")]
    BirthDateFormat,
    #[error("image is required")]
    ImageRequired,
    #[error("description is required")]
    DescriptionRequired,
}

/// Message carried by an error body, if any.
///
/// Checked in order: `apierror.message`, then `message`, then the raw body.
/// Empty strings fall through to the next candidate.
pub fn body_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<Value>(body) {
        let nested = parsed
            .get("apierror")
            .and_then(|wrapper| wrapper.get("message"))
            .and_then(non_empty_str);
        let flat = parsed.get("message").and_then(non_empty_str);
        if let Some(message) = nested.or(flat) {
            return Some(message.to_string());
        }
    }

    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// User-facing message for a failed response, falling back to `HTTP <status>`.
pub fn extract_error_message(status: u16, body: &str) -> String {
    body_message(body).unwrap_or_else(|| format!("HTTP {status}"))
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|text| !text.is_empty())
}
