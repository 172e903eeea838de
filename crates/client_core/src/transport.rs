//! HTTP seam between the admin workflows and the remote resource API.

use async_trait::async_trait;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::extract_error_message;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request {method} {path} failed: {message}")]
    Send {
        method: Method,
        path: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the api base, e.g. `/authors/3`.
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn error_message(&self) -> String {
        extract_error_message(self.status, &self.body)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request. Non-success statuses are returned, not raised.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self {
            http: Client::new(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| TransportError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(header::CACHE_CONTROL, "no-store");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::Send {
                method: request.method.clone(),
                path: request.path.clone(),
                message: err.to_string(),
            })?;
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                warn!(method = %request.method, path = %request.path, "unreadable response body: {err}");
                String::new()
            }
        };

        debug!(method = %request.method, path = %request.path, status, "api request completed");
        Ok(ApiResponse { status, body })
    }
}

/// Parses the base url and makes sure it ends with `/` so joins append.
fn normalize_base_url(raw: &str) -> Result<Url, TransportError> {
    let trimmed = raw.trim();
    let invalid = |reason: String| TransportError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason,
    };

    let mut url = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https".into()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_under_base_path() {
        let transport = HttpTransport::new("http://localhost:8080/api").expect("transport");
        assert_eq!(
            transport.endpoint("/authors/3/books/9").expect("url").as_str(),
            "http://localhost:8080/api/authors/3/books/9"
        );

        let transport = HttpTransport::new("http://localhost:8080/api/").expect("transport");
        assert_eq!(
            transport.endpoint("/prizes/1").expect("url").as_str(),
            "http://localhost:8080/api/prizes/1"
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            HttpTransport::new("ftp://example.com/api"),
            Err(TransportError::InvalidBaseUrl { .. })
        ));
        assert!(HttpTransport::new("not a url").is_err());
    }

    #[test]
    fn success_covers_2xx_only() {
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(304, "").is_success());
        assert!(!ApiResponse::new(409, "").is_success());
    }
}
