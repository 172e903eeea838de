//! Scripted transport for exercising workflows without a backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::transport::{ApiRequest, ApiResponse, Transport, TransportError};

type Handler = dyn Fn(&ApiRequest, usize) -> Result<ApiResponse, TransportError> + Send + Sync;

/// Answers each request through `handler`, which also receives how many
/// times the same method and path were requested before.
pub(crate) struct ScriptedTransport {
    handler: Box<Handler>,
    log: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        handler: impl Fn(&ApiRequest, usize) -> Result<ApiResponse, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            handler: Box::new(handler),
            log: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().expect("request log").clone()
    }

    /// `METHOD /path` for every request, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| format!("{} {}", request.method, request.path))
            .collect()
    }

    pub(crate) fn body_of(&self, index: usize) -> Option<Value> {
        self.requests().get(index).and_then(|r| r.body.clone())
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let nth = {
            let mut log = self.log.lock().expect("request log");
            let nth = log
                .iter()
                .filter(|seen| seen.method == request.method && seen.path == request.path)
                .count();
            log.push(request.clone());
            nth
        };
        (self.handler)(&request, nth)
    }
}

pub(crate) fn respond(status: u16, body: impl Into<String>) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(status, body))
}

pub(crate) fn respond_json(value: Value) -> Result<ApiResponse, TransportError> {
    Ok(ApiResponse::new(200, value.to_string()))
}
