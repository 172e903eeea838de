//! Typed endpoints of the authors/books/prizes resource API.

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use shared::{
    domain::{AuthorId, BookId, PrizeId},
    protocol::NewAuthor,
};

use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport, TransportError};

#[derive(Clone)]
pub struct AuthorsApi {
    transport: Arc<dyn Transport>,
}

impl AuthorsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn over_http(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(HttpTransport::new(base_url)?)))
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.transport.send(request).await
    }

    pub async fn list_authors(&self) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::GET, "/authors")).await
    }

    pub async fn get_author(&self, id: AuthorId) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::GET, format!("/authors/{id}")))
            .await
    }

    pub async fn create_author(&self, author: &NewAuthor) -> Result<ApiResponse, TransportError> {
        let body = serde_json::to_value(author).map_err(|err| TransportError::Send {
            method: Method::POST,
            path: "/authors".into(),
            message: err.to_string(),
        })?;
        self.send(ApiRequest::new(Method::POST, "/authors").with_json(body))
            .await
    }

    pub async fn delete_author(&self, id: AuthorId) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::DELETE, format!("/authors/{id}")))
            .await
    }

    pub async fn delete_book(&self, id: BookId) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::DELETE, format!("/books/{id}")))
            .await
    }

    /// Removes the author-scoped book relationship.
    pub async fn unlink_author_book(
        &self,
        author_id: AuthorId,
        book_id: BookId,
    ) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(
            Method::DELETE,
            format!("/authors/{author_id}/books/{book_id}"),
        ))
        .await
    }

    pub async fn get_book(&self, id: BookId) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::GET, format!("/books/{id}")))
            .await
    }

    pub async fn put_book(&self, id: BookId, body: Value) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::PUT, format!("/books/{id}")).with_json(body))
            .await
    }

    pub async fn patch_prize(
        &self,
        id: PrizeId,
        body: Value,
    ) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::PATCH, format!("/prizes/{id}")).with_json(body))
            .await
    }

    pub async fn get_prize(&self, id: PrizeId) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::GET, format!("/prizes/{id}")))
            .await
    }

    pub async fn put_prize(&self, id: PrizeId, body: Value) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::PUT, format!("/prizes/{id}")).with_json(body))
            .await
    }

    pub async fn delete_prize(&self, id: PrizeId) -> Result<ApiResponse, TransportError> {
        self.send(ApiRequest::new(Method::DELETE, format!("/prizes/{id}")))
            .await
    }
}
