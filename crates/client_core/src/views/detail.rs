//! Single-author view with current books and prizes.

use shared::domain::{Author, AuthorId};

use crate::{api::AuthorsApi, error::ClientError};

pub async fn load_author(api: &AuthorsApi, id: AuthorId) -> Result<Author, ClientError> {
    let response = api.get_author(id).await?;
    if !response.is_success() {
        return Err(ClientError::Status {
            status: response.status,
            message: response.error_message(),
        });
    }
    Ok(response.json()?)
}
