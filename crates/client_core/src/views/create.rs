//! Author creation form.

use shared::{error::body_message, protocol::AuthorDraft};
use tracing::{error, info};

use crate::{api::AuthorsApi, error::ClientError};

/// Where the front end should go next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Authors,
}

#[derive(Debug, Default)]
pub struct CreateAuthorView {
    pub draft: AuthorDraft,
    saving: bool,
    error: Option<String>,
}

impl CreateAuthorView {
    pub fn new(draft: AuthorDraft) -> Self {
        Self {
            draft,
            ..Self::default()
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates and submits the draft once. On failure the error is kept on
    /// the view and `None` is returned; `saving` is reset either way.
    pub async fn submit(&mut self, api: &AuthorsApi) -> Option<Navigation> {
        self.error = None;
        self.saving = true;
        let result = create_author(api, &self.draft).await;
        self.saving = false;

        match result {
            Ok(()) => Some(Navigation::Authors),
            Err(err) => {
                if !err.is_validation() {
                    error!("POST /authors failed: {err}");
                }
                self.error = Some(err.to_string());
                None
            }
        }
    }
}

async fn create_author(api: &AuthorsApi, draft: &AuthorDraft) -> Result<(), ClientError> {
    let author = draft.validate()?;
    let response = api.create_author(&author).await?;
    if !response.is_success() {
        let message = body_message(&response.body)
            .unwrap_or_else(|| format!("error creating author (status {})", response.status));
        return Err(ClientError::Status {
            status: response.status,
            message,
        });
    }
    info!(name = %author.name, "author created");
    Ok(())
}
