//! Author listing with per-record cascading deletion.

use std::collections::BTreeSet;

use shared::domain::{Author, AuthorId};
use tracing::warn;

use crate::{
    api::AuthorsApi,
    cascade::{CascadeDeleter, CascadeError, DeleteOutcome},
};

pub const DELETE_CONFIRMATION: &str = "This author may have associated books/prizes.\n\
Related records will be detached and deleted before the author.\n\nContinue?";

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Author>),
    Failed(String),
}

/// What a rendered author card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorCard {
    pub id: AuthorId,
    pub name: String,
    pub birth_date: String,
    pub description: String,
    pub image: String,
    /// Present only when nonzero.
    pub book_count: Option<usize>,
    pub prize_count: Option<usize>,
    pub deleting: bool,
}

/// Result of a user-initiated delete.
#[derive(Debug)]
pub enum DeleteAttempt {
    Declined,
    AlreadyInFlight,
    Finished(Result<DeleteOutcome, CascadeError>),
}

#[derive(Debug)]
pub struct AuthorListView {
    state: ListState,
    deleting: BTreeSet<AuthorId>,
    notice: Option<String>,
}

impl Default for AuthorListView {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorListView {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
            deleting: BTreeSet::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Message of the last failed delete, cleared by a later successful one.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_deleting(&self, id: AuthorId) -> bool {
        self.deleting.contains(&id)
    }

    /// Fetches the whole collection, replacing whatever was shown before.
    pub async fn load(&mut self, api: &AuthorsApi) {
        self.state = ListState::Loading;
        self.state = fetch_authors(api).await;
    }

    pub fn cards(&self) -> Vec<AuthorCard> {
        let ListState::Loaded(authors) = &self.state else {
            return Vec::new();
        };
        authors
            .iter()
            .map(|author| AuthorCard {
                id: author.id,
                name: author.name.clone(),
                birth_date: author.birth_date_display().to_string(),
                description: author.description.clone(),
                image: author.image.clone(),
                book_count: non_zero(author.books.len()),
                prize_count: non_zero(author.prizes.len()),
                deleting: self.deleting.contains(&author.id),
            })
            .collect()
    }

    /// Marks `id` as being deleted. Returns false if it already is.
    pub fn begin_delete(&mut self, id: AuthorId) -> bool {
        self.deleting.insert(id)
    }

    /// Applies the outcome of a delete workflow and always clears the
    /// in-flight marker for `id`.
    pub fn finish_delete(&mut self, id: AuthorId, result: &Result<DeleteOutcome, CascadeError>) {
        self.deleting.remove(&id);
        match result {
            Ok(_) => {
                self.notice = None;
                if let ListState::Loaded(authors) = &self.state {
                    let remaining = remove_author(authors, id);
                    self.state = ListState::Loaded(remaining);
                }
            }
            Err(err) => {
                warn!(author_id = %id, "author delete failed: {err}");
                self.notice = Some(err.to_string());
            }
        }
    }

    /// Confirms, runs the cascade for `id`, and applies the result.
    ///
    /// Callers that run several deletes concurrently use `begin_delete` and
    /// `finish_delete` around their own futures instead.
    pub async fn delete(
        &mut self,
        deleter: &CascadeDeleter,
        id: AuthorId,
        confirm: impl FnOnce(AuthorId) -> bool,
    ) -> DeleteAttempt {
        if !confirm(id) {
            return DeleteAttempt::Declined;
        }
        if !self.begin_delete(id) {
            return DeleteAttempt::AlreadyInFlight;
        }
        let result = deleter.delete_author(id).await;
        self.finish_delete(id, &result);
        DeleteAttempt::Finished(result)
    }
}

/// New snapshot without the author `id`, preserving order.
pub fn remove_author(authors: &[Author], id: AuthorId) -> Vec<Author> {
    authors
        .iter()
        .filter(|author| author.id != id)
        .cloned()
        .collect()
}

async fn fetch_authors(api: &AuthorsApi) -> ListState {
    let response = match api.list_authors().await {
        Ok(response) => response,
        Err(err) => return ListState::Failed(err.to_string()),
    };
    if !response.is_success() {
        return ListState::Failed(format!("error listing authors (HTTP {})", response.status));
    }
    match response.json::<Vec<Author>>() {
        Ok(authors) => ListState::Loaded(authors),
        Err(err) => ListState::Failed(format!("unexpected response body: {err}")),
    }
}

fn non_zero(count: usize) -> Option<usize> {
    (count > 0).then_some(count)
}
