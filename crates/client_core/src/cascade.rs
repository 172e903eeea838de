//! Client-driven cascading deletion of an author.
//!
//! The backend refuses to delete an author that still has books or prizes,
//! and its relationship API is not consistent, so each related record is
//! removed through an ordered chain of fallback strategies before the author
//! delete is retried. Nothing here is transactional: books removed before a
//! later failure stay removed.

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use shared::domain::{Author, AuthorId, BookId, PrizeId};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::AuthorsApi,
    fallback::{first_success, Strategy},
    transport::{ApiResponse, TransportError},
};

const FINAL_DELETE_FALLBACK_MESSAGE: &str = "could not delete author after removing relationships";

#[derive(Debug, Error)]
pub enum CascadeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Direct delete failed and the author could not be re-read.
    #[error("{message}")]
    Rejected { message: String },
    #[error("unexpected author payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("could not delete book {book_id}")]
    Book { book_id: BookId },
    #[error("could not delete or detach prizes: {}", join_ids(.prize_ids))]
    Prizes { prize_ids: Vec<PrizeId> },
    #[error("{message}")]
    FinalDelete { message: String },
}

fn join_ids(ids: &[PrizeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The first delete went through; no relationship cleanup was needed.
    Direct,
    Cascaded {
        books_removed: usize,
        prizes_removed: usize,
        prizes_skipped: usize,
    },
}

/// Full-replacement body used to detach a prize from its author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PutShape {
    /// The fetched prize with `field` set to null.
    Merge { field: String },
    /// Only the prize id plus `field` set to null.
    IdOnly { field: String },
}

impl PutShape {
    pub fn body(&self, current: &Value) -> Value {
        match self {
            Self::Merge { field } => {
                let mut body = current.as_object().cloned().unwrap_or_default();
                body.insert(field.clone(), Value::Null);
                Value::Object(body)
            }
            Self::IdOnly { field } => {
                let mut body = Map::new();
                if let Some(id) = current.get("id").filter(|id| !id.is_null()) {
                    body.insert("id".into(), id.clone());
                }
                body.insert(field.clone(), Value::Null);
                Value::Object(body)
            }
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Merge { field } => format!("merge:{field}"),
            Self::IdOnly { field } => format!("id-only:{field}"),
        }
    }
}

/// Payload guesses used to detach related records.
///
/// None of these shapes is a confirmed backend contract, hence configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Field on a book listing its authors, emptied before a replacement PUT.
    pub book_author_field: String,
    /// Entries given as strings are parsed as JSON, since TOML has no null.
    #[serde(deserialize_with = "json_bodies")]
    pub prize_patch_bodies: Vec<Value>,
    pub prize_put_shapes: Vec<PutShape>,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            book_author_field: "authors".into(),
            prize_patch_bodies: vec![
                json!({ "author": null }),
                json!({ "authorId": null }),
                json!({ "remove": true }),
            ],
            prize_put_shapes: vec![
                PutShape::Merge {
                    field: "author".into(),
                },
                PutShape::IdOnly {
                    field: "author".into(),
                },
                PutShape::Merge {
                    field: "authorId".into(),
                },
            ],
        }
    }
}

fn json_bodies<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|entry| match entry {
            Value::String(text) => serde_json::from_str(&text).map_err(serde::de::Error::custom),
            other => Ok(other),
        })
        .collect()
}

pub struct BookTarget {
    api: AuthorsApi,
    author_id: AuthorId,
    book_id: BookId,
}

pub struct PrizeTarget {
    api: AuthorsApi,
    prize_id: PrizeId,
}

fn expect_success(response: ApiResponse, step: &str) -> anyhow::Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        bail!("{step} returned {}: {}", response.status, response.error_message())
    }
}

struct DeleteBook;

#[async_trait]
impl Strategy<BookTarget> for DeleteBook {
    fn name(&self) -> String {
        "delete-book".into()
    }

    async fn attempt(&self, target: &BookTarget) -> anyhow::Result<()> {
        let response = target.api.delete_book(target.book_id).await?;
        expect_success(response, "book delete")?;
        Ok(())
    }
}

struct UnlinkThenDeleteBook;

#[async_trait]
impl Strategy<BookTarget> for UnlinkThenDeleteBook {
    fn name(&self) -> String {
        "unlink-then-delete-book".into()
    }

    async fn attempt(&self, target: &BookTarget) -> anyhow::Result<()> {
        let unlinked = target
            .api
            .unlink_author_book(target.author_id, target.book_id)
            .await?;
        expect_success(unlinked, "author book unlink")?;
        let deleted = target.api.delete_book(target.book_id).await?;
        expect_success(deleted, "book delete")?;
        Ok(())
    }
}

struct DetachThenDeleteBook {
    author_field: String,
}

#[async_trait]
impl Strategy<BookTarget> for DetachThenDeleteBook {
    fn name(&self) -> String {
        format!("detach-{}-then-delete-book", self.author_field)
    }

    async fn attempt(&self, target: &BookTarget) -> anyhow::Result<()> {
        let fetched = expect_success(target.api.get_book(target.book_id).await?, "book fetch")?;
        let mut book = fetched
            .json::<Map<String, Value>>()
            .context("book body is not a JSON object")?;
        book.insert(self.author_field.clone(), Value::Array(Vec::new()));

        let replaced = target.api.put_book(target.book_id, Value::Object(book)).await?;
        expect_success(replaced, "book replace")?;
        let deleted = target.api.delete_book(target.book_id).await?;
        expect_success(deleted, "book delete")?;
        Ok(())
    }
}

struct PatchThenDeletePrize {
    body: Value,
}

#[async_trait]
impl Strategy<PrizeTarget> for PatchThenDeletePrize {
    fn name(&self) -> String {
        format!("patch-then-delete-prize {}", self.body)
    }

    async fn attempt(&self, target: &PrizeTarget) -> anyhow::Result<()> {
        let patched = target
            .api
            .patch_prize(target.prize_id, self.body.clone())
            .await?;
        expect_success(patched, "prize patch")?;
        let deleted = target.api.delete_prize(target.prize_id).await?;
        expect_success(deleted, "prize delete")?;
        Ok(())
    }
}

/// Fetches the prize once, then tries each replacement shape in turn.
struct ReplaceThenDeletePrize {
    shapes: Vec<PutShape>,
}

#[async_trait]
impl Strategy<PrizeTarget> for ReplaceThenDeletePrize {
    fn name(&self) -> String {
        let labels = self.shapes.iter().map(PutShape::label).collect::<Vec<_>>();
        format!("replace-then-delete-prize [{}]", labels.join(", "))
    }

    async fn attempt(&self, target: &PrizeTarget) -> anyhow::Result<()> {
        let fetched = expect_success(target.api.get_prize(target.prize_id).await?, "prize fetch")?;
        let current = fetched.json::<Value>().context("prize body is not JSON")?;

        for shape in &self.shapes {
            let replaced = target
                .api
                .put_prize(target.prize_id, shape.body(&current))
                .await?;
            if !replaced.is_success() {
                debug!(prize_id = %target.prize_id, shape = %shape.label(), status = replaced.status, "prize replace rejected");
                continue;
            }
            if target.api.delete_prize(target.prize_id).await?.is_success() {
                return Ok(());
            }
        }
        Err(anyhow!("no replacement shape allowed the prize to be deleted"))
    }
}

struct ForceDeletePrize;

#[async_trait]
impl Strategy<PrizeTarget> for ForceDeletePrize {
    fn name(&self) -> String {
        "force-delete-prize".into()
    }

    async fn attempt(&self, target: &PrizeTarget) -> anyhow::Result<()> {
        let deleted = target.api.delete_prize(target.prize_id).await?;
        expect_success(deleted, "prize delete")?;
        Ok(())
    }
}

pub struct CascadeDeleter {
    api: AuthorsApi,
    book_strategies: Vec<Box<dyn Strategy<BookTarget>>>,
    prize_strategies: Vec<Box<dyn Strategy<PrizeTarget>>>,
}

impl CascadeDeleter {
    pub fn new(api: AuthorsApi, config: &CascadeConfig) -> Self {
        let book_strategies: Vec<Box<dyn Strategy<BookTarget>>> = vec![
            Box::new(DeleteBook),
            Box::new(UnlinkThenDeleteBook),
            Box::new(DetachThenDeleteBook {
                author_field: config.book_author_field.clone(),
            }),
        ];

        let mut prize_strategies: Vec<Box<dyn Strategy<PrizeTarget>>> = config
            .prize_patch_bodies
            .iter()
            .map(|body| {
                Box::new(PatchThenDeletePrize { body: body.clone() }) as Box<dyn Strategy<PrizeTarget>>
            })
            .collect();
        prize_strategies.push(Box::new(ReplaceThenDeletePrize {
            shapes: config.prize_put_shapes.clone(),
        }));
        prize_strategies.push(Box::new(ForceDeletePrize));

        Self {
            api,
            book_strategies,
            prize_strategies,
        }
    }

    /// Deletes the author, cleaning up its books and prizes first if the
    /// backend refuses the direct delete.
    ///
    /// Every request is issued sequentially. The author is only deleted when
    /// every book and every resolvable prize was removed.
    pub async fn delete_author(&self, author_id: AuthorId) -> Result<DeleteOutcome, CascadeError> {
        let direct = self.api.delete_author(author_id).await?;
        if direct.is_success() {
            info!(%author_id, "author deleted directly");
            return Ok(DeleteOutcome::Direct);
        }
        let direct_message = direct.error_message();
        debug!(%author_id, status = direct.status, "direct author delete refused: {direct_message}");

        let fetched = self.api.get_author(author_id).await?;
        if !fetched.is_success() {
            warn!(%author_id, status = fetched.status, "author re-fetch failed");
            return Err(CascadeError::Rejected {
                message: direct_message,
            });
        }
        let author: Author = fetched.json()?;

        let books_removed = self.remove_books(&author).await?;
        let (prizes_removed, prizes_skipped) = self.remove_prizes(&author).await?;

        let last = self.api.delete_author(author_id).await?;
        if !last.is_success() {
            let message = shared::error::body_message(&last.body)
                .unwrap_or_else(|| FINAL_DELETE_FALLBACK_MESSAGE.to_string());
            warn!(%author_id, status = last.status, "author delete failed after cascade: {message}");
            return Err(CascadeError::FinalDelete { message });
        }

        info!(%author_id, books_removed, prizes_removed, prizes_skipped, "author deleted after cascade");
        Ok(DeleteOutcome::Cascaded {
            books_removed,
            prizes_removed,
            prizes_skipped,
        })
    }

    async fn remove_books(&self, author: &Author) -> Result<usize, CascadeError> {
        for book in &author.books {
            let target = BookTarget {
                api: self.api.clone(),
                author_id: author.id,
                book_id: book.id,
            };
            if first_success(&self.book_strategies, &target).await.is_none() {
                warn!(author_id = %author.id, book_id = %book.id, "every book removal strategy failed");
                return Err(CascadeError::Book { book_id: book.id });
            }
        }
        Ok(author.books.len())
    }

    async fn remove_prizes(&self, author: &Author) -> Result<(usize, usize), CascadeError> {
        let mut failed = Vec::new();
        let mut removed = 0;
        let mut skipped = 0;

        for prize in &author.prizes {
            let Some(prize_id) = prize.resolved_id() else {
                debug!(author_id = %author.id, "skipping prize without a resolvable id");
                skipped += 1;
                continue;
            };
            let target = PrizeTarget {
                api: self.api.clone(),
                prize_id,
            };
            if first_success(&self.prize_strategies, &target).await.is_some() {
                removed += 1;
            } else {
                warn!(author_id = %author.id, %prize_id, "prize could not be removed or detached");
                failed.push(prize_id);
            }
        }

        if failed.is_empty() {
            Ok((removed, skipped))
        } else {
            Err(CascadeError::Prizes { prize_ids: failed })
        }
    }
}

#[cfg(test)]
#[path = "tests/cascade_tests.rs"]
mod tests;
