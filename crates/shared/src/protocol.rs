use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

static BIRTH_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("birth date pattern is a valid regex")
});

/// Body of `POST /authors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthor {
    pub name: String,
    pub birth_date: String,
    pub image: String,
    pub description: String,
}

/// Unvalidated author form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDraft {
    pub name: String,
    pub birth_date: String,
    pub image: String,
    pub description: String,
}

impl AuthorDraft {
    /// Checks the form in field order and reports the first violation.
    ///
    /// Values are passed through as entered; only the emptiness checks trim.
    pub fn validate(&self) -> Result<NewAuthor, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if !BIRTH_DATE_PATTERN.is_match(&self.birth_date) {
            return Err(ValidationError::BirthDateFormat);
        }
        if self.image.trim().is_empty() {
            return Err(ValidationError::ImageRequired);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }

        Ok(NewAuthor {
            name: self.name.clone(),
            birth_date: self.birth_date.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
        })
    }
}
