//! Domain models for the book collection
//!
//! This module contains the persisted [`Book`] record, the creation input
//! ([`NewBook`]) and the partial update ([`BookPatch`]), together with the
//! validation rules shared by the store and the gateway.

use crate::error::{LibraryError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Lowest accepted personal rating.
pub const MIN_RATING: i64 = 1;
/// Highest accepted personal rating.
pub const MAX_RATING: i64 = 5;

// =============================================================================
// ID Types
// =============================================================================

/// Unique identifier for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render a timestamp the way records store it (`2024-05-01T10:00:00.000Z`).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Domain Models
// =============================================================================

/// A book in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier, assigned once at creation
    pub id: String,
    pub title: String,
    pub author: String,

    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub series: Option<String>,
    /// Position within `series`
    pub series_number: Option<i64>,
    pub theme: Option<String>,
    pub pages: Option<i64>,
    pub publication_year: Option<i64>,
    pub language: Option<String>,
    pub description: Option<String>,
    /// Cover image URI
    pub cover_image: Option<String>,

    // Personal data
    pub personal_notes: Option<String>,
    /// 1 to 5 inclusive
    pub personal_rating: Option<i64>,
    pub is_read: bool,

    // Timestamps (RFC 3339 UTC, see [`format_timestamp`])
    pub date_added: String,
    pub date_modified: String,
}

impl Book {
    /// Build a record from creation input.
    ///
    /// `input` is normalized first; both timestamps are set to `now`.
    pub fn from_new(id: BookId, input: NewBook, now: &str) -> Self {
        let input = input.normalized();
        Self {
            id: id.to_string(),
            title: input.title,
            author: input.author,
            isbn: input.isbn,
            genre: input.genre,
            publisher: input.publisher,
            series: input.series,
            series_number: input.series_number,
            theme: input.theme,
            pages: input.pages,
            publication_year: input.publication_year,
            language: input.language,
            description: input.description,
            cover_image: input.cover_image,
            personal_notes: input.personal_notes,
            personal_rating: input.personal_rating,
            is_read: input.is_read,
            date_added: now.to_string(),
            date_modified: now.to_string(),
        }
    }

    /// Validate a complete record before it is written.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(LibraryError::constraint("id", "Book id cannot be empty"));
        }
        validate_required("title", &self.title)?;
        validate_required("author", &self.author)?;
        validate_numbers(self.personal_rating, self.pages, self.series_number)?;

        if self.date_added.is_empty() || self.date_modified.is_empty() {
            return Err(LibraryError::constraint(
                "dateAdded",
                "Timestamps must be set by the store",
            ));
        }
        if self.date_modified < self.date_added {
            return Err(LibraryError::constraint(
                "dateModified",
                "dateModified cannot precede dateAdded",
            ));
        }

        Ok(())
    }
}

/// Fields supplied when adding a book
///
/// Identity and timestamps are never part of the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub series: Option<String>,
    pub series_number: Option<i64>,
    pub theme: Option<String>,
    pub pages: Option<i64>,
    pub publication_year: Option<i64>,
    pub language: Option<String>,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub personal_notes: Option<String>,
    pub personal_rating: Option<i64>,
    pub is_read: bool,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    /// Trim the required fields and drop blank optional text.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            isbn: clean_text(self.isbn),
            genre: clean_text(self.genre),
            publisher: clean_text(self.publisher),
            series: clean_text(self.series),
            theme: clean_text(self.theme),
            language: clean_text(self.language),
            description: clean_text(self.description),
            cover_image: clean_text(self.cover_image),
            personal_notes: clean_text(self.personal_notes),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_required("title", &self.title)?;
        validate_required("author", &self.author)?;
        validate_numbers(self.personal_rating, self.pages, self.series_number)
    }
}

/// Partial update of a book
///
/// Optional fields are tri-state: absent keeps the stored value, `null`
/// clears it and a value replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub genre: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub publisher: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub series: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub series_number: Option<Option<i64>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub pages: Option<Option<i64>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_year: Option<Option<i64>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub personal_notes: Option<Option<String>>,
    #[serde(
        deserialize_with = "deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub personal_rating: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from a missing key (`None`).
fn deserialize_some<'de, T, D>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl BookPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn genre(mut self, genre: Option<String>) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn series(mut self, series: Option<String>, number: Option<i64>) -> Self {
        self.series = Some(series);
        self.series_number = Some(number);
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn personal_notes(mut self, notes: Option<String>) -> Self {
        self.personal_notes = Some(notes);
        self
    }

    pub fn personal_rating(mut self, rating: Option<i64>) -> Self {
        self.personal_rating = Some(rating);
        self
    }

    pub fn is_read(mut self, is_read: bool) -> Self {
        self.is_read = Some(is_read);
        self
    }

    /// Names (camelCase) of the fields this patch touches.
    pub fn field_names(&self) -> Vec<String> {
        let present = [
            ("title", self.title.is_some()),
            ("author", self.author.is_some()),
            ("isbn", self.isbn.is_some()),
            ("genre", self.genre.is_some()),
            ("publisher", self.publisher.is_some()),
            ("series", self.series.is_some()),
            ("seriesNumber", self.series_number.is_some()),
            ("theme", self.theme.is_some()),
            ("pages", self.pages.is_some()),
            ("publicationYear", self.publication_year.is_some()),
            ("language", self.language.is_some()),
            ("description", self.description.is_some()),
            ("coverImage", self.cover_image.is_some()),
            ("personalNotes", self.personal_notes.is_some()),
            ("personalRating", self.personal_rating.is_some()),
            ("isRead", self.is_read.is_some()),
        ];

        present
            .iter()
            .filter(|(_, set)| *set)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.field_names().is_empty()
    }

    /// Merge the provided fields into `book`.
    ///
    /// Text is normalized the same way as [`NewBook::normalized`]; the caller
    /// validates the merged record.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.trim().to_string();
        }
        if let Some(author) = &self.author {
            book.author = author.trim().to_string();
        }

        merge_text(&mut book.isbn, &self.isbn);
        merge_text(&mut book.genre, &self.genre);
        merge_text(&mut book.publisher, &self.publisher);
        merge_text(&mut book.series, &self.series);
        merge_text(&mut book.theme, &self.theme);
        merge_text(&mut book.language, &self.language);
        merge_text(&mut book.description, &self.description);
        merge_text(&mut book.cover_image, &self.cover_image);
        merge_text(&mut book.personal_notes, &self.personal_notes);

        if let Some(value) = self.series_number {
            book.series_number = value;
        }
        if let Some(value) = self.pages {
            book.pages = value;
        }
        if let Some(value) = self.publication_year {
            book.publication_year = value;
        }
        if let Some(value) = self.personal_rating {
            book.personal_rating = value;
        }
        if let Some(value) = self.is_read {
            book.is_read = value;
        }
    }
}

fn clean_text(value: Option<String>) -> Option<String> {
    value.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn merge_text(target: &mut Option<String>, update: &Option<Option<String>>) {
    if let Some(value) = update {
        *target = clean_text(value.clone());
    }
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LibraryError::constraint(
            field,
            format!("{} cannot be empty", field),
        ));
    }
    Ok(())
}

fn validate_numbers(
    rating: Option<i64>,
    pages: Option<i64>,
    series_number: Option<i64>,
) -> Result<()> {
    if let Some(rating) = rating {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(LibraryError::constraint(
                "personalRating",
                format!("Rating must be between {} and {}", MIN_RATING, MAX_RATING),
            ));
        }
    }
    if matches!(pages, Some(p) if p <= 0) {
        return Err(LibraryError::constraint("pages", "Page count must be positive"));
    }
    if matches!(series_number, Some(n) if n <= 0) {
        return Err(LibraryError::constraint(
            "seriesNumber",
            "Series number must be positive",
        ));
    }
    Ok(())
}
