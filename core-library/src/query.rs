//! In-memory query engine for the book collection.
//!
//! Filtering and sorting run over a full snapshot of the collection. Both are
//! pure: no I/O, no shared state. A filter is a bag of optional conditions
//! that are ANDed together; a sort names one field and a direction.

use crate::models::Book;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filter options for searching books.
///
/// Empty strings behave like unset conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookFilter {
    /// Case-insensitive substring over title, author, description and series.
    pub search_term: Option<String>,
    pub genre: Option<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub theme: Option<String>,
    pub is_read: Option<bool>,
}

impl BookFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn is_read(mut self, is_read: bool) -> Self {
        self.is_read = Some(is_read);
        self
    }

    /// True when every set condition holds for `book`.
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(term) = active(&self.search_term) {
            let needle = term.to_lowercase();
            let hit = [
                Some(book.title.as_str()),
                Some(book.author.as_str()),
                book.description.as_deref(),
                book.series.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));

            if !hit {
                return false;
            }
        }

        if let Some(genre) = active(&self.genre) {
            if book.genre.as_deref() != Some(genre) {
                return false;
            }
        }
        if let Some(author) = active(&self.author) {
            if book.author != author {
                return false;
            }
        }
        if let Some(series) = active(&self.series) {
            if book.series.as_deref() != Some(series) {
                return false;
            }
        }
        if let Some(theme) = active(&self.theme) {
            if book.theme.as_deref() != Some(theme) {
                return false;
            }
        }
        if let Some(is_read) = self.is_read {
            if book.is_read != is_read {
                return false;
            }
        }

        true
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Sortable book fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Author,
    DateAdded,
    PublicationYear,
    Series,
    Genre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSort {
    pub field: SortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl BookSort {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Compare two books on the sort field in the requested direction.
    ///
    /// Missing text compares as the empty string and a missing year sorts
    /// before any year, so unset values lead ascending and trail descending.
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let ordering = match self.field {
            SortField::Title => a.title.cmp(&b.title),
            SortField::Author => a.author.cmp(&b.author),
            SortField::DateAdded => a.date_added.cmp(&b.date_added),
            SortField::PublicationYear => a.publication_year.cmp(&b.publication_year),
            SortField::Series => text(&a.series).cmp(text(&b.series)),
            SortField::Genre => text(&a.genre).cmp(text(&b.genre)),
        };

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Filter then sort a snapshot.
///
/// The sort is stable: books that compare equal keep their snapshot order.
/// Without a sort the filtered books come back in snapshot order.
pub fn search_books(books: &[Book], filter: &BookFilter, sort: Option<&BookSort>) -> Vec<Book> {
    let mut results: Vec<Book> = books
        .iter()
        .filter(|book| filter.matches(book))
        .cloned()
        .collect();

    if let Some(sort) = sort {
        results.sort_by(|a, b| sort.compare(a, b));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookId, NewBook};

    fn book(title: &str, author: &str) -> Book {
        Book::from_new(
            BookId::new(),
            NewBook::new(title, author),
            "2024-05-01T10:00:00.000Z",
        )
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.title.as_str()).collect()
    }

    fn library() -> Vec<Book> {
        let mut war = book("War and Peace", "Leo Tolstoy");
        war.genre = Some("Classic".to_string());
        war.is_read = true;
        war.publication_year = Some(1869);

        let mut art = book("The Art of Strategy", "Sun Tzu");
        art.description = Some("Ancient treatise on warfare".to_string());
        art.genre = Some("History".to_string());

        let mut dune = book("Dune", "Frank Herbert");
        dune.series = Some("Dune Chronicles".to_string());
        dune.genre = Some("Science Fiction".to_string());
        dune.theme = Some("Ecology".to_string());
        dune.publication_year = Some(1965);
        dune.is_read = true;

        let emma = book("Emma", "Jane Austen");

        vec![war, art, dune, emma]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let books = library();
        let results = search_books(&books, &BookFilter::new(), None);
        assert_eq!(results, books);
    }

    #[test]
    fn test_search_term_matches_any_text_field() {
        let books = library();
        let results = search_books(&books, &BookFilter::new().search_term("WAR"), None);
        assert_eq!(titles(&results), vec!["War and Peace", "The Art of Strategy"]);

        let results = search_books(&books, &BookFilter::new().search_term("chronicles"), None);
        assert_eq!(titles(&results), vec!["Dune"]);

        let results = search_books(&books, &BookFilter::new().search_term("austen"), None);
        assert_eq!(titles(&results), vec!["Emma"]);
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let books = library();
        let filter = BookFilter::new().search_term("").genre("").author("");
        assert_eq!(search_books(&books, &filter, None).len(), books.len());
    }

    #[test]
    fn test_exact_fields_are_case_sensitive() {
        let books = library();
        let results = search_books(&books, &BookFilter::new().genre("Classic"), None);
        assert_eq!(titles(&results), vec!["War and Peace"]);

        assert!(search_books(&books, &BookFilter::new().genre("classic"), None).is_empty());
        assert!(search_books(&books, &BookFilter::new().author("frank herbert"), None).is_empty());
    }

    #[test]
    fn test_conditions_are_anded() {
        let books = library();
        let filter = BookFilter::new().is_read(true).theme("Ecology");
        assert_eq!(titles(&search_books(&books, &filter, None)), vec!["Dune"]);

        let filter = BookFilter::new().is_read(false).series("Dune Chronicles");
        assert!(search_books(&books, &filter, None).is_empty());
    }

    #[test]
    fn test_is_read_filter() {
        let books = library();
        let read = search_books(&books, &BookFilter::new().is_read(true), None);
        assert!(read.iter().all(|b| b.is_read));
        assert_eq!(read.len(), 2);

        let unread = search_books(&books, &BookFilter::new().is_read(false), None);
        assert_eq!(titles(&unread), vec!["The Art of Strategy", "Emma"]);
    }

    #[test]
    fn test_sort_title_is_case_sensitive() {
        let books = vec![book("apple", "A"), book("Zebra", "B"), book("Banana", "C")];
        let results = search_books(&books, &BookFilter::new(), Some(&BookSort::asc(SortField::Title)));
        assert_eq!(titles(&results), vec!["Banana", "Zebra", "apple"]);
    }

    #[test]
    fn test_missing_values_sort_first_ascending_last_descending() {
        let books = library();

        let asc = search_books(&books, &BookFilter::new(), Some(&BookSort::asc(SortField::Genre)));
        assert_eq!(asc[0].title, "Emma");

        let desc = search_books(&books, &BookFilter::new(), Some(&BookSort::desc(SortField::Genre)));
        assert_eq!(desc.last().map(|b| b.title.as_str()), Some("Emma"));
        assert_eq!(desc[0].title, "Dune");

        let years = search_books(
            &books,
            &BookFilter::new(),
            Some(&BookSort::asc(SortField::PublicationYear)),
        );
        assert_eq!(
            titles(&years),
            vec!["The Art of Strategy", "Emma", "War and Peace", "Dune"]
        );
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let books = library();
        let results = search_books(&books, &BookFilter::new(), Some(&BookSort::desc(SortField::Series)));
        // Only Dune has a series; the rest keep snapshot order
        assert_eq!(
            titles(&results),
            vec!["Dune", "War and Peace", "The Art of Strategy", "Emma"]
        );
    }

    #[test]
    fn test_author_descending() {
        let books = vec![book("Dune", "Herbert"), book("Foundation", "Asimov")];
        let results = search_books(&books, &BookFilter::new(), Some(&BookSort::desc(SortField::Author)));
        assert_eq!(titles(&results), vec!["Dune", "Foundation"]);

        let reversed: Vec<Book> = books.into_iter().rev().collect();
        let results = search_books(&reversed, &BookFilter::new(), Some(&BookSort::desc(SortField::Author)));
        assert_eq!(titles(&results), vec!["Dune", "Foundation"]);
    }

    #[test]
    fn test_filter_and_sort_deserialize() {
        let filter: BookFilter =
            serde_json::from_str(r#"{"searchTerm": "dune", "isRead": true}"#).unwrap();
        assert_eq!(filter, BookFilter::new().search_term("dune").is_read(true));

        let sort: BookSort =
            serde_json::from_str(r#"{"field": "publicationYear", "order": "desc"}"#).unwrap();
        assert_eq!(sort, BookSort::desc(SortField::PublicationYear));

        let sort: BookSort = serde_json::from_str(r#"{"field": "title"}"#).unwrap();
        assert_eq!(sort.order, SortOrder::Asc);
    }
}
