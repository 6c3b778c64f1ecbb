//! Derived views over a collection snapshot: aggregate statistics, distinct
//! filter values and the short lists shown on the home and search screens.

use crate::models::Book;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Default number of entries in the recent and top-rated lists.
pub const DEFAULT_LIST_LIMIT: usize = 5;

/// Ratings at or above this value count as top rated.
pub const TOP_RATED_MIN_RATING: i64 = 4;

/// Aggregate statistics for a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_books: usize,
    pub read_books: usize,
    pub unread_books: usize,
    pub rated_books: usize,
    /// Mean of the ratings that are present; `0.0` when nothing is rated.
    pub average_rating: f64,
    pub genre_counts: BTreeMap<String, usize>,
    /// Most common genre; the first one seen wins a tie.
    pub top_genre: Option<String>,
    pub total_pages: i64,
}

/// Distinct values available for filtering, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionFacets {
    pub genres: Vec<String>,
    pub authors: Vec<String>,
    pub series: Vec<String>,
    pub themes: Vec<String>,
}

pub fn collection_stats(books: &[Book]) -> CollectionStats {
    let read_books = books.iter().filter(|b| b.is_read).count();
    let ratings: Vec<i64> = books.iter().filter_map(|b| b.personal_rating).collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<i64>() as f64 / ratings.len() as f64
    };

    let mut genre_counts = BTreeMap::new();
    let mut genre_order = Vec::new();
    for genre in books.iter().filter_map(|b| b.genre.as_deref()) {
        let count = genre_counts.entry(genre.to_string()).or_insert(0);
        if *count == 0 {
            genre_order.push(genre);
        }
        *count += 1;
    }

    let mut top_genre: Option<(&str, usize)> = None;
    for genre in genre_order {
        let count = genre_counts.get(genre).copied().unwrap_or(0);
        if top_genre.map_or(true, |(_, best)| count > best) {
            top_genre = Some((genre, count));
        }
    }

    CollectionStats {
        total_books: books.len(),
        read_books,
        unread_books: books.len() - read_books,
        rated_books: ratings.len(),
        average_rating,
        top_genre: top_genre.map(|(genre, _)| genre.to_string()),
        genre_counts,
        total_pages: books.iter().filter_map(|b| b.pages).sum(),
    }
}

pub fn facets(books: &[Book]) -> CollectionFacets {
    CollectionFacets {
        genres: distinct(books.iter().map(|b| b.genre.as_deref())),
        authors: distinct(books.iter().map(|b| Some(b.author.as_str()))),
        series: distinct(books.iter().map(|b| b.series.as_deref())),
        themes: distinct(books.iter().map(|b| b.theme.as_deref())),
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| !v.is_empty() && seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// The first `limit` books of the snapshot, which is newest first.
pub fn recent_books(books: &[Book], limit: usize) -> Vec<Book> {
    books.iter().take(limit).cloned().collect()
}

/// Books rated at least `min_rating`, best first, ties in snapshot order.
pub fn top_rated(books: &[Book], min_rating: i64, limit: usize) -> Vec<Book> {
    let mut rated: Vec<Book> = books
        .iter()
        .filter(|b| b.personal_rating.is_some_and(|r| r >= min_rating))
        .cloned()
        .collect();
    rated.sort_by(|a, b| b.personal_rating.cmp(&a.personal_rating));
    rated.truncate(limit);
    rated
}
