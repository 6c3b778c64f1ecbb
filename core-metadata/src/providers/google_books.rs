//! Google Books API Client
//!
//! Looks up bibliographic records and maps them onto [`NewBook`] candidates.
//!
//! ## API Endpoints
//!
//! - **By ISBN**: `{base}?q=isbn:{isbn}`
//! - **Free text**: `{base}?q={query}&maxResults={n}`
//!
//! No authentication is required. The client issues exactly one request per
//! lookup; retrying is the caller's decision.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::providers::GoogleBooksClient;
//! use core_runtime::config::LookupConfig;
//!
//! let client = GoogleBooksClient::new(http_client, LookupConfig::default());
//! match client.lookup_by_isbn("978-0-441-01359-3").await? {
//!     Some(candidate) => println!("Found {}", candidate.title),
//!     None => println!("Not found online"),
//! }
//! ```

use crate::error::{MetadataError, Result};
use crate::providers::BookLookup;
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest};
use chrono::{DateTime, Datelike, NaiveDate};
use core_library::NewBook;
use core_runtime::config::LookupConfig;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Volumes search response
#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    publisher: Option<String>,
    published_date: Option<String>,
    description: Option<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
    page_count: Option<i64>,
    #[serde(default)]
    categories: Vec<String>,
    image_links: Option<ImageLinks>,
    language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

/// Google Books volumes API client
pub struct GoogleBooksClient {
    http_client: Arc<dyn HttpClient>,
    config: LookupConfig,
}

impl GoogleBooksClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: LookupConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    async fn fetch_volumes(&self, url: String) -> Result<VolumesResponse> {
        debug!(url = %url, "Querying Google Books");

        let request = HttpRequest::get(url).header("Accept", "application/json");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| MetadataError::LookupFailed(format!("Request failed: {}", e)))?;

        if !response.is_success() {
            warn!(status = response.status, "Google Books returned an error status");
            return Err(MetadataError::LookupFailed(format!(
                "HTTP {} from lookup service",
                response.status
            )));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            MetadataError::LookupFailed(format!("Failed to parse lookup response: {}", e))
        })
    }

    fn to_candidate(&self, info: VolumeInfo) -> NewBook {
        let title = info
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.config.unknown_title.clone());

        let author = join_non_blank(&info.authors)
            .unwrap_or_else(|| self.config.unknown_author.clone());

        NewBook {
            isbn: select_isbn(&info.industry_identifiers),
            genre: join_non_blank(&info.categories),
            publisher: info.publisher,
            pages: info.page_count.filter(|p| *p > 0),
            publication_year: info.published_date.as_deref().and_then(parse_publication_year),
            language: info.language,
            description: info.description,
            cover_image: info.image_links.and_then(|links| {
                links
                    .thumbnail
                    .or(links.small_thumbnail)
                    .map(|uri| secure_uri(&uri))
            }),
            ..NewBook::new(title, author)
        }
        .normalized()
    }
}

#[async_trait]
impl BookLookup for GoogleBooksClient {
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<NewBook>> {
        let isbn = normalize_isbn(isbn);
        if isbn.is_empty() {
            return Err(MetadataError::InvalidQuery("ISBN cannot be empty".to_string()));
        }

        let url = format!(
            "{}?q=isbn:{}",
            self.config.api_base_url,
            urlencoding::encode(&isbn)
        );
        let response = self.fetch_volumes(url).await?;

        let candidate = response
            .items
            .into_iter()
            .next()
            .map(|volume| self.to_candidate(volume.volume_info));

        match &candidate {
            Some(book) => info!(isbn = %isbn, title = %book.title, "ISBN lookup matched"),
            None => info!(isbn = %isbn, "ISBN lookup found no match"),
        }

        Ok(candidate)
    }

    async fn lookup_by_query(&self, query: &str) -> Result<Vec<NewBook>> {
        if query.trim().is_empty() {
            return Err(MetadataError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!(
            "{}?q={}&maxResults={}",
            self.config.api_base_url,
            urlencoding::encode(query),
            self.config.max_results
        );
        let response = self.fetch_volumes(url).await?;

        let candidates: Vec<NewBook> = response
            .items
            .into_iter()
            .take(self.config.max_results as usize)
            .map(|volume| self.to_candidate(volume.volume_info))
            .collect();

        info!(count = candidates.len(), "Text lookup completed");
        Ok(candidates)
    }
}

/// Strip the separators people type or scan into ISBNs.
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

/// Calendar year of a `YYYY`, `YYYY-MM`, `YYYY-MM-DD` or RFC 3339 date.
pub fn parse_publication_year(date: &str) -> Option<i64> {
    let date = date.trim();

    if date.len() == 4 && date.chars().all(|c| c.is_ascii_digit()) {
        return date.parse().ok();
    }
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(i64::from(day.year()));
    }
    if let Ok(day) = NaiveDate::parse_from_str(&format!("{}-01", date), "%Y-%m-%d") {
        return Some(i64::from(day.year()));
    }
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|at| i64::from(at.year()))
}

fn select_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    ["ISBN_13", "ISBN_10"].iter().find_map(|kind| {
        identifiers
            .iter()
            .find(|id| id.kind == *kind)
            .map(|id| id.identifier.clone())
    })
}

fn join_non_blank(values: &[String]) -> Option<String> {
    let parts: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn secure_uri(uri: &str) -> String {
    match uri.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => uri.to_string(),
    }
}
