use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    /// The source could not be reached or its answer could not be understood.
    #[error("Lookup failed: {0}")]
    LookupFailed(String),

    /// Rejected before any request was issued.
    #[error("Invalid lookup query: {0}")]
    InvalidQuery(String),
}

pub type Result<T> = std::result::Result<T, MetadataError>;
