use core_library::LibraryError;
use core_metadata::MetadataError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Core is not initialized")]
    NotReady,

    #[error("Configuration error: {0}")]
    Config(#[from] core_runtime::Error),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Lookup error: {0}")]
    Metadata(#[from] MetadataError),
}

/// Coarse error classification for hosts that render distinct messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The store cannot be opened or reached.
    StorageUnavailable,
    /// Duplicate id, missing required field or rejected input.
    ConstraintViolation,
    NotFound,
    /// Called before `initialize()` succeeded or after `shutdown()`.
    NotReady,
    /// The external lookup could not determine a result.
    LookupFailed,
    /// Configuration problems and unexpected database errors.
    Internal,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::NotReady => ErrorKind::NotReady,
            CoreError::Config(_) => ErrorKind::Internal,
            CoreError::Library(err) => match err {
                LibraryError::StorageUnavailable(_) | LibraryError::Migration(_) => {
                    ErrorKind::StorageUnavailable
                }
                LibraryError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
                LibraryError::NotFound { .. } => ErrorKind::NotFound,
                LibraryError::NotReady => ErrorKind::NotReady,
                LibraryError::Database(_) => ErrorKind::Internal,
            },
            CoreError::Metadata(err) => match err {
                MetadataError::LookupFailed(_) => ErrorKind::LookupFailed,
                MetadataError::InvalidQuery(_) => ErrorKind::ConstraintViolation,
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(CoreError::NotReady.kind(), ErrorKind::NotReady);
        assert_eq!(
            CoreError::from(LibraryError::NotReady).kind(),
            ErrorKind::NotReady
        );
        assert_eq!(
            CoreError::from(LibraryError::StorageUnavailable("io".into())).kind(),
            ErrorKind::StorageUnavailable
        );
        assert_eq!(
            CoreError::from(LibraryError::constraint("title", "empty")).kind(),
            ErrorKind::ConstraintViolation
        );
        assert_eq!(
            CoreError::from(LibraryError::book_not_found("b1")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::from(MetadataError::LookupFailed("timeout".into())).kind(),
            ErrorKind::LookupFailed
        );
        assert_eq!(
            CoreError::from(core_runtime::Error::Config("bad".into())).kind(),
            ErrorKind::Internal
        );
    }
}
