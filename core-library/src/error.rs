use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Constraint violation: {field} - {message}")]
    ConstraintViolation { field: String, message: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Collection is not ready")]
    NotReady,

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl LibraryError {
    pub fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn book_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Book".to_string(),
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for LibraryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                LibraryError::StorageUnavailable(err.to_string())
            }
            sqlx::Error::Io(ref io) => LibraryError::StorageUnavailable(io.to_string()),
            sqlx::Error::Database(ref db) => match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => LibraryError::ConstraintViolation {
                    field: "id".to_string(),
                    message: db.message().to_string(),
                },
                sqlx::error::ErrorKind::NotNullViolation
                | sqlx::error::ErrorKind::CheckViolation => LibraryError::ConstraintViolation {
                    field: "record".to_string(),
                    message: db.message().to_string(),
                },
                _ => LibraryError::Database(err),
            },
            other => LibraryError::Database(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_storage_unavailable() {
        let err: LibraryError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, LibraryError::StorageUnavailable(_)));

        let err: LibraryError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, LibraryError::StorageUnavailable(_)));
    }

    #[test]
    fn test_row_not_found_stays_database_error() {
        let err: LibraryError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, LibraryError::Database(_)));
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(
            LibraryError::constraint("title", "empty"),
            LibraryError::ConstraintViolation { ref field, .. } if field == "title"
        ));
        assert_eq!(
            LibraryError::book_not_found("b1").to_string(),
            "Entity not found: Book with id b1"
        );
    }
}
