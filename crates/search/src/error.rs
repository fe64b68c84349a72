//! Error types for the search-dispatch engine.
//!
//! Searches fail in exactly three ways: the caller's input is rejected
//! ([`InputError`]), the query ran but matched nothing ([`SearchError::NotFound`]),
//! or the storage collaborator failed ([`StorageError`]). Storage failures are
//! never recovered locally; they propagate unchanged to the caller.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// The error returned by [`SearchEngine::search`](crate::search::SearchEngine::search).
#[derive(Error, Debug)]
pub enum SearchError {
    /// The search type is unknown or the term failed grammar/enumeration validation.
    #[error(transparent)]
    Rejected(#[from] InputError),

    /// The query executed successfully but returned zero rows.
    #[error("{message}")]
    NotFound {
        module: String,
        term: String,
        message: String,
    },

    /// The storage collaborator failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Response category a [`SearchError`] maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The caller sent something invalid (HTTP 400).
    ClientError,
    /// Nothing matched (HTTP 404).
    NotFound,
    /// The backing store failed (HTTP 500).
    ServerError,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::ClientError => write!(f, "client-error"),
            ErrorCategory::NotFound => write!(f, "not-found"),
            ErrorCategory::ServerError => write!(f, "server-error"),
        }
    }
}

impl SearchError {
    /// Returns the response category for this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            SearchError::Rejected(_) => ErrorCategory::ClientError,
            SearchError::NotFound { .. } => ErrorCategory::NotFound,
            SearchError::Storage(_) => ErrorCategory::ServerError,
        }
    }

    /// Returns the HTTP status code conventionally used for this error.
    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::ClientError => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::ServerError => 500,
        }
    }

    /// Returns `true` if this is a "no matching records" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::NotFound { .. })
    }

    /// Returns `true` if the caller's input was rejected.
    pub fn is_rejected(&self) -> bool {
        matches!(self, SearchError::Rejected(_))
    }
}

/// Caller-input errors. Messages are domain-facing (Spanish).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The term is missing or blank.
    #[error("el término de búsqueda no puede estar vacío")]
    EmptyTerm,

    /// The search type token is not declared by the module.
    #[error(
        "tipo de búsqueda '{token}' no válido para {module}; valores permitidos: {}",
        .valid.join(", ")
    )]
    UnknownSearchType {
        module: String,
        token: String,
        valid: Vec<String>,
    },

    /// The module key is not known to the registry.
    #[error("módulo '{module}' no válido; valores permitidos: {}", .valid.join(", "))]
    UnknownModule { module: String, valid: Vec<String> },

    /// The term does not follow the grammar of its search type.
    #[error("formato inválido para {search_type}: '{term}' ({reason})")]
    MalformedTerm {
        search_type: String,
        term: String,
        reason: String,
    },

    /// The term is not one of the accepted enumerated values.
    #[error(
        "valor '{value}' no válido para {search_type}; valores aceptados: {}",
        .accepted.join(", ")
    )]
    InvalidValue {
        search_type: String,
        value: String,
        accepted: Vec<String>,
    },
}

/// Errors raised by a storage collaborator.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// The requested capability is not supported by this backend.
    #[error("capability '{capability}' not supported by {backend_name}")]
    UnsupportedCapability {
        backend_name: String,
        capability: String,
    },

    /// Schema creation error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "sqlite".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StorageError {
    fn from(_err: r2d2::Error) -> Self {
        StorageError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_search_type_lists_valid_tokens() {
        let err = InputError::UnknownSearchType {
            module: "miembros".to_string(),
            token: "Height".to_string(),
            valid: vec!["FirstNames".to_string(), "Gender".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("'Height'"));
        assert!(message.contains("FirstNames, Gender"));
    }

    #[test]
    fn test_invalid_value_names_rejected_value() {
        let err = InputError::InvalidValue {
            search_type: "Gender".to_string(),
            value: "purple".to_string(),
            accepted: vec!["male".to_string(), "female".to_string()],
        };
        assert!(err.to_string().contains("'purple'"));
    }

    #[test]
    fn test_search_error_categories() {
        let rejected: SearchError = InputError::EmptyTerm.into();
        assert_eq!(rejected.category(), ErrorCategory::ClientError);
        assert_eq!(rejected.status_code(), 400);
        assert!(rejected.is_rejected());

        let not_found = SearchError::NotFound {
            module: "members".to_string(),
            term: "Maria".to_string(),
            message: "No se encontraron miembros".to_string(),
        };
        assert_eq!(not_found.category(), ErrorCategory::NotFound);
        assert_eq!(not_found.status_code(), 404);
        assert_eq!(not_found.to_string(), "No se encontraron miembros");

        let storage: SearchError = StorageError::Backend(BackendError::QueryError {
            message: "boom".to_string(),
        })
        .into();
        assert_eq!(storage.category(), ErrorCategory::ServerError);
        assert_eq!(storage.status_code(), 500);
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::UnsupportedCapability {
            backend_name: "memory".to_string(),
            capability: "raw predicates".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "capability 'raw predicates' not supported by memory"
        );
    }

    #[test]
    fn test_storage_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let storage: StorageError = err.into();
        assert!(matches!(
            storage,
            StorageError::Backend(BackendError::SerializationError { .. })
        ));
    }
}
