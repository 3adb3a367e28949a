//! Error handling for the watchgate service
//!
//! `GateError` is the single domain error shared by the stores, the access
//! engine and the CLI. The HTTP layer maps it onto status codes through
//! `AppError` (see `api_errors`).

use thiserror::Error;

/// Main error type for catalog, audit and access operations
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },

    /// A movie has no minimum age recorded. Access checks fail closed on it.
    #[error("Movie {movie_id} has no minimum age rating")]
    MissingAgeRating { movie_id: u64 },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Store unavailable: {operation} - {source}")]
    StoreUnavailable {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Audit chain broken at decision {decision_id}: {message}")]
    AuditChain { decision_id: u64, message: String },

    #[error("Mutex lock failed: {resource}")]
    MutexPoisoned { resource: String },
}

pub type GateResult<T> = Result<T, GateError>;

impl GateError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::StoreUnavailable {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    pub fn audit_chain(decision_id: u64, message: impl Into<String>) -> Self {
        Self::AuditChain {
            decision_id,
            message: message.into(),
        }
    }

    pub fn poisoned(resource: impl Into<String>) -> Self {
        Self::MutexPoisoned {
            resource: resource.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Helper trait for safe RwLock read operations
pub trait SafeReadLock<T: ?Sized> {
    /// Safely acquire a read lock
    fn safe_read(&self) -> GateResult<std::sync::RwLockReadGuard<'_, T>>;
}

impl<T: ?Sized> SafeReadLock<T> for std::sync::RwLock<T> {
    fn safe_read(&self) -> GateResult<std::sync::RwLockReadGuard<'_, T>> {
        self.read().map_err(|_| GateError::poisoned("rwlock_read"))
    }
}

/// Helper trait for safe RwLock write operations
pub trait SafeWriteLock<T: ?Sized> {
    /// Safely acquire a write lock
    fn safe_write(&self) -> GateResult<std::sync::RwLockWriteGuard<'_, T>>;
}

impl<T: ?Sized> SafeWriteLock<T> for std::sync::RwLock<T> {
    fn safe_write(&self) -> GateResult<std::sync::RwLockWriteGuard<'_, T>> {
        self.write().map_err(|_| GateError::poisoned("rwlock_write"))
    }
}

/// Convert from sled errors
impl From<sled::Error> for GateError {
    fn from(err: sled::Error) -> Self {
        GateError::store("sled_operation", err)
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::serialization("json_operation", err)
    }
}
