//! Typed error handling for the catalog core
//!
//! Every failure the core can report falls into one of four categories:
//!
//! - [`CatalogError::InvalidInput`]: malformed filter values, NaN or negative
//!   offers, impossible product data. Rejected at the boundary.
//! - [`CatalogError::InvalidOperation`]: well-formed request that the current
//!   state forbids (offer on a non-negotiable product, quantity past stock).
//! - [`CatalogError::NotFound`]: the referenced product or cart line does not exist.
//! - [`CatalogError::UpstreamUnavailable`]: the Catalog Store failed or could
//!   not be reached.
//!
//! None of them are fatal to a session: each failing operation leaves the
//! prior state intact.
//!
//! # Example
//!
//! ```rust,ignore
//! match session.submit_offer(product_id, 80.0).await {
//!     Ok(product) => println!("offer stored: {:?}", product.offer),
//!     Err(CatalogError::InvalidOperation { message }) => println!("refused: {message}"),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Result alias used across the catalog core
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The error type for every catalog operation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A value was rejected before reaching the core
    #[error("invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    /// The request is well-formed but not allowed in the current state
    #[error("operation not allowed: {message}")]
    InvalidOperation { message: String },

    /// A referenced record does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: String, id: String },

    /// The Catalog Store failed or is unreachable
    #[error("catalog store unavailable: {message}")]
    UpstreamUnavailable { message: String },
}

impl CatalogError {
    /// Build an [`CatalogError::InvalidInput`] for `field`
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        CatalogError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build an [`CatalogError::InvalidOperation`]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        CatalogError::InvalidOperation {
            message: message.into(),
        }
    }

    /// Build a [`CatalogError::NotFound`]
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CatalogError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Wrap a Catalog Store failure
    ///
    /// The alternate formatter keeps the whole `anyhow` context chain.
    pub fn upstream(err: &anyhow::Error) -> Self {
        CatalogError::UpstreamUnavailable {
            message: format!("{:#}", err),
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CatalogError::InvalidInput { .. } => "INVALID_INPUT",
            CatalogError::InvalidOperation { .. } => "INVALID_OPERATION",
            CatalogError::NotFound { .. } => "NOT_FOUND",
            CatalogError::UpstreamUnavailable { .. } => "UPSTREAM_UNAVAILABLE",
        }
    }

    /// Whether the error should end the browsing session. It never does.
    pub fn is_fatal(&self) -> bool {
        false
    }

    /// Whether the caller may retry the same request later
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::UpstreamUnavailable { .. })
    }

    /// Convert to a serializable notice for the UI layer
    pub fn to_notice(&self) -> ErrorNotice {
        ErrorNotice {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }
}

/// Serializable rendering of a [`CatalogError`]
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorNotice {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable message
    pub message: String,
}
