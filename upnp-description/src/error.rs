//! Error types for device description parsing.

use thiserror::Error;

use crate::query::QueryError;

/// Error type for description loading and parsing.
///
/// A failed construction always yields one of these; a partially built
/// device tree is never handed out.
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// A mandatory field is absent or empty
    #[error("mandatory field `{path}` not provided, non-compliant UPnP device")]
    MissingField { path: String },

    /// A mandatory element (serviceList, device, root...) is absent
    #[error("mandatory element `{path}` not found in device description")]
    MissingElement { path: String },

    /// The document declares a UPnP version this parser does not support
    #[error("unsupported device version ({major}.{minor})")]
    UnsupportedVersion { major: i64, minor: i64 },

    /// A URL could not be parsed, even after resolution against the base
    #[error("malformed URL `{url}`: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A mandatory numeric field holds a non-numeric value
    #[error("field `{path}` is not a valid number: `{value}`")]
    InvalidNumber { path: String, value: String },

    /// Device nesting is deeper than the configured limit
    #[error("device nesting exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },

    /// Element nesting of the document is deeper than the configured limit
    #[error("document element nesting exceeds the limit of {limit} levels")]
    DocumentTooDeep { limit: usize },

    /// The document is not well-formed XML
    #[error("XML parsing error: {0}")]
    Xml(String),

    /// The description could not be fetched
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// Reading a local description failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The query engine rejected a path
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Loader configuration is inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DescriptionError {
    /// True for errors caused by a mandatory field or element being absent.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            DescriptionError::MissingField { .. } | DescriptionError::MissingElement { .. }
        )
    }

    pub(crate) fn malformed_url(url: impl Into<String>, source: url::ParseError) -> Self {
        DescriptionError::MalformedUrl {
            url: url.into(),
            source,
        }
    }
}

/// Convenience Result type alias for description operations.
pub type Result<T> = std::result::Result<T, DescriptionError>;
