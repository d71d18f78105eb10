//! Error types for the books module

use std::path::PathBuf;

use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Failure to render a `begin_with` value as an ISO-8601 timestamp.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("begin_with {seconds} is outside the representable date range")]
    OutOfRange { seconds: i64 },

    #[error("failed to render timestamp: {0}")]
    Render(#[from] time::error::Format),
}

/// Errors a resolver can report for the field it is resolving.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl ResolveError {
    /// Machine-readable code placed in the GraphQL error `extensions`
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Format(_) => "FORMAT_ERROR",
        }
    }
}

impl ErrorExtensions for ResolveError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code();
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", code))
    }
}

/// Failure to build a book store from an external catalogue.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read book catalogue {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse book catalogue {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("book {id} has an empty {field}")]
    EmptyField { id: i64, field: &'static str },

    #[error("book id {id} is not a positive integer")]
    NonPositiveId { id: i64 },
}
