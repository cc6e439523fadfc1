//! Error type shared by the stores and storage backends

use thiserror::Error;

/// Failures surfaced by [`WidgetStore`](crate::WidgetStore) and the storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Stored content is not a JSON array of objects
    #[error("stored widgets are not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The widget list could not be encoded
    #[error("failed to encode widgets: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Backend failure (quota exceeded, storage disabled, no window)
    #[error("storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;
