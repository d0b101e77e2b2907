use thiserror::Error;

/// Errors that can occur while reading or writing options.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store rejected or failed the operation.
    #[error("option backend error: {0}")]
    Backend(String),
    /// A structured option value could not be encoded.
    #[error("failed to encode option `{name}`: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
