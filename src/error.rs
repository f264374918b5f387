use thiserror::Error;

/// Why the data document could not be loaded.
///
/// Every variant is terminal for the session and is shown to the reader as
/// the same error panel.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("could not read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("data.json is not a valid object")]
    NotAnObject,
}
