use thiserror::Error;

/// Any failure to obtain a sample: transport, HTTP status or decoding.
///
/// Callers never branch on the cause, so it is carried as text only.
#[derive(Debug, Error)]
#[error("position fetch failed: {0}")]
pub struct FetchError(String);

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        FetchError(message.into())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError(err.to_string())
    }
}
