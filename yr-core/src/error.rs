use std::path::PathBuf;

/// Errors produced while resolving, fetching and parsing a yr.no forecast.
#[derive(Debug, thiserror::Error)]
pub enum YrError {
    #[error("Invalid yr.no URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    #[error("Unsupported language '{0}'. Supported languages: nb, nn, en.")]
    UnsupportedLanguage(String),

    #[error("Failed to fetch {url}: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Document from {url} is not valid XML: {message}")]
    InvalidDocument { url: String, message: String },

    #[error("Malformed forecast document: {0}")]
    MalformedDocument(String),

    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),

    #[error("Cache directory does not exist ({})", .0.display())]
    CacheUnavailable(PathBuf),

    #[error("Failed to write cache file {}: {source}", .path.display())]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render forecast table: {0}")]
    Render(#[from] askama::Error),
}

impl YrError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        YrError::MalformedDocument(message.into())
    }
}

pub type Result<T, E = YrError> = std::result::Result<T, E>;
