use thiserror::Error;

/// Errors that can occur while crawling the reference graph.
#[derive(Error, Debug)]
pub enum RefCrawlError {
    /// The reference source rejected or failed a retrieval.
    #[error("fetch error: {message} (endpoint: {endpoint})")]
    Fetch { message: String, endpoint: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("fixture error: {message} (path: {path})")]
    Fixture { message: String, path: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `RefCrawlError`.
pub type Result<T> = std::result::Result<T, RefCrawlError>;
