use thiserror::Error;

/// Errors from repository operations (used by trait definitions in topicmind-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors from the duplicate URL registry.
///
/// A missing key on lookup is not an error -- lookups return `Ok(None)`.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The URL has no network location and cannot be used as a dedup key.
    #[error("invalid URL: '{0}'")]
    InvalidUrl(String),

    /// `register` was called for a key that already has an entry.
    #[error("URL '{normalized_url}' is already registered in topic '{topic}'")]
    AlreadyExists {
        normalized_url: String,
        topic: String,
    },

    /// The underlying store could not be reached or the query failed.
    #[error("registry store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<RepositoryError> for RegistryError {
    fn from(err: RepositoryError) -> Self {
        RegistryError::StoreUnavailable(err.to_string())
    }
}

/// Errors related to loading configuration and secrets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from agent tools (web search, page scraping).
///
/// These never reach the user: the tool loop hands them back to the model
/// as `Error: ...` text.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("no content could be scraped from {0}")]
    EmptyContent(String),

    #[error("summarization failed: {0}")]
    Summarize(String),
}

/// Errors that abort a background indexing batch.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to load pending messages: {0}")]
    Load(#[from] RepositoryError),

    #[error("lookback of {0} hours is out of range")]
    LookbackOutOfRange(i64),
}
