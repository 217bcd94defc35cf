use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("embedding dimension {actual} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("chunk count {chunks} does not match embedding count {embeddings}")]
    CountMismatch { chunks: usize, embeddings: usize },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid response from {provider}: {details}")]
    BackendResponse { provider: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("model request failed: {0}")]
    Request(String),

    #[error("llm client not configured: {0}")]
    NotConfigured(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("invalid tool input: {0}")]
    InvalidInput(String),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
