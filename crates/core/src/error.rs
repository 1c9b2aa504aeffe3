use thiserror::Error;

pub type AdForgeResult<T> = Result<T, AdForgeError>;

#[derive(Error, Debug)]
pub enum AdForgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Text generation error: {0}")]
    Generation(String),

    #[error("Image generation error: {0}")]
    ImageGeneration(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Analysis store error: {0}")]
    Store(String),

    #[error("Campaign validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
