use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API key not found: set the {0} environment variable")]
    MissingCredential(String),

    #[error("Generation service request failed: {0}")]
    Transport(String),

    #[error("Product identification failed: {0}")]
    Identification(String),

    #[error("Export analysis failed: {0}")]
    Analysis(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Transport(e.to_string())
    }
}
