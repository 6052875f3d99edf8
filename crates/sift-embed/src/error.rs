#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("embedding request failed: {0}")]
    Request(String),

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("response length mismatch: sent {sent} texts, got {got} vectors")]
    LengthMismatch { sent: usize, got: usize },

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, EmbedError>;
