//! Embedding provider abstraction and backend implementations.

pub mod error;
#[cfg(feature = "mock")]
pub mod mock;
pub mod ollama;

pub use error::EmbedError;
pub use ollama::OllamaEmbedder;

/// A text-to-vector embedding backend.
///
/// The vector dimension must be stable for the lifetime of the provider:
/// callers size their indexes from a single probe call and never migrate.
/// Failures are propagated as-is; no retry happens at this layer.
pub trait Embedder: Send + Sync {
    /// Embed a single text into a fixed-dimension vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding backend fails or replies empty.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, EmbedError>> + Send;

    /// Embed a batch of texts, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding backend fails or the response
    /// does not match the input length.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send;

    fn name(&self) -> &str;
}
