use ollama_rs::Ollama;
use ollama_rs::generation::embeddings::request::{EmbeddingsInput, GenerateEmbeddingsRequest};

use crate::Embedder;
use crate::error::EmbedError;

/// Ollama-backed embedding provider.
#[derive(Debug, Clone)]
pub struct OllamaEmbedder {
    client: Ollama,
    model: String,
}

impl OllamaEmbedder {
    #[must_use]
    pub fn new(base_url: &str, model: String) -> Self {
        let (host, port) = parse_host_port(base_url);
        Self {
            client: Ollama::new(host, port),
            model,
        }
    }

    /// Check if Ollama is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection to Ollama fails.
    pub async fn health_check(&self) -> Result<(), EmbedError> {
        self.client.list_local_models().await.map_err(|e| {
            EmbedError::Request(format!("failed to connect to Ollama — is it running? {e}"))
        })?;
        Ok(())
    }
}

impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let request =
            GenerateEmbeddingsRequest::new(self.model.clone(), EmbeddingsInput::from(text));

        let response = self.client.generate_embeddings(request).await.map_err(|e| {
            tracing::warn!(model = %self.model, error = %e, "embedding request failed");
            EmbedError::Request(format!("Ollama embedding request failed: {e}"))
        })?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or(EmbedError::EmptyResponse { provider: "ollama" })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(texts = texts.len(), model = %self.model, "embedding batch");
        let request = GenerateEmbeddingsRequest::new(
            self.model.clone(),
            EmbeddingsInput::Multiple(texts.to_vec()),
        );

        let response = self.client.generate_embeddings(request).await.map_err(|e| {
            tracing::warn!(model = %self.model, error = %e, "embedding request failed");
            EmbedError::Request(format!("Ollama embedding request failed: {e}"))
        })?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbedError::LengthMismatch {
                sent: texts.len(),
                got: response.embeddings.len(),
            });
        }

        Ok(response.embeddings)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "ollama"
    }
}

fn parse_host_port(url: &str) -> (String, u16) {
    let url = url.trim_end_matches('/');
    if let Some(colon_pos) = url.rfind(':') {
        let port_str = &url[colon_pos + 1..];
        if let Ok(port) = port_str.parse::<u16>() {
            let host = url[..colon_pos].to_string();
            return (host, port);
        }
    }
    (url.to_string(), 11434)
}
