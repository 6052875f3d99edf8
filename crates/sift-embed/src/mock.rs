//! Test-only mock embedding provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Embedder;
use crate::error::EmbedError;

/// Deterministic in-process embedder for tests.
///
/// Identical texts always embed to identical vectors, so exact-match
/// queries rank at distance zero. Clones share the call counter.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimension: usize,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self {
            dimension: 8,
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }
}

impl MockEmbedder {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of texts embedded so far, across all clones.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for (i, byte) in text.bytes().enumerate() {
            let weight = (i % 7) as f32 + 1.0;
            vector[i % self.dimension] += f32::from(byte) * weight / 255.0;
        }
        vector
    }
}

impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EmbedError::Other("mock embed error".into()));
        }
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        self.calls.fetch_add(texts.len(), Ordering::SeqCst);
        if self.fail {
            return Err(EmbedError::Other("mock embed error".into()));
        }
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }
}
