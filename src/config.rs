use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use sift_index::{RetrieverConfig, SplitterConfig};

fn default_corpus_path() -> PathBuf {
    PathBuf::from("docs")
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".cache/sift-index")
}

fn default_batch_size() -> usize {
    32
}

fn default_top_k() -> usize {
    3
}

fn default_base_url() -> String {
    "http://localhost:11434".to_owned()
}

fn default_embedding_model() -> String {
    "nomic-embed-text".to_owned()
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub splitter: SplitterConfig,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_embedding_model(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            store_path: default_store_path(),
            embedding: EmbeddingConfig::default(),
            splitter: SplitterConfig::default(),
            batch_size: default_batch_size(),
            top_k: default_top_k(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("SIFT_OLLAMA_URL") {
            self.embedding.base_url = url;
        }
        if let Ok(model) = std::env::var("SIFT_EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
    }

    #[must_use]
    pub fn retriever_config(&self) -> RetrieverConfig {
        RetrieverConfig {
            corpus_path: self.corpus_path.clone(),
            store_path: self.store_path.clone(),
            splitter: self.splitter.clone(),
            batch_size: self.batch_size,
        }
    }
}
