//! Retrieval facade: load-or-build orchestration over the pipeline.
//!
//! Lifecycle: `Uninitialized` until `initialize()` succeeds, then `Ready`
//! (backed by a persisted store) or `ReadyUnpersisted` (the save failed;
//! the index serves queries for this process only). One ingestion pass per
//! instance; everything runs sequentially.

use std::path::PathBuf;
use std::time::Instant;

use serde::Deserialize;
use sift_embed::Embedder;

use crate::error::{Result, RetrievalError};
use crate::index::{FlatIndex, SearchHit};
use crate::loader::DocumentLoader;
use crate::persist;
use crate::scanner::scan_corpus;
use crate::splitter::{SplitterConfig, TextSplitter};
use crate::types::{Document, Segment};

fn default_batch_size() -> usize {
    32
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrieverConfig {
    /// Root directory of source documents.
    pub corpus_path: PathBuf,
    /// Directory holding the persisted index.
    pub store_path: PathBuf,
    #[serde(default)]
    pub splitter: SplitterConfig,
    /// Segments embedded per progress step. Granularity only; batches
    /// never run concurrently.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// Observable lifecycle state of a retriever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrieverStatus {
    Uninitialized,
    Ready,
    ReadyUnpersisted,
}

/// How `initialize()` produced a serviceable index.
#[derive(Debug)]
pub enum InitOutcome {
    /// Persisted index found and loaded; no embedding calls were made.
    Loaded,
    /// Index built from source documents.
    Built(BuildReport),
}

/// Summary of an ingestion run.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub files_scanned: usize,
    pub files_failed: usize,
    pub documents_loaded: usize,
    pub segments_indexed: usize,
    pub persisted: bool,
    pub duration_ms: u64,
}

enum State {
    Uninitialized,
    Ready { index: FlatIndex, persisted: bool },
}

/// Orchestrates scan → load → split → embed → index → persist, and serves
/// similarity queries once ready.
pub struct Retriever<E: Embedder> {
    config: RetrieverConfig,
    embedder: E,
    loader: Box<dyn DocumentLoader>,
    state: State,
}

impl<E: Embedder> Retriever<E> {
    #[must_use]
    pub fn new(config: RetrieverConfig, embedder: E, loader: Box<dyn DocumentLoader>) -> Self {
        Self {
            config,
            embedder,
            loader,
            state: State::Uninitialized,
        }
    }

    #[must_use]
    pub fn status(&self) -> RetrieverStatus {
        match &self.state {
            State::Uninitialized => RetrieverStatus::Uninitialized,
            State::Ready { persisted: true, .. } => RetrieverStatus::Ready,
            State::Ready { persisted: false, .. } => RetrieverStatus::ReadyUnpersisted,
        }
    }

    /// Load the persisted index if present, otherwise build from source.
    ///
    /// Idempotent: repeated calls with a persisted store reload it without
    /// re-embedding. A persistence read failure falls through to a rebuild.
    ///
    /// # Errors
    ///
    /// Returns `EmptyCorpus` if no usable documents exist, or an embedding
    /// error from the build path. The state stays `Uninitialized` on error.
    pub async fn initialize(&mut self) -> Result<InitOutcome> {
        if let Some(index) = persist::load(&self.config.store_path) {
            self.state = State::Ready {
                index,
                persisted: true,
            };
            return Ok(InitOutcome::Loaded);
        }

        let report = self.build().await?;
        Ok(InitOutcome::Built(report))
    }

    /// Embed `query` once and return the `k` nearest segments.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` unless a prior `initialize()` succeeded,
    /// or an embedding error for the query.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        let State::Ready { index, .. } = &self.state else {
            return Err(RetrievalError::NotInitialized);
        };

        let vector = self.embedder.embed(query).await?;
        index.search(&vector, k)
    }

    #[allow(clippy::cast_precision_loss)]
    async fn build(&mut self) -> Result<BuildReport> {
        let start = Instant::now();
        let mut report = BuildReport::default();

        let files = scan_corpus(&self.config.corpus_path, self.loader.supported_extensions());
        report.files_scanned = files.len();

        let mut documents: Vec<Document> = Vec::new();
        for path in &files {
            match self.loader.load(path).await {
                Ok(docs) => {
                    tracing::info!(file = %path.display(), pages = docs.len(), "loaded");
                    documents.extend(docs);
                }
                Err(e) => {
                    report.files_failed += 1;
                    tracing::warn!(file = %path.display(), error = %e, "skipping unreadable file");
                }
            }
        }
        report.documents_loaded = documents.len();

        let splitter = TextSplitter::new(self.config.splitter.clone());
        let segments: Vec<Segment> = documents.iter().flat_map(|d| splitter.split(d)).collect();
        if segments.is_empty() {
            tracing::warn!(
                corpus = %self.config.corpus_path.display(),
                "no usable documents after loading and splitting"
            );
            return Err(RetrievalError::EmptyCorpus);
        }
        tracing::info!(
            documents = documents.len(),
            segments = segments.len(),
            "corpus split"
        );

        // A single probe sizes the index; the dimension is fixed for its lifetime.
        let probe = self.embedder.embed("dimension probe").await?;
        let mut index = FlatIndex::new(probe.len());

        let total = segments.len();
        let batch_size = self.config.batch_size.max(1);
        let embed_start = Instant::now();
        let mut processed = 0usize;

        for batch in segments.chunks(batch_size) {
            let texts: Vec<String> = batch.iter().map(|s| s.content.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            index.insert_batch(batch.to_vec(), vectors)?;

            processed += batch.len();
            let elapsed = embed_start.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                processed as f64 / elapsed
            } else {
                0.0
            };
            let eta = if rate > 0.0 {
                (total - processed) as f64 / rate
            } else {
                0.0
            };
            tracing::info!(
                processed,
                total,
                elapsed_s = format_args!("{elapsed:.1}"),
                eta_s = format_args!("{eta:.1}"),
                "embedding progress"
            );
        }

        let persisted = match persist::save(&index, &self.config.store_path) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    store = %self.config.store_path.display(),
                    error = %e,
                    "failed to persist index; serving from memory only"
                );
                false
            }
        };

        report.segments_indexed = index.len();
        report.persisted = persisted;
        report.duration_ms = start.elapsed().as_millis().try_into().unwrap_or(u64::MAX);

        self.state = State::Ready { index, persisted };
        Ok(report)
    }
}
