//! Document ingestion and similarity retrieval over a local corpus.
//!
//! The pipeline walks a directory of source files, splits page-level text
//! into bounded overlapping segments, embeds them through a provider from
//! `sift-embed`, stores vectors in a flat exhaustive L2 index, persists the
//! index as self-describing JSON, and serves nearest-neighbor queries
//! through a load-or-build retriever facade.

pub mod error;
pub mod index;
pub mod loader;
pub mod persist;
pub mod retriever;
pub mod scanner;
pub mod splitter;
pub mod types;

pub use error::{Result, RetrievalError};
pub use index::{FlatIndex, IndexEntry, SearchHit};
#[cfg(feature = "pdf")]
pub use loader::PdfLoader;
pub use loader::{DocumentLoader, TextLoader};
pub use retriever::{BuildReport, InitOutcome, Retriever, RetrieverConfig, RetrieverStatus};
pub use splitter::{SplitterConfig, TextSplitter};
pub use types::{Document, DocumentMetadata, Segment};
