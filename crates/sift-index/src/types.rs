use serde::{Deserialize, Serialize};

/// Provenance carried from a source page down to every derived segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Base name of the originating file.
    pub source_file: String,
    /// Zero-based page index within the source file.
    pub page: usize,
    pub content_type: String,
}

/// One page of source text. Immutable once created.
#[derive(Debug, Clone)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// Bounded-length piece of a document, the unit of embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub content: String,
    pub metadata: DocumentMetadata,
    /// Sequential position among the segments of the same document.
    pub segment_index: usize,
}
