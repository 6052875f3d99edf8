//! Flat, exhaustive L2 vector index.
//!
//! Deliberately simple: the corpus is small, so brute-force search over raw
//! vectors beats maintaining an approximate structure.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};
use crate::types::Segment;

/// A vector, its segment, and the id assigned at insertion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: u64,
    pub vector: Vec<f32>,
    pub segment: Segment,
}

/// One ranked search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: u64,
    /// Euclidean distance to the query; smaller is closer.
    pub distance: f32,
    pub segment: Segment,
}

/// In-memory flat index over fixed-dimension vectors.
///
/// Ids are sequential and never reused within a session. Mutation is
/// bulk-insert only.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
    next_id: u64,
}

impl FlatIndex {
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Rebuild an index from persisted entries.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if any entry's vector does not match
    /// `dimension`.
    pub fn from_entries(dimension: usize, entries: Vec<IndexEntry>) -> Result<Self> {
        for entry in &entries {
            if entry.vector.len() != dimension {
                return Err(RetrievalError::DimensionMismatch {
                    expected: dimension,
                    got: entry.vector.len(),
                });
            }
        }
        let next_id = entries.last().map_or(0, |e| e.id + 1);
        Ok(Self {
            dimension,
            entries,
            next_id,
        })
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Bulk-insert segments with their vectors, assigning sequential ids.
    ///
    /// # Errors
    ///
    /// Returns `BatchMismatch` if the slices differ in length, or
    /// `DimensionMismatch` if any vector has the wrong dimension.
    pub fn insert_batch(&mut self, segments: Vec<Segment>, vectors: Vec<Vec<f32>>) -> Result<()> {
        if segments.len() != vectors.len() {
            return Err(RetrievalError::BatchMismatch {
                segments: segments.len(),
                vectors: vectors.len(),
            });
        }
        for vector in &vectors {
            if vector.len() != self.dimension {
                return Err(RetrievalError::DimensionMismatch {
                    expected: self.dimension,
                    got: vector.len(),
                });
            }
        }

        self.entries.reserve(segments.len());
        for (segment, vector) in segments.into_iter().zip(vectors) {
            self.entries.push(IndexEntry {
                id: self.next_id,
                vector,
                segment,
            });
            self.next_id += 1;
        }
        Ok(())
    }

    /// Exhaustive nearest-neighbor search, ascending by L2 distance.
    ///
    /// Ties keep insertion order (stable sort). An empty index yields an
    /// empty result, never an error.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the query has the wrong dimension.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(RetrievalError::DimensionMismatch {
                expected: self.dimension,
                got: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .entries
            .iter()
            .map(|entry| SearchHit {
                id: entry.id,
                distance: l2_distance(query, &entry.vector),
                segment: entry.segment.clone(),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}

fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentMetadata;

    fn make_segment(content: &str) -> Segment {
        Segment {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source_file: "test.pdf".to_owned(),
                page: 0,
                content_type: "application/pdf".to_owned(),
            },
            segment_index: 0,
        }
    }

    fn populated_index() -> FlatIndex {
        let mut index = FlatIndex::new(2);
        index
            .insert_batch(
                vec![make_segment("origin"), make_segment("far"), make_segment("near")],
                vec![vec![0.0, 0.0], vec![10.0, 10.0], vec![1.0, 0.0]],
            )
            .unwrap();
        index
    }

    #[test]
    fn empty_index_search_returns_empty() {
        let index = FlatIndex::new(3);
        let hits = index.search(&[1.0, 2.0, 3.0], 5).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn search_orders_by_ascending_distance() {
        let index = populated_index();
        let hits = index.search(&[0.0, 0.0], 3).unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].segment.content, "origin");
        assert_eq!(hits[1].segment.content, "near");
        assert_eq!(hits[2].segment.content, "far");
        assert!(hits[0].distance <= hits[1].distance);
        assert!(hits[1].distance <= hits[2].distance);
    }

    #[test]
    fn search_clamps_to_index_size() {
        let index = populated_index();
        let hits = index.search(&[0.0, 0.0], 10).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn search_truncates_to_k() {
        let index = populated_index();
        let hits = index.search(&[0.0, 0.0], 1).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].segment.content, "origin");
    }

    #[test]
    fn ties_broken_by_insertion_order() {
        let mut index = FlatIndex::new(1);
        index
            .insert_batch(
                vec![make_segment("first"), make_segment("second")],
                vec![vec![1.0], vec![1.0]],
            )
            .unwrap();
        let hits = index.search(&[0.0], 2).unwrap();
        assert_eq!(hits[0].segment.content, "first");
        assert_eq!(hits[1].segment.content, "second");
    }

    #[test]
    fn ids_are_sequential_across_batches() {
        let mut index = FlatIndex::new(1);
        index
            .insert_batch(vec![make_segment("a")], vec![vec![0.0]])
            .unwrap();
        index
            .insert_batch(vec![make_segment("b")], vec![vec![1.0]])
            .unwrap();
        assert_eq!(index.entries()[0].id, 0);
        assert_eq!(index.entries()[1].id, 1);
    }

    #[test]
    fn insert_batch_length_mismatch_rejected() {
        let mut index = FlatIndex::new(1);
        let result = index.insert_batch(vec![make_segment("a")], vec![]);
        assert!(matches!(
            result,
            Err(RetrievalError::BatchMismatch { segments: 1, vectors: 0 })
        ));
    }

    #[test]
    fn insert_batch_dimension_mismatch_rejected() {
        let mut index = FlatIndex::new(2);
        let result = index.insert_batch(vec![make_segment("a")], vec![vec![1.0]]);
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(index.is_empty());
    }

    #[test]
    fn search_query_dimension_mismatch_rejected() {
        let index = populated_index();
        let result = index.search(&[0.0], 1);
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn from_entries_restores_next_id() {
        let original = populated_index();
        let restored =
            FlatIndex::from_entries(original.dimension(), original.entries().to_vec()).unwrap();
        assert_eq!(restored.len(), 3);

        let mut restored = restored;
        restored
            .insert_batch(vec![make_segment("new")], vec![vec![5.0, 5.0]])
            .unwrap();
        assert_eq!(restored.entries().last().unwrap().id, 3);
    }

    #[test]
    fn from_entries_rejects_wrong_dimension() {
        let entry = IndexEntry {
            id: 0,
            vector: vec![1.0],
            segment: make_segment("a"),
        };
        let result = FlatIndex::from_entries(2, vec![entry]);
        assert!(matches!(
            result,
            Err(RetrievalError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn l2_distance_known_value() {
        let d = l2_distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-6);
    }
}
