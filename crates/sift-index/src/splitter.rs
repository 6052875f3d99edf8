use serde::Deserialize;

use crate::types::{Document, Segment};

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    100
}

fn default_min_segment_len() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitterConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    /// Chunks shorter than this are merged into the preceding chunk;
    /// documents entirely below it are dropped.
    #[serde(default = "default_min_segment_len")]
    pub min_segment_len: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_segment_len: default_min_segment_len(),
        }
    }
}

pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    #[must_use]
    pub fn new(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Split a document into bounded segments with metadata propagated.
    ///
    /// Boundaries are chosen recursively: paragraph, then sentence, then
    /// word, so no segment splits a word. Consecutive segments of the same
    /// document share `chunk_overlap` characters of trailing content.
    /// Documents whose whole trimmed content is below `min_segment_len`
    /// produce no segments at all.
    #[must_use]
    pub fn split(&self, document: &Document) -> Vec<Segment> {
        let text = &document.content;
        if text.trim().len() < self.config.min_segment_len {
            return Vec::new();
        }

        let pieces = decompose(text, self.config.chunk_size);
        let chunks = merge_pieces(&pieces, self.config.chunk_size, self.config.chunk_overlap);
        let chunks = merge_short(chunks, self.config.min_segment_len);

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, content)| Segment {
                content,
                metadata: document.metadata.clone(),
                segment_index: i,
            })
            .collect()
    }
}

/// Break text into pieces no longer than `max_len`, preferring paragraph
/// boundaries, then sentences, then words.
fn decompose(text: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    for paragraph in split_paragraphs(text) {
        if paragraph.len() <= max_len {
            pieces.push(paragraph);
            continue;
        }
        for sentence in split_sentences(&paragraph) {
            if sentence.len() <= max_len {
                pieces.push(sentence);
            } else {
                pieces.extend(split_words(&sentence, max_len));
            }
        }
    }
    pieces
}

fn split_paragraphs(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("\n\n") {
        let (head, tail) = rest.split_at(pos + 2);
        if !head.trim().is_empty() {
            parts.push(head.to_owned());
        }
        rest = tail;
    }
    if !rest.trim().is_empty() {
        parts.push(rest.to_owned());
    }
    parts
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        current.push(chars[i]);

        if (chars[i] == '.' || chars[i] == '?' || chars[i] == '!')
            && i + 1 < chars.len()
            && chars[i + 1] == ' '
            && !current.trim().is_empty()
        {
            sentences.push(std::mem::take(&mut current));
        }

        i += 1;
    }

    if !current.trim().is_empty() {
        sentences.push(current);
    }

    sentences
}

/// Pack whitespace-delimited words into pieces of at most `max_len` bytes.
/// A single word longer than `max_len` is emitted whole rather than split.
fn split_words(text: &str, max_len: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for word in text.split_inclusive(|c: char| c.is_whitespace()) {
        if !current.is_empty() && current.len() + word.len() > max_len {
            pieces.push(std::mem::take(&mut current));
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Merge pieces into chunks, respecting size and overlap.
fn merge_pieces(pieces: &[String], chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    // Sliding window: track only the piece indices contributing to the current chunk.
    let mut window_start = 0;

    for (idx, piece) in pieces.iter().enumerate() {
        if !current.is_empty() && current.len() + piece.len() > chunk_size {
            chunks.push(current.clone());

            // Build overlap from recent pieces (walk backwards from current window)
            current.clear();
            let mut overlap_len = 0;
            let mut overlap_start = idx;
            for i in (window_start..idx).rev() {
                if overlap_len + pieces[i].len() > chunk_overlap {
                    break;
                }
                overlap_len += pieces[i].len();
                overlap_start = i;
            }
            for p in &pieces[overlap_start..idx] {
                current.push_str(p);
            }
            window_start = overlap_start;
        }

        current.push_str(piece);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Fold chunks below `min_len` into the preceding chunk instead of
/// emitting near-empty segments.
fn merge_short(chunks: Vec<String>, min_len: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for chunk in chunks {
        if chunk.trim().len() < min_len
            && let Some(prev) = merged.last_mut()
        {
            prev.push(' ');
            prev.push_str(chunk.trim_start());
            continue;
        }
        merged.push(chunk);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentMetadata;

    fn make_doc(content: &str) -> Document {
        Document {
            content: content.to_owned(),
            metadata: DocumentMetadata {
                source_file: "test.pdf".to_owned(),
                page: 0,
                content_type: "application/pdf".to_owned(),
            },
        }
    }

    fn small_config() -> SplitterConfig {
        SplitterConfig {
            chunk_size: 40,
            chunk_overlap: 10,
            min_segment_len: 5,
        }
    }

    #[test]
    fn empty_document_produces_nothing() {
        let splitter = TextSplitter::new(SplitterConfig::default());
        assert!(splitter.split(&make_doc("")).is_empty());
    }

    #[test]
    fn short_document_dropped_entirely() {
        let splitter = TextSplitter::new(SplitterConfig::default());
        // Below the default 100-char minimum: dropped, not merged.
        assert!(splitter.split(&make_doc("Too short to index.")).is_empty());
    }

    #[test]
    fn single_chunk_when_content_fits() {
        let splitter = TextSplitter::new(small_config());
        let chunks = splitter.split(&make_doc("Fits in one chunk."));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].segment_index, 0);
        assert_eq!(chunks[0].content, "Fits in one chunk.");
    }

    #[test]
    fn long_text_splits_into_multiple_segments() {
        let text = "First sentence here. Second sentence here. Third sentence here. \
                    Fourth sentence here. Fifth sentence here.";
        let splitter = TextSplitter::new(small_config());
        let segments = splitter.split(&make_doc(text));
        assert!(segments.len() > 1);
        for (i, segment) in segments.iter().enumerate() {
            assert_eq!(segment.segment_index, i);
        }
    }

    #[test]
    fn metadata_preserved_on_every_segment() {
        let text = "Alpha sentence words here. Beta sentence words here. \
                    Gamma sentence words here. Delta sentence words here.";
        let splitter = TextSplitter::new(small_config());
        let segments = splitter.split(&make_doc(text));
        assert!(!segments.is_empty());
        for segment in &segments {
            assert_eq!(segment.metadata.source_file, "test.pdf");
            assert_eq!(segment.metadata.page, 0);
        }
    }

    #[test]
    fn paragraph_boundary_preferred() {
        let parts = split_paragraphs("First paragraph.\n\nSecond paragraph.");
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn sentence_boundaries_detected() {
        let sentences = split_sentences("Is this a question? Yes it is. Wow!");
        assert_eq!(sentences.len(), 3);
    }

    #[test]
    fn words_never_split() {
        let pieces = split_words("alpha beta gamma delta epsilon", 12);
        for piece in &pieces {
            for word in piece.split_whitespace() {
                assert!("alpha beta gamma delta epsilon".contains(word));
            }
        }
    }

    #[test]
    fn oversized_word_emitted_whole() {
        let pieces = split_words("tiny incomprehensibilities end", 10);
        assert!(pieces.iter().any(|p| p.contains("incomprehensibilities")));
    }

    #[test]
    fn overlap_repeats_trailing_content() {
        let pieces: Vec<String> = (0..6).map(|i| format!("piece{i} ")).collect();
        let chunks = merge_pieces(&pieces, 16, 8);
        assert!(chunks.len() > 1);
        // Second chunk starts with overlap carried from the first.
        let tail_of_first: &str = pieces[1].as_str();
        assert!(chunks[1].starts_with(tail_of_first));
    }

    #[test]
    fn short_trailing_chunk_merged_into_predecessor() {
        let chunks = merge_short(
            vec!["a long enough chunk".into(), "tiny".into()],
            10,
        );
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].ends_with("tiny"));
    }

    #[test]
    fn merge_short_keeps_long_chunks() {
        let chunks = merge_short(
            vec!["first long chunk".into(), "second long chunk".into()],
            5,
        );
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn segment_length_bounded_by_chunk_size_plus_allowance() {
        let text = "word ".repeat(200);
        let config = SplitterConfig {
            chunk_size: 50,
            chunk_overlap: 10,
            min_segment_len: 5,
        };
        let splitter = TextSplitter::new(config.clone());
        let segments = splitter.split(&make_doc(&text));
        // Merge allowance: a trailing short chunk may push one segment past
        // chunk_size by at most min_segment_len plus a separator.
        let limit = config.chunk_size + config.min_segment_len + 1;
        for segment in &segments {
            assert!(
                segment.content.len() <= limit,
                "segment of {} bytes exceeds {limit}",
                segment.content.len()
            );
        }
    }

    #[test]
    fn concatenation_covers_source_content() {
        let text = "one two three four five six seven eight nine ten \
                    eleven twelve thirteen fourteen fifteen";
        let splitter = TextSplitter::new(SplitterConfig {
            chunk_size: 30,
            chunk_overlap: 0,
            min_segment_len: 2,
        });
        let segments = splitter.split(&make_doc(text));
        let total: usize = segments.iter().map(|s| s.content.len()).sum();
        // No overlap configured: every source byte appears once, plus at
        // most one joining space per merge.
        assert!(total >= text.len());
        assert!(total <= text.len() + segments.len());
    }

    mod proptest_splitter {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(500))]

            #[test]
            fn split_never_panics(
                content in "\\PC{0,3000}",
                chunk_size in 1usize..1500,
                chunk_overlap in 0usize..400,
                min_segment_len in 0usize..200,
            ) {
                let splitter = TextSplitter::new(SplitterConfig {
                    chunk_size,
                    chunk_overlap,
                    min_segment_len,
                });
                let _ = splitter.split(&make_doc(&content));
            }

            #[test]
            fn segment_indices_sequential(
                content in "[a-z. ]{10,800}",
                chunk_size in 5usize..100,
            ) {
                let splitter = TextSplitter::new(SplitterConfig {
                    chunk_size,
                    chunk_overlap: 0,
                    min_segment_len: 1,
                });
                let segments = splitter.split(&make_doc(&content));
                for (i, segment) in segments.iter().enumerate() {
                    prop_assert_eq!(segment.segment_index, i);
                }
            }

            #[test]
            fn no_empty_segments(
                content in "[a-z. !?\\n]{1,500}",
                chunk_size in 1usize..200,
            ) {
                let splitter = TextSplitter::new(SplitterConfig {
                    chunk_size,
                    chunk_overlap: 0,
                    min_segment_len: 1,
                });
                let segments = splitter.split(&make_doc(&content));
                for segment in &segments {
                    prop_assert!(!segment.content.is_empty());
                }
            }

            #[test]
            fn chunks_cover_all_content(
                content in "[a-z ]{10,400}",
                chunk_size in 10usize..200,
            ) {
                let splitter = TextSplitter::new(SplitterConfig {
                    chunk_size,
                    chunk_overlap: 0,
                    min_segment_len: 1,
                });
                let segments = splitter.split(&make_doc(&content));

                if content.trim().len() >= 1 {
                    prop_assert!(!segments.is_empty());
                }

                // Whitespace-only chunks may collapse during merging, but
                // every non-whitespace byte survives.
                let letters = content.chars().filter(|c| !c.is_whitespace()).count();
                let total: usize = segments.iter().map(|s| s.content.len()).sum();
                prop_assert!(total >= letters);
            }
        }
    }
}
