//! Fixed-size text chunking for long documents.
//!
//! Splits are contiguous and non-overlapping: every chunk is exactly `size`
//! characters except the final one, which may be shorter. Concatenating the
//! chunks in order reconstructs the input exactly.

use crate::record::DocumentChunk;

/// Split `text` into non-overlapping chunks of `size` characters.
///
/// Deterministic: the same input and size always produce the same sequence.
/// Empty input produces an empty sequence. `size` must be greater than zero.
pub fn chunk(text: &str, size: usize) -> Vec<String> {
    assert!(size > 0, "chunk size must be greater than zero");

    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(size)
        .map(|segment| segment.iter().collect())
        .collect()
}

/// Chunk a document, tagging each segment with the shared document id and
/// its position in the sequence.
pub fn chunk_document(document_id: &str, text: &str, size: usize) -> Vec<DocumentChunk> {
    chunk(text, size)
        .into_iter()
        .enumerate()
        .map(|(sequence, text)| DocumentChunk {
            document_id: document_id.to_string(),
            sequence,
            text,
        })
        .collect()
}
