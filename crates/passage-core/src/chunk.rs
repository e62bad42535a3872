//! Sentence-boundary text chunker.
//!
//! Splits normalized document text into segments that respect a
//! configurable `chunk_size` character limit. Splitting prefers sentence
//! boundaries (`.`, `!`, `?` followed by whitespace) so each chunk stays
//! coherent; only a sentence that alone exceeds the limit is hard-split.
//!
//! # Algorithm
//!
//! 1. Collapse all whitespace runs to single spaces and trim the ends.
//! 2. Segment into sentences at boundary punctuation followed by
//!    whitespace. This is a heuristic, not a full sentence-boundary
//!    algorithm; abbreviation-heavy text may over- or under-split.
//! 3. Greedily accumulate sentences into a buffer; when the next sentence
//!    would push the buffer past `chunk_size`, flush the buffer as a chunk
//!    and start a new one with that sentence.
//! 4. A single sentence longer than `chunk_size` is hard-split: emit a
//!    `chunk_size`-character prefix as a chunk, then continue `overlap`
//!    characters before the cut point, never before the sentence start.
//! 5. The final non-empty buffer is emitted as the last chunk.
//!
//! Output is deterministic for identical input and parameters, and no
//! emitted chunk is empty after trimming. Sizes are measured in
//! characters, with slices snapped to UTF-8 boundaries.
//!
//! # Example
//!
//! ```rust
//! use passage_core::chunk::split_text;
//!
//! let chunks = split_text("First sentence. Second sentence.", 1000, 200);
//! assert_eq!(chunks.len(), 1);
//! assert_eq!(chunks[0], "First sentence. Second sentence.");
//! ```

/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
/// Default hard-split overlap, in characters.
pub const DEFAULT_OVERLAP: usize = 200;

/// Split `text` into ordered chunks of at most `chunk_size` characters.
///
/// Empty or whitespace-only input yields an empty vector. `overlap` only
/// applies to the hard-split of oversize sentences; sentence-aligned
/// chunks do not overlap.
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut buf = String::new();

    for sentence in split_sentences(&normalized) {
        if char_len(sentence) > chunk_size {
            if !buf.is_empty() {
                push_chunk(&mut chunks, &buf);
                buf.clear();
            }
            buf = hard_split(sentence, chunk_size, overlap, &mut chunks);
            continue;
        }

        let would_be = if buf.is_empty() {
            char_len(sentence)
        } else {
            char_len(&buf) + 1 + char_len(sentence)
        };
        if would_be > chunk_size && !buf.is_empty() {
            push_chunk(&mut chunks, &buf);
            buf.clear();
        }
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(sentence);
    }

    if !buf.is_empty() {
        push_chunk(&mut chunks, &buf);
    }

    chunks
}

/// Emit `chunk_size`-character pieces of an oversize sentence, each new
/// piece starting `overlap` characters before the prior cut. Returns the
/// remaining tail (at most `chunk_size` characters) for the caller to
/// keep accumulating into.
fn hard_split(sentence: &str, chunk_size: usize, overlap: usize, chunks: &mut Vec<String>) -> String {
    let total = char_len(sentence);
    // An overlap >= chunk_size would stall the cursor; always advance.
    let step = chunk_size.saturating_sub(overlap).max(1);
    let mut start = 0;
    while total - start > chunk_size {
        push_chunk(chunks, slice_chars(sentence, start, start + chunk_size));
        start += step;
    }
    slice_chars(sentence, start, total).to_string()
}

/// Collapse whitespace runs to single spaces and trim the ends.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text at `.`, `!`, or `?` followed by whitespace.
/// The punctuation stays with the preceding sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut iter = text.char_indices().peekable();
    while let Some((_, c)) = iter.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_i, next_c)) = iter.peek() {
                if next_c.is_whitespace() {
                    sentences.push(&text[start..next_i]);
                    iter.next();
                    start = next_i + next_c.len_utf8();
                }
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

fn push_chunk(chunks: &mut Vec<String>, piece: &str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Slice by character offsets, clamped to the end of the string.
fn slice_chars(s: &str, start: usize, end: usize) -> &str {
    let begin = byte_index(s, start);
    let finish = byte_index(s, end);
    &s[begin..finish]
}

fn byte_index(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}
