//! Helpers for feeding buffers through streaming entry points in pieces.
//!
//! Unlike `str` splitting, these cut at arbitrary byte offsets, so UTF-8
//! sequences are routinely split across chunks.

use alloc::vec::Vec;

/// Split `payload` into approximately equal-sized chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_chunks(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    assert!(parts > 0);
    let chunk_size = payload.len().div_ceil(parts).max(1);
    payload.chunks(chunk_size).collect()
}

/// Return a sequence of prefixes converging to `payload`.
///
/// # Panics
///
/// Panics if `parts` is zero.
#[must_use]
pub fn produce_prefixes(payload: &[u8], parts: usize) -> Vec<&[u8]> {
    let mut end = 0;
    produce_chunks(payload, parts)
        .into_iter()
        .map(|chunk| {
            end += chunk.len();
            &payload[..end]
        })
        .collect()
}

/// Split `payload` into chunks whose lengths are drawn from `sizes`.
///
/// Each size is reduced modulo the remaining length (plus one), so any
/// sequence of integers is usable; whatever is left after `sizes` runs out
/// becomes the last chunk. Empty chunks are produced for zero sizes.
#[must_use]
pub fn split_by_sizes<'a>(payload: &'a [u8], sizes: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::with_capacity(sizes.len() + 1);
    let mut rest = payload;
    for &size in sizes {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at(size % (rest.len() + 1));
        chunks.push(chunk);
        rest = tail;
    }
    chunks.push(rest);
    chunks
}
