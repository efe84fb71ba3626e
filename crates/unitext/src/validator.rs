//! Incremental UTF-8 validation.

use log::trace;

use crate::utf8::{Utf8Peek, inspect, peek_first_scalar, peek_last_scalar};

/// Validates UTF-8 delivered in arbitrary chunks.
///
/// Up to three bytes of a sequence split across chunks are carried over.
/// Feeding a stream through [`try_consume`](Self::try_consume) gives the same
/// verdict as [`is_well_formed`](crate::is_well_formed) on the concatenation.
/// Failure is sticky.
///
/// Like [`StreamingMarvin`](crate::StreamingMarvin) this is a plain value;
/// sharing one across threads needs outside synchronization.
///
/// # Examples
///
/// ```rust
/// use unitext::Utf8StreamingValidator;
///
/// let mut validator = Utf8StreamingValidator::new();
/// assert!(validator.try_consume(b"caf\xC3", false));
/// assert!(validator.try_consume(b"\xA9", true));
///
/// let mut validator = Utf8StreamingValidator::new();
/// assert!(!validator.try_consume(b"caf\xC3", true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8StreamingValidator {
    pending: [u8; 4],
    pending_len: usize,
    failed: bool,
}

impl Utf8StreamingValidator {
    /// A validator that has seen no input.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: [0; 4],
            pending_len: 0,
            failed: false,
        }
    }

    /// `true` once any chunk has failed validation.
    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.failed
    }

    /// Validates the next chunk.
    ///
    /// Returns `false` if the stream so far is ill-formed, or if
    /// `is_final_chunk` is set and the stream ends inside a sequence. Once
    /// `false` is returned every later call also returns `false`.
    pub fn try_consume(&mut self, chunk: &[u8], is_final_chunk: bool) -> bool {
        if self.failed {
            return false;
        }
        let ok = self.consume(chunk, is_final_chunk);
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            self.pending_len < 4,
            "Internal error: a complete sequence was held back"
        );
        if !ok {
            trace!("UTF-8 validator failed");
            self.failed = true;
        }
        ok
    }

    fn consume(&mut self, chunk: &[u8], is_final_chunk: bool) -> bool {
        let mut chunk = chunk;

        if self.pending_len > 0 {
            let mut joined = [0u8; 4];
            let take = chunk.len().min(4 - self.pending_len);
            joined[..self.pending_len].copy_from_slice(&self.pending[..self.pending_len]);
            joined[self.pending_len..self.pending_len + take].copy_from_slice(&chunk[..take]);
            match peek_first_scalar(&joined[..self.pending_len + take]) {
                Utf8Peek::WellFormed { len, .. } => {
                    chunk = &chunk[len - self.pending_len..];
                    self.pending_len = 0;
                }
                Utf8Peek::Incomplete { len } if !is_final_chunk => {
                    // The whole chunk was swallowed by the pending sequence.
                    self.pending[..len].copy_from_slice(&joined[..len]);
                    self.pending_len = len;
                    return true;
                }
                Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. } => return false,
            }
        }

        // Hold back a trailing prefix for the next chunk.
        let body = match peek_last_scalar(chunk) {
            Utf8Peek::Incomplete { len } if len > 0 => {
                if is_final_chunk {
                    return false;
                }
                let (body, tail) = chunk.split_at(chunk.len() - len);
                self.pending[..len].copy_from_slice(tail);
                self.pending_len = len;
                body
            }
            _ => chunk,
        };
        inspect(body).first_invalid.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utf8::is_well_formed;

    fn feed(chunks: &[&[u8]]) -> bool {
        let mut validator = Utf8StreamingValidator::new();
        let mut ok = true;
        for (i, chunk) in chunks.iter().enumerate() {
            ok = validator.try_consume(chunk, i + 1 == chunks.len());
        }
        ok
    }

    const STREAMS: &[(&[&[u8]], bool)] = &[
        (&[b"plain ascii"], true),
        (&[b"\xF0", b"\x9F", b"\x98", b"\x80"], true),
        (&[b"\xF0\x9F", b"", b"\x98\x80tail"], true),
        (&[b"\xE2\x82", b"\xACx\xC3", b"\xA9"], true),
        (&[b"\xE2\x82", b"x"], false),
        (&[b"ok\xF0\x9F"], false),
        (&[b"ok", b"\xFF", b"ok"], false),
        (&[b"\xED", b"\xA0\x80"], false),
        (&[b"\xC3", b""], false),
        (&[b"", b""], true),
    ];

    #[test]
    fn chunked_streams_agree_with_whole_buffer() {
        for &(chunks, expected) in STREAMS {
            assert_eq!(feed(chunks), expected, "{chunks:?}");
            let joined: alloc::vec::Vec<u8> = chunks.concat();
            assert_eq!(is_well_formed(&joined), expected, "{chunks:?}");
        }
    }

    #[test]
    fn failure_is_sticky() {
        let mut validator = Utf8StreamingValidator::new();
        assert!(!validator.try_consume(b"\xC0", false));
        assert!(validator.has_failed());
        assert!(!validator.try_consume(b"fine", true));
    }

    #[test]
    fn invalid_data_in_body_fails_before_final() {
        let mut validator = Utf8StreamingValidator::new();
        assert!(!validator.try_consume(b"a\xFFb", false));
    }
}
