//! Streaming Marvin32.
//!
//! Marvin32 mixes little-endian 32-bit blocks into two 32-bit lanes seeded
//! from a 64-bit key. [`StreamingMarvin`] buffers up to three bytes between
//! [`consume`](StreamingMarvin::consume) calls, so the result depends only on
//! the concatenated input and never on how it was split.

use core::hash::{BuildHasher, Hasher};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 0x004F_B61A_001B_DBCC;

/// Incremental Marvin32 accumulator.
///
/// A plain value: copying it forks the hash state. It is `Send + Sync`, but
/// mutating one instance from several threads needs outside synchronization.
///
/// # Examples
///
/// ```rust
/// use unitext::StreamingMarvin;
///
/// let mut split = StreamingMarvin::default_seed();
/// split.consume(b"hel");
/// split.consume(b"lo");
///
/// let mut whole = StreamingMarvin::default_seed();
/// whole.consume(b"hello");
///
/// assert_eq!(split.finish(), whole.finish());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamingMarvin {
    p0: u32,
    p1: u32,
    tail: [u8; 3],
    tail_len: usize,
}

impl StreamingMarvin {
    /// Starts a hash keyed by `seed`.
    #[must_use]
    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn new(seed: u64) -> Self {
        Self {
            p0: seed as u32,
            p1: (seed >> 32) as u32,
            tail: [0; 3],
            tail_len: 0,
        }
    }

    /// Starts a hash keyed by [`DEFAULT_SEED`].
    #[must_use]
    #[inline]
    pub const fn default_seed() -> Self {
        Self::new(DEFAULT_SEED)
    }

    #[inline]
    fn block(&mut self) {
        self.p1 ^= self.p0;
        self.p0 = self.p0.rotate_left(20);
        self.p0 = self.p0.wrapping_add(self.p1);
        self.p1 = self.p1.rotate_left(9);
        self.p1 ^= self.p0;
        self.p0 = self.p0.rotate_left(27);
        self.p0 = self.p0.wrapping_add(self.p1);
        self.p1 = self.p1.rotate_left(19);
    }

    #[inline]
    fn mix(&mut self, word: [u8; 4]) {
        self.p0 = self.p0.wrapping_add(u32::from_le_bytes(word));
        self.block();
    }

    /// Feeds `bytes` into the hash.
    pub fn consume(&mut self, bytes: &[u8]) {
        let mut data = bytes;
        if self.tail_len > 0 {
            let need = 4 - self.tail_len;
            if data.len() < need {
                self.tail[self.tail_len..self.tail_len + data.len()].copy_from_slice(data);
                self.tail_len += data.len();
                return;
            }
            let mut word = [0u8; 4];
            word[..self.tail_len].copy_from_slice(&self.tail[..self.tail_len]);
            word[self.tail_len..].copy_from_slice(&data[..need]);
            self.mix(word);
            data = &data[need..];
            self.tail_len = 0;
        }

        let mut words = data.chunks_exact(4);
        for word in &mut words {
            self.mix([word[0], word[1], word[2], word[3]]);
        }
        let rest = words.remainder();
        self.tail[..rest.len()].copy_from_slice(rest);
        self.tail_len = rest.len();
    }

    fn finalize(mut self) -> (u32, u32) {
        let mut last = 0x80u32 << (8 * self.tail_len);
        for (i, &b) in self.tail[..self.tail_len].iter().enumerate() {
            last |= u32::from(b) << (8 * i);
        }
        self.p0 = self.p0.wrapping_add(last);
        self.block();
        self.block();
        (self.p0, self.p1)
    }

    /// Finishes the hash and folds it to 32 bits.
    #[must_use]
    #[inline]
    #[expect(clippy::cast_possible_wrap)]
    pub fn finish(self) -> i32 {
        let (p0, p1) = self.finalize();
        (p0 ^ p1) as i32
    }

    /// Finishes the hash and returns the full 64-bit state.
    #[must_use]
    #[inline]
    pub fn finish_u64(self) -> u64 {
        let (p0, p1) = self.finalize();
        (u64::from(p1) << 32) | u64::from(p0)
    }
}

impl Default for StreamingMarvin {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl Hasher for StreamingMarvin {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.consume(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.finish_u64()
    }
}

/// [`BuildHasher`] producing [`StreamingMarvin`] hashers with a fixed seed.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
///
/// use unitext::MarvinBuildHasher;
///
/// let mut map = HashMap::with_hasher(MarvinBuildHasher::new(7));
/// map.insert("key", 1);
/// assert_eq!(map["key"], 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarvinBuildHasher {
    seed: u64,
}

impl MarvinBuildHasher {
    /// Hashers built from this will be keyed by `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for MarvinBuildHasher {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl BuildHasher for MarvinBuildHasher {
    type Hasher = StreamingMarvin;

    #[inline]
    fn build_hasher(&self) -> StreamingMarvin {
        StreamingMarvin::new(self.seed)
    }
}
