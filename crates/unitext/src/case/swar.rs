//! Word-at-a-time kernel: lanes packed into a `u64`.
//!
//! A lane `x` below `0x80` is a letter iff `x + (0x80 - base)` has its high
//! lane bit set and `x + (0x80 - base - 26)` does not; neither sum can carry
//! into the next lane.

use super::{AsciiUnit, alpha_base, scalar};

pub(crate) trait Lanes: AsciiUnit {
    const LANES: usize;
    /// `1` in every lane.
    const ONES: u64;

    fn load(chunk: &[Self]) -> u64;
    fn store(word: u64, chunk: &mut [Self]);
    /// Non-zero iff some lane is at or above `FIRST_NON_ASCII`.
    fn non_ascii(word: u64) -> u64;
}

impl Lanes for u8 {
    const LANES: usize = 8;
    const ONES: u64 = 0x0101_0101_0101_0101;

    #[inline]
    fn load(chunk: &[u8]) -> u64 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(chunk);
        u64::from_le_bytes(bytes)
    }

    #[inline]
    fn store(word: u64, chunk: &mut [u8]) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }

    #[inline]
    fn non_ascii(word: u64) -> u64 {
        // 0x7F + 1 reaches the high bit; masking first keeps lanes apart.
        (word | ((word & (Self::ONES * 0x7F)) + Self::ONES)) & (Self::ONES * 0x80)
    }
}

impl Lanes for u16 {
    const LANES: usize = 4;
    const ONES: u64 = 0x0001_0001_0001_0001;

    #[inline]
    fn load(chunk: &[u16]) -> u64 {
        chunk
            .iter()
            .rev()
            .fold(0, |word, &unit| (word << 16) | u64::from(unit))
    }

    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    fn store(word: u64, chunk: &mut [u16]) {
        for (i, unit) in chunk.iter_mut().enumerate() {
            *unit = (word >> (16 * i)) as u16;
        }
    }

    #[inline]
    fn non_ascii(word: u64) -> u64 {
        word & (Self::ONES * 0xFF80)
    }
}

#[inline]
fn flip_word<T: Lanes>(word: u64, base: u64) -> u64 {
    let from_base = word + T::ONES * (0x80 - base);
    let past_end = word + T::ONES * (0x80 - base - 26);
    let letters = (from_base ^ past_end) & (T::ONES * 0x80);
    word ^ (letters >> 2)
}

#[inline]
pub(crate) fn change_case<T: Lanes>(input: &[T], output: &mut [T], to_upper: bool) -> usize {
    let base = u64::from(alpha_base(to_upper));
    let len = input.len().min(output.len());
    let (input, output) = (&input[..len], &mut output[..len]);

    let mut done = 0;
    for (src, dst) in input
        .chunks_exact(T::LANES)
        .zip(output.chunks_exact_mut(T::LANES))
    {
        let word = T::load(src);
        if T::non_ascii(word) != 0 {
            break;
        }
        T::store(flip_word::<T>(word, base), dst);
        done += T::LANES;
    }
    done + scalar::change_case(&input[done..], &mut output[done..], to_upper)
}
