//! 128-bit kernel for x86-64.
//!
//! SSE2 is part of the x86-64 baseline, so no runtime detection is needed
//! and the arithmetic intrinsics are safe to call. Only the unaligned load
//! and store take raw pointers.
//! Every register load and store goes through a `chunks_exact` slice of
//! exactly 16 bytes.

use core::arch::x86_64::{
    __m128i, _mm_and_si128, _mm_cmpeq_epi8, _mm_cmpeq_epi16, _mm_cmpgt_epi8, _mm_cmpgt_epi16,
    _mm_cmplt_epi8, _mm_cmplt_epi16, _mm_loadu_si128, _mm_movemask_epi8, _mm_or_si128,
    _mm_set1_epi8, _mm_set1_epi16, _mm_setzero_si128, _mm_storeu_si128, _mm_xor_si128,
};

use super::{alpha_base, scalar};

const BYTE_LANES: usize = 16;
const UNIT_LANES: usize = 8;

#[inline(always)]
fn load<T>(src: &[T]) -> __m128i {
    debug_assert_eq!(size_of_val(src), 16);
    // SAFETY: `src` is a 16-byte chunk; `loadu` has no alignment requirement.
    unsafe { _mm_loadu_si128(src.as_ptr().cast::<__m128i>()) }
}

#[inline(always)]
fn store<T>(dst: &mut [T], v: __m128i) {
    debug_assert_eq!(size_of_val(dst), 16);
    // SAFETY: `dst` is a 16-byte chunk; `storeu` has no alignment requirement.
    unsafe { _mm_storeu_si128(dst.as_mut_ptr().cast::<__m128i>(), v) }
}

#[expect(clippy::cast_possible_wrap)]
pub(crate) fn change_case_bytes(input: &[u8], output: &mut [u8], to_upper: bool) -> usize {
    let len = input.len().min(output.len());
    let (input, output) = (&input[..len], &mut output[..len]);
    let base = alpha_base(to_upper) as i8;

    let mut done = 0;
    // SAFETY: SSE2 is part of the x86-64 baseline.
    let (flip, below, above, del) = unsafe {
        (
            _mm_set1_epi8(0x20),
            _mm_set1_epi8(base - 1),
            _mm_set1_epi8(base + 26),
            _mm_set1_epi8(0x7F),
        )
    };
    for (src, dst) in input
        .chunks_exact(BYTE_LANES)
        .zip(output.chunks_exact_mut(BYTE_LANES))
    {
        let v = load(src);
        // High bit set for bytes >= 0x80, all ones for 0x7F.
        // SAFETY: SSE2 is part of the x86-64 baseline.
        let stop = unsafe { _mm_or_si128(v, _mm_cmpeq_epi8(v, del)) };
        // SAFETY: SSE2 is part of the x86-64 baseline.
        if unsafe { _mm_movemask_epi8(stop) } != 0 {
            break;
        }
        // SAFETY: SSE2 is part of the x86-64 baseline.
        let out = unsafe {
            let letters = _mm_and_si128(_mm_cmpgt_epi8(v, below), _mm_cmplt_epi8(v, above));
            _mm_xor_si128(v, _mm_and_si128(letters, flip))
        };
        store(dst, out);
        done += BYTE_LANES;
    }
    done + scalar::change_case(&input[done..], &mut output[done..], to_upper)
}

#[expect(clippy::cast_possible_wrap)]
pub(crate) fn change_case_units(input: &[u16], output: &mut [u16], to_upper: bool) -> usize {
    let len = input.len().min(output.len());
    let (input, output) = (&input[..len], &mut output[..len]);
    let base = i16::from(alpha_base(to_upper));

    let mut done = 0;
    // SAFETY: SSE2 is part of the x86-64 baseline.
    let (flip, below, above, high_bits, zero) = unsafe {
        (
            _mm_set1_epi16(0x20),
            _mm_set1_epi16(base - 1),
            _mm_set1_epi16(base + 26),
            _mm_set1_epi16(0xFF80u16 as i16),
            _mm_setzero_si128(),
        )
    };
    // Eight units are exactly one 16-byte register.
    for (src, dst) in input
        .chunks_exact(UNIT_LANES)
        .zip(output.chunks_exact_mut(UNIT_LANES))
    {
        let v = load(src);
        // SAFETY: SSE2 is part of the x86-64 baseline.
        let ascii = unsafe { _mm_cmpeq_epi16(_mm_and_si128(v, high_bits), zero) };
        // SAFETY: SSE2 is part of the x86-64 baseline.
        if unsafe { _mm_movemask_epi8(ascii) } != 0xFFFF {
            break;
        }
        // SAFETY: SSE2 is part of the x86-64 baseline.
        let out = unsafe {
            let letters = _mm_and_si128(_mm_cmpgt_epi16(v, below), _mm_cmplt_epi16(v, above));
            _mm_xor_si128(v, _mm_and_si128(letters, flip))
        };
        store(dst, out);
        done += UNIT_LANES;
    }
    done + scalar::change_case(&input[done..], &mut output[done..], to_upper)
}
