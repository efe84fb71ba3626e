//! Reference kernel: one element per step.

use super::{AsciiUnit, alpha_base};

#[inline]
pub(crate) fn change_case<T: AsciiUnit>(input: &[T], output: &mut [T], to_upper: bool) -> usize {
    let base = u32::from(alpha_base(to_upper));
    let len = input.len().min(output.len());
    for (i, (src, dst)) in input[..len].iter().zip(&mut output[..len]).enumerate() {
        let unit: u32 = (*src).into();
        if unit >= T::FIRST_NON_ASCII {
            return i;
        }
        let flip = u32::from(unit.wrapping_sub(base) <= 25) << 5;
        *dst = T::from_u32(unit ^ flip);
    }
    len
}
