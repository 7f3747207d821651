//! Minimal sample trait shared by the integer and floating datapaths.

use core::fmt::Debug;
use core::ops::Add;

/// A value that can travel through the overlap-add buffers.
///
/// Implemented for `i64` (hardware samples and wide products) and `f64`
/// (unrounded reference arithmetic).
pub trait Sample:
    Copy + Clone + PartialEq + Debug + Default + Add<Output = Self> + 'static
{
    fn zero() -> Self;
    /// Lossy conversion used by the fidelity metrics.
    fn to_f64(self) -> f64;
}

impl Sample for i64 {
    #[inline(always)]
    fn zero() -> Self {
        0
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Sample for f64 {
    #[inline(always)]
    fn zero() -> Self {
        0.0
    }
    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }
}

/// Smallest value representable by a `width`-bit two's complement word.
#[inline(always)]
pub fn min_signed(width: u32) -> i64 {
    -(1i64 << (width - 1))
}

/// Largest value representable by a `width`-bit two's complement word.
#[inline(always)]
pub fn max_signed(width: u32) -> i64 {
    (1i64 << (width - 1)) - 1
}

/// Round half to even, the convention of the reference numerics.
#[inline(always)]
pub fn round_ties_even(x: f64) -> f64 {
    libm::rint(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_bounds() {
        assert_eq!(min_signed(16), -32768);
        assert_eq!(max_signed(16), 32767);
        assert_eq!(min_signed(2), -2);
        assert_eq!(max_signed(2), 1);
        assert_eq!(max_signed(32), i32::MAX as i64);
    }

    #[test]
    fn ties_go_to_even() {
        assert_eq!(round_ties_even(0.5), 0.0);
        assert_eq!(round_ties_even(1.5), 2.0);
        assert_eq!(round_ties_even(2.5), 2.0);
        assert_eq!(round_ties_even(-0.5), 0.0);
        assert_eq!(round_ties_even(-1.5), -2.0);
        assert_eq!(round_ties_even(2.4999), 2.0);
    }
}
