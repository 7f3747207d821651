//! Fixed-point rounding unit and the datapaths built on top of it.
//!
//! The hardware multiplies a W-bit signed sample by a W-bit signed window
//! coefficient and keeps W bits of the product. The kept word is selected by
//! discarding the low `W - 2` bits, then halving once more with the parity of
//! the remaining value deciding the direction: odd rounds up, even rounds
//! down. Shifts on signed integers are arithmetic, which makes every division
//! here a floor division, negative products included.

use crate::error::{OlaError, OlaResult};
use crate::num::Sample;

/// Narrowest word the rounding rule is defined for (`W - 2 >= 0`).
pub const MIN_VALUE_WIDTH: u32 = 2;
/// Widest word whose products still fit the `i64` sample type.
pub const MAX_VALUE_WIDTH: u32 = 32;

/// Requantize a `2W`-bit product `value` to a `W`-bit result.
///
/// Computes `t = floor(value / 2^(width-2))`, then `ceil(t / 2)` for odd `t`
/// and `floor(t / 2)` for even `t`.
///
/// # Panics
/// Panics in debug builds if `width` is below [`MIN_VALUE_WIDTH`] or above
/// 64. Validated configurations never reach either case.
#[inline(always)]
pub fn fixed_point_round(value: i64, width: u32) -> i64 {
    debug_assert!((MIN_VALUE_WIDTH..=64).contains(&width));
    round_wide(value as i128, width) as i64
}

#[inline(always)]
fn round_wide(value: i128, width: u32) -> i128 {
    let t = value >> (width - 2);
    if t & 1 == 1 {
        (t + 1) >> 1
    } else {
        t >> 1
    }
}

/// Check that `width` is a supported sample word length.
pub fn validate_width(width: u32) -> OlaResult<()> {
    if !(MIN_VALUE_WIDTH..=MAX_VALUE_WIDTH).contains(&width) {
        return Err(OlaError::config(
            "value_width",
            format!("must be in {MIN_VALUE_WIDTH}..={MAX_VALUE_WIDTH}, got {width}"),
        ));
    }
    Ok(())
}

/// Arithmetic used for the window multiplications of the pipeline.
pub trait Datapath {
    /// Buffer and output value type.
    type Value: Sample;
    /// Window coefficient type.
    type Coeff: Copy + core::fmt::Debug;

    /// Multiply a buffer value by a window coefficient and bring the product
    /// back to the value domain.
    fn mul_requantize(&self, value: Self::Value, coeff: Self::Coeff) -> Self::Value;
}

/// W-bit integer datapath matching the hardware multiply/round stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    width: u32,
}

impl FixedPoint {
    pub fn new(width: u32) -> OlaResult<Self> {
        validate_width(width)?;
        Ok(Self { width })
    }

    pub fn width(&self) -> u32 {
        self.width
    }
}

impl Datapath for FixedPoint {
    type Value = i64;
    type Coeff = i64;

    #[inline(always)]
    fn mul_requantize(&self, value: i64, coeff: i64) -> i64 {
        let rounded = round_wide(value as i128 * coeff as i128, self.width);
        rounded.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

/// Unrounded floating arithmetic with floating window coefficients.
///
/// Serves as the reference against which the quantization noise of
/// [`FixedPoint`] is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ideal;

impl Datapath for Ideal {
    type Value = f64;
    type Coeff = f64;

    #[inline(always)]
    fn mul_requantize(&self, value: f64, coeff: f64) -> f64 {
        value * coeff
    }
}
