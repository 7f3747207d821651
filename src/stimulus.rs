//! Quantized test signal generation.

use core::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::num::{max_signed, min_signed, round_ties_even};

/// Default sinusoid period in samples.
pub const DEFAULT_SINE_PERIOD: f64 = 1000.0;

/// Shape of the floating test signal before quantization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StimulusMode {
    /// Uniform noise on `[-1, 1)` from a seeded generator.
    #[default]
    Random,
    /// `sin(2 pi n / period)`.
    Sine { period: f64 },
}

impl StimulusMode {
    pub fn sine() -> Self {
        StimulusMode::Sine {
            period: DEFAULT_SINE_PERIOD,
        }
    }
}

/// Generate `count` floating samples in `[-1, 1]`.
pub fn generate_float(count: usize, mode: StimulusMode, seed: u64) -> Vec<f64> {
    match mode {
        StimulusMode::Random => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..count)
                .map(|_| 2.0 * (rng.gen::<f64>() - 0.5))
                .collect()
        }
        StimulusMode::Sine { period } => (0..count)
            .map(|n| libm::sin(2.0 * PI / period * n as f64))
            .collect(),
    }
}

/// Scale a floating sample by `2^(width-1)`, round and clamp to `width` bits.
#[inline]
pub fn quantize_sample(x: f64, width: u32) -> i64 {
    let scale = (1i64 << (width - 1)) as f64;
    let q = round_ties_even(x * scale) as i64;
    q.clamp(min_signed(width), max_signed(width))
}

/// Generate the quantized integer stimulus.
///
/// Pure: the same `(count, mode, width, seed)` always yields the same vector.
pub fn generate(count: usize, mode: StimulusMode, width: u32, seed: u64) -> Vec<i64> {
    let samples: Vec<i64> = generate_float(count, mode, seed)
        .into_iter()
        .map(|x| quantize_sample(x, width))
        .collect();
    log::debug!("generated {count} stimulus samples ({mode:?}, seed={seed}, width={width})");
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_full_scale_clamps() {
        assert_eq!(quantize_sample(1.0, 16), 32767);
        assert_eq!(quantize_sample(-1.0, 16), -32768);
        assert_eq!(quantize_sample(0.0, 16), 0);
    }

    #[test]
    fn same_seed_same_signal() {
        let a = generate(256, StimulusMode::Random, 16, 7);
        let b = generate(256, StimulusMode::Random, 16, 7);
        let c = generate(256, StimulusMode::Random, 16, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sine_starts_at_zero_and_peaks_at_quarter_period() {
        let x = generate(1001, StimulusMode::sine(), 16, 0);
        assert_eq!(x[0], 0);
        assert_eq!(x[250], 32767);
        assert_eq!(x[750], -32768);
    }

    #[test]
    fn random_signal_is_not_constant() {
        let x = generate(64, StimulusMode::Random, 12, 1);
        assert!(x.iter().any(|&v| v != x[0]));
    }
}
