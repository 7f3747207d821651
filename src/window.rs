//! Analysis/synthesis window design and ROM quantization.

use core::f64::consts::PI;
use core::fmt;
use core::str::FromStr;

use libm::cos;

use crate::error::{OlaError, OlaResult};
use crate::num::{max_signed, min_signed, round_ties_even};

/// Window shapes supported by the hardware ROM generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowKind {
    #[default]
    Hann,
    Hamming,
    Rectangular,
}

impl WindowKind {
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = OlaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "rectangular" | "rectwin" | "rect" | "boxcar" => Ok(WindowKind::Rectangular),
            other => Err(OlaError::config(
                "window_kind",
                format!("unsupported window type `{other}`"),
            )),
        }
    }
}

/// Generalized two-term cosine window `a0 - a1 cos(2 pi n / M)`.
///
/// `M` is `len` for the periodic (DFT-even) form and `len - 1` for the
/// symmetric form.
fn cosine_window(len: usize, periodic: bool, a0: f64, a1: f64) -> Vec<f64> {
    if len == 0 {
        return Vec::new();
    }
    if len == 1 {
        return vec![1.0];
    }
    let m = (if periodic { len } else { len - 1 }) as f64;
    (0..len)
        .map(|n| a0 - a1 * cos(2.0 * PI * n as f64 / m))
        .collect()
}

/// Generate a Hann window of length `len`.
pub fn hann(len: usize, periodic: bool) -> Vec<f64> {
    cosine_window(len, periodic, 0.5, 0.5)
}

/// Generate a Hamming window of length `len`.
pub fn hamming(len: usize, periodic: bool) -> Vec<f64> {
    cosine_window(len, periodic, 0.54, 0.46)
}

/// Generate a rectangular (all ones) window of length `len`.
pub fn rectangular(len: usize) -> Vec<f64> {
    vec![1.0; len]
}

/// Generate the floating analysis window for `kind`.
///
/// The periodicity flag only affects the cosine windows.
pub fn design(kind: WindowKind, len: usize, periodic: bool) -> Vec<f64> {
    match kind {
        WindowKind::Hann => hann(len, periodic),
        WindowKind::Hamming => hamming(len, periodic),
        WindowKind::Rectangular => rectangular(len),
    }
}

/// Derive the synthesis window from `analysis` for a given `hop_size`.
///
/// `synthesis[i] = analysis[i] / (sum(analysis^2) / hop_size)`, the power
/// normalization that yields unity overlap-add gain for the analysis window
/// applied twice.
pub fn synthesis_window(analysis: &[f64], hop_size: usize) -> OlaResult<Vec<f64>> {
    if hop_size == 0 {
        return Err(OlaError::config("hop_size", "must be at least 1"));
    }
    let energy: f64 = analysis.iter().map(|a| a * a).sum();
    if energy == 0.0 {
        return Err(OlaError::config(
            "window_kind",
            "analysis window has zero energy",
        ));
    }
    let scale = energy / hop_size as f64;
    Ok(analysis.iter().map(|a| a / scale).collect())
}

/// Scale `window` by `2^(width-1) - 1` and round to the nearest integer.
///
/// Coefficients outside the signed `width`-bit range are returned unchanged
/// and reported through `log::warn!`, since the ROM contract is the exact
/// rounded value.
pub fn quantize(window: &[f64], width: u32) -> Vec<i64> {
    let scale = max_signed(width) as f64;
    let (lo, hi) = (min_signed(width), max_signed(width));
    let table: Vec<i64> = window
        .iter()
        .map(|w| round_ties_even(w * scale) as i64)
        .collect();
    let overflow = table.iter().filter(|&&c| c < lo || c > hi).count();
    if overflow > 0 {
        log::warn!(
            "{overflow} of {} window coefficients exceed the {width}-bit range [{lo}, {hi}]",
            table.len()
        );
    }
    table
}

/// Floating analysis and synthesis windows of one filterbank.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowPair {
    pub kind: WindowKind,
    pub analysis: Vec<f64>,
    pub synthesis: Vec<f64>,
}

impl WindowPair {
    /// Design the analysis window and derive its synthesis counterpart.
    pub fn design(
        kind: WindowKind,
        frame_size: usize,
        hop_size: usize,
        periodic: bool,
    ) -> OlaResult<Self> {
        let analysis = design(kind, frame_size, periodic);
        let synthesis = synthesis_window(&analysis, hop_size)?;
        log::debug!(
            "designed {kind} window pair: frame_size={frame_size}, hop_size={hop_size}, periodic={periodic}"
        );
        Ok(Self {
            kind,
            analysis,
            synthesis,
        })
    }

    /// Quantize both windows to `width`-bit ROM tables.
    pub fn quantize(&self, width: u32) -> RomTables {
        RomTables {
            analysis: quantize(&self.analysis, width),
            synthesis: quantize(&self.synthesis, width),
        }
    }
}

/// Quantized window coefficients, the hardware ROM initialization content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomTables {
    pub analysis: Vec<i64>,
    pub synthesis: Vec<i64>,
}
