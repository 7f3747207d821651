//! Run configuration of the golden-vector model.

use crate::error::{OlaError, OlaResult};
use crate::fixed::validate_width;
use crate::stimulus::StimulusMode;
use crate::window::WindowKind;

/// Parameters of one golden run.
#[derive(Debug, Clone, PartialEq)]
pub struct OlaConfig {
    /// Bits per sample and per window coefficient (default: 16).
    pub value_width: u32,
    /// New samples consumed and emitted per hop (default: 16).
    pub hop_size: usize,
    /// Window and buffer length (default: 64).
    pub frame_size: usize,
    /// Test signal shape (default: random).
    pub stimulus_mode: StimulusMode,
    /// Analysis window shape (default: hann).
    pub window_kind: WindowKind,
    /// Periodic (DFT-even) cosine windows instead of symmetric ones
    /// (default: true).
    pub periodic: bool,
    /// Stimulus length in samples (default: 10000).
    pub sample_count: usize,
    /// Seed of the pseudo-random stimulus (default: 0).
    pub seed: u64,
    /// Write the quantized stimulus.
    pub emit_inputs: bool,
    /// Write the window ROM tables.
    pub emit_windows: bool,
    /// Write the analysis and synthesis traces.
    pub emit_outputs: bool,
}

impl Default for OlaConfig {
    fn default() -> Self {
        Self {
            value_width: 16,
            hop_size: 16,
            frame_size: 64,
            stimulus_mode: StimulusMode::Random,
            window_kind: WindowKind::Hann,
            periodic: true,
            sample_count: 10_000,
            seed: 0,
            emit_inputs: true,
            emit_windows: true,
            emit_outputs: true,
        }
    }
}

impl OlaConfig {
    /// Check every parameter before any generation happens.
    pub fn validate(&self) -> OlaResult<()> {
        validate_width(self.value_width)?;
        if self.hop_size == 0 {
            return Err(OlaError::config("hop_size", "must be at least 1"));
        }
        if self.frame_size < self.hop_size {
            return Err(OlaError::config(
                "frame_size",
                format!(
                    "must be >= hop_size ({} < {})",
                    self.frame_size, self.hop_size
                ),
            ));
        }
        if self.sample_count == 0 {
            return Err(OlaError::config("sample_count", "must be at least 1"));
        }
        if let StimulusMode::Sine { period } = self.stimulus_mode {
            if !period.is_finite() || period <= 0.0 {
                return Err(OlaError::config(
                    "stimulus_mode",
                    format!("sine period must be finite and positive, got {period}"),
                ));
            }
        }
        Ok(())
    }

    /// Output delay of the pipeline in samples.
    pub fn latency(&self) -> usize {
        self.frame_size.saturating_sub(self.hop_size)
    }

    /// Number of hops needed to consume the whole stimulus.
    pub fn hop_count(&self) -> usize {
        self.sample_count.div_ceil(self.hop_size.max(1))
    }
}
