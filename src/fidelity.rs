//! Reconstruction fidelity of the overlap-add pipeline.

use crate::num::Sample;

/// Summary of an input/output comparison over the aligned region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FidelityReport {
    /// Number of compared samples.
    pub aligned_len: usize,
    /// Sum of squared reconstructed samples.
    pub signal_energy: f64,
    /// Sum of squared differences.
    pub error_energy: f64,
    /// Largest absolute difference.
    pub peak_error: f64,
    /// `10 log10(signal_energy / error_energy)`, `+inf` for a perfect match.
    pub snr_db: f64,
}

impl FidelityReport {
    pub fn is_exact(&self) -> bool {
        self.error_energy == 0.0
    }
}

/// Compare `input` against the reconstructed `output`.
///
/// The first `frame_size - hop_size` output samples are skipped to undo the
/// pipeline latency, and the last `frame_size` samples are dropped to exclude
/// the edge transient (only when the output is longer than
/// `frame_size + latency`). Input is aligned from its first sample.
pub fn evaluate<V: Sample>(
    input: &[V],
    output: &[V],
    frame_size: usize,
    hop_size: usize,
) -> FidelityReport {
    let lag = frame_size.saturating_sub(hop_size);
    let aligned = if output.len() > frame_size + lag {
        &output[lag..output.len() - frame_size]
    } else {
        output.get(lag..).unwrap_or(&[])
    };
    let aligned_len = aligned.len().min(input.len());

    let mut signal_energy = 0.0;
    let mut error_energy = 0.0;
    let mut peak_error = 0.0f64;
    for (&x, &y) in input.iter().zip(aligned) {
        let y = y.to_f64();
        let d = x.to_f64() - y;
        signal_energy += y * y;
        error_energy += d * d;
        peak_error = peak_error.max(d.abs());
    }

    let snr_db = if error_energy > 0.0 {
        10.0 * libm::log10(signal_energy / error_energy)
    } else {
        f64::INFINITY
    };

    FidelityReport {
        aligned_len,
        signal_energy,
        error_energy,
        peak_error,
        snr_db,
    }
}

/// Reconstruction SNR in dB; see [`evaluate`].
pub fn snr_db<V: Sample>(input: &[V], output: &[V], frame_size: usize, hop_size: usize) -> f64 {
    evaluate(input, output, frame_size, hop_size).snr_db
}
