//! Hop-by-hop overlap-add analysis/synthesis pipeline.
//!
//! The pipeline mirrors the hardware dataflow: every hop shifts `hop_size`
//! new samples into the analysis buffer, windows and requantizes the whole
//! buffer, windows and requantizes the result again with the synthesis
//! window, adds it into the overlap accumulator and emits the first
//! `hop_size` accumulated values. Output therefore lags input by
//! `frame_size - hop_size` samples.

use crate::error::{OlaError, OlaResult};
use crate::fixed::{Datapath, FixedPoint, Ideal};
use crate::num::Sample;
use crate::window::{RomTables, WindowPair};

/// Values produced by a single hop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HopOutput<'a, V> {
    /// Output sample index of `synthesis[0]`.
    pub position: usize,
    /// Rounded analysis frame, `frame_size` values.
    pub analysis: &'a [V],
    /// Reconstructed output of this hop, `hop_size` values.
    pub synthesis: &'a [V],
}

/// Everything a full run of the pipeline produces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineTrace<V> {
    /// `frame_size` values per hop, in hop order.
    pub analysis: Vec<V>,
    /// `hop_size` values per hop, in hop order.
    pub synthesis: Vec<V>,
    /// Synthesis output placed at its output positions, truncated to the
    /// input length.
    pub reconstructed: Vec<V>,
}

/// Stateful overlap-add processor owning its buffers and hop cursor.
///
/// # Example
/// ```
/// use ola_golden::pipeline::OlaPipeline;
/// use ola_golden::window::{WindowKind, WindowPair};
///
/// let rom = WindowPair::design(WindowKind::Rectangular, 4, 4, true)
///     .unwrap()
///     .quantize(16);
/// let mut ola = OlaPipeline::fixed_point(16, &rom, 4).unwrap();
/// let trace = ola.run(&[100, -200, 300, -400, 500]);
/// assert_eq!(trace.reconstructed, vec![100, -200, 300, -400, 500]);
/// ```
#[derive(Debug, Clone)]
pub struct OlaPipeline<D: Datapath> {
    datapath: D,
    frame_size: usize,
    hop_size: usize,
    analysis_window: Vec<D::Coeff>,
    synthesis_window: Vec<D::Coeff>,
    analysis_buffer: Vec<D::Value>,
    accumulator: Vec<D::Value>,
    analysis_frame: Vec<D::Value>,
    hop_out: Vec<D::Value>,
    cursor: usize,
    hops: usize,
}

impl<D: Datapath> OlaPipeline<D> {
    /// Build a pipeline; `frame_size` is the analysis window length.
    ///
    /// Fails with a configuration error if `hop_size` is zero, exceeds the
    /// frame size, or the two windows differ in length.
    pub fn new(
        datapath: D,
        analysis_window: Vec<D::Coeff>,
        synthesis_window: Vec<D::Coeff>,
        hop_size: usize,
    ) -> OlaResult<Self> {
        let frame_size = analysis_window.len();
        if hop_size == 0 {
            return Err(OlaError::config("hop_size", "must be at least 1"));
        }
        if frame_size < hop_size {
            return Err(OlaError::config(
                "frame_size",
                format!("must be >= hop_size ({frame_size} < {hop_size})"),
            ));
        }
        if synthesis_window.len() != frame_size {
            return Err(OlaError::config(
                "frame_size",
                format!(
                    "synthesis window has {} coefficients, analysis window has {frame_size}",
                    synthesis_window.len()
                ),
            ));
        }
        Ok(Self {
            datapath,
            frame_size,
            hop_size,
            analysis_window,
            synthesis_window,
            analysis_buffer: vec![D::Value::zero(); frame_size],
            accumulator: vec![D::Value::zero(); frame_size],
            analysis_frame: vec![D::Value::zero(); frame_size],
            hop_out: vec![D::Value::zero(); hop_size],
            cursor: 0,
            hops: 0,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Output delay in samples caused by the buffer fill-up.
    pub fn latency(&self) -> usize {
        self.frame_size - self.hop_size
    }

    /// Input index of the next hop.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn hops_processed(&self) -> usize {
        self.hops
    }

    /// Most recent `frame_size` raw input samples.
    pub fn analysis_buffer(&self) -> &[D::Value] {
        &self.analysis_buffer
    }

    /// Overlap sum of the synthesis frames not yet fully emitted.
    pub fn accumulator(&self) -> &[D::Value] {
        &self.accumulator
    }

    /// Clear both buffers and rewind the cursor.
    pub fn reset(&mut self) {
        self.analysis_buffer.fill(D::Value::zero());
        self.accumulator.fill(D::Value::zero());
        self.analysis_frame.fill(D::Value::zero());
        self.hop_out.fill(D::Value::zero());
        self.cursor = 0;
        self.hops = 0;
    }

    /// Advance the pipeline by one hop.
    ///
    /// `samples` holds at most `hop_size` new input values; a shorter slice
    /// is zero-padded.
    pub fn push_hop(&mut self, samples: &[D::Value]) -> OlaResult<HopOutput<'_, D::Value>> {
        if samples.len() > self.hop_size {
            return Err(OlaError::LengthMismatch {
                channel: "hop",
                expected: self.hop_size,
                actual: samples.len(),
            });
        }
        Ok(self.advance(samples))
    }

    fn advance(&mut self, samples: &[D::Value]) -> HopOutput<'_, D::Value> {
        let hop = self.hop_size;
        let tail = self.frame_size - hop;
        self.analysis_buffer.copy_within(hop.., 0);
        self.analysis_buffer[tail..tail + samples.len()].copy_from_slice(samples);
        self.analysis_buffer[tail + samples.len()..].fill(D::Value::zero());

        let dp = &self.datapath;
        for ((out, &x), &w) in self
            .analysis_frame
            .iter_mut()
            .zip(&self.analysis_buffer)
            .zip(&self.analysis_window)
        {
            *out = dp.mul_requantize(x, w);
        }

        for ((acc, &a), &w) in self
            .accumulator
            .iter_mut()
            .zip(&self.analysis_frame)
            .zip(&self.synthesis_window)
        {
            *acc = *acc + dp.mul_requantize(a, w);
        }

        self.hop_out.copy_from_slice(&self.accumulator[..hop]);
        self.accumulator.copy_within(hop.., 0);
        self.accumulator[tail..].fill(D::Value::zero());

        let position = self.cursor;
        self.cursor += hop;
        self.hops += 1;

        #[cfg(feature = "hop-trace")]
        log::trace!("hop {} at {position}: out={:?}", self.hops - 1, self.hop_out);

        HopOutput {
            position,
            analysis: &self.analysis_frame,
            synthesis: &self.hop_out,
        }
    }

    /// Reset the pipeline and process `input` hop by hop until every sample
    /// has been consumed, zero-padding the final hop.
    pub fn run(&mut self, input: &[D::Value]) -> PipelineTrace<D::Value> {
        self.reset();
        let len = input.len();
        let hops = len.div_ceil(self.hop_size);
        let mut trace = PipelineTrace {
            analysis: Vec::with_capacity(hops * self.frame_size),
            synthesis: Vec::with_capacity(hops * self.hop_size),
            reconstructed: vec![D::Value::zero(); len],
        };
        while self.cursor < len {
            let start = self.cursor;
            let end = (start + self.hop_size).min(len);
            let hop = self.advance(&input[start..end]);
            trace.analysis.extend_from_slice(hop.analysis);
            trace.synthesis.extend_from_slice(hop.synthesis);
            let keep = hop.synthesis.len().min(len - hop.position);
            trace.reconstructed[hop.position..hop.position + keep]
                .copy_from_slice(&hop.synthesis[..keep]);
        }
        log::debug!(
            "processed {} hops ({} samples, frame_size={}, hop_size={})",
            self.hops,
            len,
            self.frame_size,
            self.hop_size
        );
        trace
    }
}

impl OlaPipeline<FixedPoint> {
    /// Integer pipeline fed by quantized ROM tables.
    pub fn fixed_point(width: u32, rom: &RomTables, hop_size: usize) -> OlaResult<Self> {
        Self::new(
            FixedPoint::new(width)?,
            rom.analysis.clone(),
            rom.synthesis.clone(),
            hop_size,
        )
    }
}

impl OlaPipeline<Ideal> {
    /// Unrounded floating pipeline fed by the design-time windows.
    pub fn ideal(windows: &WindowPair, hop_size: usize) -> OlaResult<Self> {
        Self::new(
            Ideal,
            windows.analysis.clone(),
            windows.synthesis.clone(),
            hop_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowKind;

    fn unit_pipeline(frame: usize, hop: usize) -> OlaPipeline<FixedPoint> {
        // zero windows: only the buffer bookkeeping matters here
        OlaPipeline::new(FixedPoint::new(16).unwrap(), vec![0; frame], vec![0; frame], hop)
            .unwrap()
    }

    #[test]
    fn rejects_hop_larger_than_frame() {
        let err = OlaPipeline::new(Ideal, vec![1.0; 4], vec![1.0; 4], 5).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("frame_size"));
    }

    #[test]
    fn rejects_zero_hop() {
        let err = OlaPipeline::new(Ideal, vec![1.0; 4], vec![1.0; 4], 0).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn rejects_mismatched_window_lengths() {
        let err = OlaPipeline::new(Ideal, vec![1.0; 4], vec![1.0; 3], 2).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn oversized_hop_slice_is_rejected() {
        let mut ola = unit_pipeline(4, 2);
        assert!(matches!(
            ola.push_hop(&[1, 2, 3]),
            Err(OlaError::LengthMismatch { expected: 2, actual: 3, .. })
        ));
    }

    #[test]
    fn short_hop_is_zero_padded() {
        let mut ola = unit_pipeline(4, 2);
        ola.push_hop(&[1, 2]).unwrap();
        ola.push_hop(&[3]).unwrap();
        assert_eq!(ola.analysis_buffer(), &[1, 2, 3, 0]);
        assert_eq!(ola.cursor(), 4);
        assert_eq!(ola.hops_processed(), 2);
    }

    #[test]
    fn ideal_rectangular_reconstructs_delayed_input() {
        let windows = WindowPair::design(WindowKind::Rectangular, 8, 2, true).unwrap();
        let mut ola = OlaPipeline::ideal(&windows, 2).unwrap();
        let input: Vec<f64> = (0..32).map(|n| n as f64 - 10.0).collect();
        let trace = ola.run(&input);
        let lag = ola.latency();
        for n in 0..input.len() - lag {
            assert!((trace.reconstructed[n + lag] - input[n]).abs() < 1e-9);
        }
    }

    #[test]
    fn accumulator_is_cleared_behind_emitted_samples() {
        let windows = WindowPair::design(WindowKind::Rectangular, 6, 2, true).unwrap();
        let mut ola = OlaPipeline::ideal(&windows, 2).unwrap();
        ola.push_hop(&[3.0, 3.0]).unwrap();
        let acc = ola.accumulator();
        assert_eq!(&acc[4..], &[0.0, 0.0]);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut ola = unit_pipeline(4, 2);
        ola.push_hop(&[5, 6]).unwrap();
        ola.reset();
        assert_eq!(ola.analysis_buffer(), &[0, 0, 0, 0]);
        assert_eq!(ola.accumulator(), &[0, 0, 0, 0]);
        assert_eq!(ola.cursor(), 0);
        assert_eq!(ola.hops_processed(), 0);
    }

    #[test]
    fn run_emits_one_frame_per_hop() {
        let rom = WindowPair::design(WindowKind::Hann, 8, 3, true)
            .unwrap()
            .quantize(16);
        let mut ola = OlaPipeline::fixed_point(16, &rom, 3).unwrap();
        let trace = ola.run(&[1000; 10]);
        // ceil(10 / 3) = 4 hops
        assert_eq!(ola.hops_processed(), 4);
        assert_eq!(trace.analysis.len(), 4 * 8);
        assert_eq!(trace.synthesis.len(), 4 * 3);
        assert_eq!(trace.reconstructed.len(), 10);
    }
}
