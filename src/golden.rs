//! End-to-end golden-vector generation and replay.

use std::path::Path;

use crate::config::OlaConfig;
use crate::error::{OlaError, OlaResult};
use crate::fidelity::{self, FidelityReport};
use crate::num::{max_signed, min_signed};
use crate::pipeline::OlaPipeline;
use crate::stimulus;
use crate::trace::{
    read_integers, ArtifactWriter, WrittenArtifact, ANALYSIS_OUTPUT_FILE, ANALYSIS_WINDOW_FILE,
    INPUT_FILE, SYNTHESIS_OUTPUT_FILE, SYNTHESIS_WINDOW_FILE,
};
use crate::window::{RomTables, WindowPair};

/// The three append-only channels handed to the RTL comparison harness.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoldenTrace {
    pub inputs: Vec<i64>,
    pub analysis: Vec<i64>,
    pub synthesis: Vec<i64>,
}

/// Result of one configured run.
#[derive(Debug, Clone)]
pub struct GoldenRun {
    pub config: OlaConfig,
    pub windows: WindowPair,
    pub rom: RomTables,
    pub trace: GoldenTrace,
    /// Synthesis output at its output positions, one value per input sample.
    pub reconstructed: Vec<i64>,
    pub fidelity: FidelityReport,
}

/// Validate `config`, generate its stimulus and run the filterbank.
pub fn generate(config: &OlaConfig) -> OlaResult<GoldenRun> {
    config.validate()?;
    let inputs = stimulus::generate(
        config.sample_count,
        config.stimulus_mode,
        config.value_width,
        config.seed,
    );
    run_with_input(config, inputs)
}

/// Run the filterbank described by `config` on an explicit input signal.
///
/// `config.sample_count` and the stimulus settings are ignored; the input
/// length drives the number of hops.
pub fn run_with_input(config: &OlaConfig, inputs: Vec<i64>) -> OlaResult<GoldenRun> {
    let config = OlaConfig {
        sample_count: inputs.len(),
        ..config.clone()
    };
    config.validate()?;

    let (lo, hi) = (min_signed(config.value_width), max_signed(config.value_width));
    if let Some(pos) = inputs.iter().position(|&x| x < lo || x > hi) {
        log::warn!(
            "input sample {pos} ({}) exceeds the {}-bit range",
            inputs[pos],
            config.value_width
        );
    }

    let windows = WindowPair::design(
        config.window_kind,
        config.frame_size,
        config.hop_size,
        config.periodic,
    )?;
    let rom = windows.quantize(config.value_width);

    let mut ola = OlaPipeline::fixed_point(config.value_width, &rom, config.hop_size)?;
    let pipeline = ola.run(&inputs);
    let fidelity = fidelity::evaluate(
        &inputs,
        &pipeline.reconstructed,
        config.frame_size,
        config.hop_size,
    );
    log::info!(
        "{} hops, {} analysis values, {} synthesis values, SNR {:.2} dB",
        ola.hops_processed(),
        pipeline.analysis.len(),
        pipeline.synthesis.len(),
        fidelity.snr_db
    );

    Ok(GoldenRun {
        config,
        windows,
        rom,
        trace: GoldenTrace {
            inputs,
            analysis: pipeline.analysis,
            synthesis: pipeline.synthesis,
        },
        reconstructed: pipeline.reconstructed,
        fidelity,
    })
}

impl GoldenRun {
    pub fn snr_db(&self) -> f64 {
        self.fidelity.snr_db
    }

    /// Write the artifacts selected by the `emit_*` flags into `dir`.
    ///
    /// Either every selected artifact is written or none is.
    pub fn write_artifacts(&self, dir: impl AsRef<Path>) -> OlaResult<Vec<WrittenArtifact>> {
        let mut writer = ArtifactWriter::new(dir.as_ref())?;
        if self.config.emit_inputs {
            writer.stage(INPUT_FILE, &self.trace.inputs)?;
        }
        if self.config.emit_windows {
            writer.stage(ANALYSIS_WINDOW_FILE, &self.rom.analysis)?;
            writer.stage(SYNTHESIS_WINDOW_FILE, &self.rom.synthesis)?;
        }
        if self.config.emit_outputs {
            writer.stage(ANALYSIS_OUTPUT_FILE, &self.trace.analysis)?;
            writer.stage(SYNTHESIS_OUTPUT_FILE, &self.trace.synthesis)?;
        }
        writer.commit()
    }
}

/// Outcome of a successful replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub hops: usize,
    pub frame_size: usize,
    pub analysis_values: usize,
    pub synthesis_values: usize,
    pub fidelity: FidelityReport,
}

/// Check that `actual` reproduces `expected` value for value.
pub fn compare_channel(channel: &'static str, expected: &[i64], actual: &[i64]) -> OlaResult<()> {
    if let Some(index) = expected.iter().zip(actual).position(|(e, a)| e != a) {
        return Err(OlaError::TraceMismatch {
            channel,
            index,
            expected: expected[index],
            actual: actual[index],
        });
    }
    if expected.len() != actual.len() {
        return Err(OlaError::LengthMismatch {
            channel,
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    Ok(())
}

/// Reload the input trace and window tables from `dir`, re-run the pipeline
/// and verify the stored analysis and synthesis traces.
pub fn replay(dir: impl AsRef<Path>, value_width: u32, hop_size: usize) -> OlaResult<ReplayReport> {
    let dir = dir.as_ref();
    let inputs = read_integers(dir.join(INPUT_FILE))?;
    let rom = RomTables {
        analysis: read_integers(dir.join(ANALYSIS_WINDOW_FILE))?,
        synthesis: read_integers(dir.join(SYNTHESIS_WINDOW_FILE))?,
    };
    let mut ola = OlaPipeline::fixed_point(value_width, &rom, hop_size)?;
    let pipeline = ola.run(&inputs);

    compare_channel(
        "analysis",
        &read_integers(dir.join(ANALYSIS_OUTPUT_FILE))?,
        &pipeline.analysis,
    )?;
    compare_channel(
        "synthesis",
        &read_integers(dir.join(SYNTHESIS_OUTPUT_FILE))?,
        &pipeline.synthesis,
    )?;

    let frame_size = ola.frame_size();
    log::info!(
        "replayed {} hops from {}: traces match",
        ola.hops_processed(),
        dir.display()
    );
    Ok(ReplayReport {
        hops: ola.hops_processed(),
        frame_size,
        analysis_values: pipeline.analysis.len(),
        synthesis_values: pipeline.synthesis.len(),
        fidelity: fidelity::evaluate(&inputs, &pipeline.reconstructed, frame_size, hop_size),
    })
}
