use clap::{Args, Parser, Subcommand, ValueEnum};
use ola_golden::golden::{self, ReplayReport};
use ola_golden::stimulus::DEFAULT_SINE_PERIOD;
use ola_golden::trace::WrittenArtifact;
use ola_golden::{OlaConfig, OlaResult, StimulusMode, WindowKind};
use std::path::PathBuf;

/// Generate and check golden vectors for the overlap-add filterbank RTL.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate stimulus, window ROM tables and expected traces
    Generate(GenerateArgs),
    /// Re-run stored inputs and windows and verify the stored traces
    Replay(ReplayArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stimulus {
    Random,
    Sine,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output directory for the artifacts
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Bits per sample and window coefficient
    #[arg(long, default_value_t = 16)]
    pub value_width: u32,

    /// Samples consumed and emitted per hop
    #[arg(long, default_value_t = 16)]
    pub hop_size: usize,

    /// Window and buffer length
    #[arg(long, default_value_t = 64)]
    pub frame_size: usize,

    /// Window type: hann, hamming or rectangular
    #[arg(long, default_value = "hann")]
    pub window: String,

    /// Use symmetric instead of periodic cosine windows
    #[arg(long)]
    pub symmetric: bool,

    /// Test signal shape
    #[arg(long, value_enum, default_value_t = Stimulus::Random)]
    pub stimulus: Stimulus,

    /// Period in samples of the sine stimulus
    #[arg(long, default_value_t = DEFAULT_SINE_PERIOD)]
    pub sine_period: f64,

    /// Stimulus length in samples
    #[arg(long, default_value_t = 10_000)]
    pub samples: usize,

    /// Seed of the random stimulus
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Skip the input trace
    #[arg(long)]
    pub no_inputs: bool,

    /// Skip the window ROM tables
    #[arg(long)]
    pub no_windows: bool,

    /// Skip the analysis and synthesis traces
    #[arg(long)]
    pub no_outputs: bool,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Directory holding a complete artifact set
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Bits per sample and window coefficient
    #[arg(long, default_value_t = 16)]
    pub value_width: u32,

    /// Samples consumed and emitted per hop
    #[arg(long, default_value_t = 16)]
    pub hop_size: usize,
}

impl GenerateArgs {
    /// Map the command line onto a validated model configuration.
    pub fn to_config(&self) -> OlaResult<OlaConfig> {
        let stimulus_mode = match self.stimulus {
            Stimulus::Random => StimulusMode::Random,
            Stimulus::Sine => StimulusMode::Sine {
                period: self.sine_period,
            },
        };
        let config = OlaConfig {
            value_width: self.value_width,
            hop_size: self.hop_size,
            frame_size: self.frame_size,
            stimulus_mode,
            window_kind: self.window.parse::<WindowKind>()?,
            periodic: !self.symmetric,
            sample_count: self.samples,
            seed: self.seed,
            emit_inputs: !self.no_inputs,
            emit_windows: !self.no_windows,
            emit_outputs: !self.no_outputs,
        };
        config.validate()?;
        Ok(config)
    }
}

/// What `generate` produced.
#[derive(Debug)]
pub struct GenerateSummary {
    pub snr_db: f64,
    pub hops: usize,
    pub artifacts: Vec<WrittenArtifact>,
}

pub fn generate(args: &GenerateArgs) -> OlaResult<GenerateSummary> {
    let config = args.to_config()?;
    log::info!(
        "generating {} samples ({} window, frame {}, hop {}) into {}",
        config.sample_count,
        config.window_kind,
        config.frame_size,
        config.hop_size,
        args.out.display()
    );
    let run = golden::generate(&config)?;
    let artifacts = run.write_artifacts(&args.out)?;
    Ok(GenerateSummary {
        snr_db: run.snr_db(),
        hops: config.hop_count(),
        artifacts,
    })
}

pub fn replay(args: &ReplayArgs) -> OlaResult<ReplayReport> {
    golden::replay(&args.dir, args.value_width, args.hop_size)
}

/// Human readable SNR, `inf` for a perfect reconstruction.
pub fn format_snr(snr_db: f64) -> String {
    if snr_db.is_infinite() && snr_db > 0.0 {
        "SNR: inf dB".to_string()
    } else {
        format!("SNR: {snr_db:.2} dB")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("golden-gen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_model_defaults() {
        let cli = parse(&["generate"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.to_config().unwrap(), OlaConfig::default());
    }

    #[test]
    fn flags_map_onto_config() {
        let cli = parse(&[
            "generate",
            "--window",
            "rectwin",
            "--symmetric",
            "--stimulus",
            "sine",
            "--sine-period",
            "250",
            "--hop-size",
            "4",
            "--frame-size",
            "4",
            "--no-windows",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let cfg = args.to_config().unwrap();
        assert_eq!(cfg.window_kind, WindowKind::Rectangular);
        assert!(!cfg.periodic);
        assert_eq!(cfg.stimulus_mode, StimulusMode::Sine { period: 250.0 });
        assert!(!cfg.emit_windows);
        assert!(cfg.emit_inputs && cfg.emit_outputs);
    }

    #[test]
    fn unsupported_window_is_rejected() {
        let cli = parse(&["generate", "--window", "flattop"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.to_config().unwrap_err().is_configuration());
    }

    #[test]
    fn snr_formatting() {
        assert_eq!(format_snr(f64::INFINITY), "SNR: inf dB");
        assert_eq!(format_snr(84.123), "SNR: 84.12 dB");
    }
}
