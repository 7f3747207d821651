//! # ola-golden - bit-exact overlap-add filterbank reference model
//!
//! Generates golden stimulus/response vectors for verifying a hardware
//! overlap-add (OLA) analysis/synthesis filterbank. Every stage reproduces
//! the hardware datapath exactly: quantized window ROMs, a W-bit
//! multiply-and-round rule, and the buffered overlap-add state machine with
//! its `frame_size - hop_size` latency.
//!
//! ## Pipeline
//!
//! ```text
//! stimulus ──► analysis buffer ──► x analysis ROM ──► round ──► anaOutputs
//!                                                       │
//!                            synOutputs ◄── accumulate ◄┴── x synthesis ROM ──► round
//! ```
//!
//! ## Example
//!
//! ```
//! use ola_golden::{generate, OlaConfig, WindowKind};
//!
//! let config = OlaConfig {
//!     window_kind: WindowKind::Hann,
//!     sample_count: 1024,
//!     seed: 42,
//!     ..Default::default()
//! };
//! let run = generate(&config).unwrap();
//! assert_eq!(run.trace.synthesis.len(), 1024);
//! assert!(run.snr_db() > 60.0);
//! ```
//!
//! ## Cargo Features
//!
//! - `hop-trace`: log every hop's output at `trace` level.
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

/// Run configuration and validation
pub mod config;

/// Error types
pub mod error;

/// Reconstruction SNR
pub mod fidelity;

/// Fixed-point rounding unit and datapaths
///
/// Integer-only W-bit requantization that matches the hardware
/// multiply/round stage bit for bit.
pub mod fixed;

/// End-to-end generation and replay
pub mod golden;

/// Sample trait and word-range helpers
pub mod num;

/// Overlap-add analysis/synthesis pipeline
///
/// Hop-by-hop processor owning the analysis buffer, the synthesis
/// accumulator and the hop cursor.
pub mod pipeline;

/// Quantized test signals
pub mod stimulus;

/// Artifact files
///
/// Newline-separated integer traces and window tables, written
/// all-or-nothing.
pub mod trace;

/// Window design and quantization
///
/// Hann, Hamming and rectangular analysis windows, power-normalized
/// synthesis windows and their ROM tables.
pub mod window;

pub use config::OlaConfig;
pub use error::{OlaError, OlaResult};
pub use fixed::{fixed_point_round, Datapath, FixedPoint, Ideal};
pub use golden::{generate, replay, run_with_input, GoldenRun, GoldenTrace};
pub use pipeline::OlaPipeline;
pub use stimulus::StimulusMode;
pub use window::{WindowKind, WindowPair};
