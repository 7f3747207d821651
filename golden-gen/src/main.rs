use clap::Parser;
use golden_gen::{format_snr, generate, replay, Cli, Command};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => {
            let summary = generate(&args)?;
            for artifact in &summary.artifacts {
                println!(
                    "{}  {} ({} values)",
                    artifact.digest,
                    artifact.path.display(),
                    artifact.len
                );
            }
            println!("{} hops", summary.hops);
            println!("{}", format_snr(summary.snr_db));
        }
        Command::Replay(args) => {
            let report = replay(&args)?;
            println!(
                "traces match: {} hops, {} analysis values, {} synthesis values",
                report.hops, report.analysis_values, report.synthesis_values
            );
            println!("{}", format_snr(report.fidelity.snr_db));
        }
    }
    Ok(())
}
