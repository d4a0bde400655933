// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to
// its use case. Nothing is computed here.
//
//   1. `build`   — directory + transcripts → manifest
//   2. `plan`    — manifest → bucketed epoch plans
//   3. `convert` — mp3 → 16 kHz mono wav through sox
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{BuildArgs, Commands, ConvertArgs, PlanArgs};

#[derive(Parser, Debug)]
#[command(
    name = "audio-bucketing",
    version,
    about = "Build audio datasets and plan duration-bucketed training batches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Build(args)   => run_build(args),
            Commands::Plan(args)    => run_plan(args),
            Commands::Convert(args) => run_convert(args),
        }
    }
}

fn run_build(args: BuildArgs) -> Result<()> {
    use crate::application::build_use_case::BuildUseCase;

    tracing::info!("Building manifest from '{}'", args.audio_dir.display());
    let manifest_path = args.manifest.clone();
    let manifest      = BuildUseCase::new(args.into()).execute()?;

    println!(
        "Wrote {} recordings ({:.1} s) to {}",
        manifest.len(),
        manifest.total_duration(),
        manifest_path.display()
    );
    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<()> {
    use crate::application::plan_use_case::PlanUseCase;

    let output_dir = args.output_dir.clone();
    let summary    = PlanUseCase::new(args.into()).execute()?;

    println!(
        "Planned {} epochs: {} items, {} batches per epoch → {}",
        summary.plan_files.len(),
        summary.items,
        summary.batches_per_epoch,
        output_dir.display()
    );
    Ok(())
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    use crate::data::converter::SoxConverter;

    let written = SoxConverter::default().convert_dir(&args.input_dir, &args.output_dir)?;
    println!("Converted {} files into {}", written.len(), args.output_dir.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_defaults() {
        let cli = Cli::try_parse_from(["audio-bucketing", "plan"]).unwrap();
        let Commands::Plan(args) = cli.command else { panic!("expected plan") };
        assert_eq!(args.boundaries, vec![5.0, 10.0, 15.0, 20.0, 25.0]);
        assert_eq!(args.batch_sizes, vec![64, 32, 16, 8, 4, 2]);
        assert_eq!(args.seed, 42);
        assert!(!args.load_audio);
    }

    #[test]
    fn test_plan_comma_lists() {
        let cli = Cli::try_parse_from([
            "audio-bucketing",
            "plan",
            "--boundaries",
            "2.5,8",
            "--batch-sizes",
            "16,8,2",
            "--epochs",
            "3",
            "--load-audio",
        ])
        .unwrap();
        let Commands::Plan(args) = cli.command else { panic!("expected plan") };
        assert_eq!(args.boundaries, vec![2.5, 8.0]);
        assert_eq!(args.batch_sizes, vec![16, 8, 2]);
        assert_eq!(args.epochs, 3);
        assert!(args.load_audio);
    }

    #[test]
    fn test_convert_requires_dirs() {
        assert!(Cli::try_parse_from(["audio-bucketing", "convert"]).is_err());
    }
}
