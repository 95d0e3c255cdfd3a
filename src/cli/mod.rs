//! Command-line interface wiring for the `assetqr` binary.

use anyhow::Result;
use assetqr::{FontSet, Generator, GeneratorConfig, Progress, QrEncoder};
use clap::Parser;

/// Parsed CLI entrypoint for the `assetqr` binary.
#[derive(Parser, Debug)]
#[command(
    name = "assetqr",
    version,
    about = "Generate labeled QR codes for fixed assets listed in fixed_assets.csv"
)]
pub struct Cli {
    /// Combine all generated QR codes into one or more A4-sized images for printing.
    #[arg(long = "forprint")]
    pub for_print: bool,
}

/// Execute a generation run with the fixed input and output locations.
pub fn run(cli: Cli) -> Result<()> {
    let config = GeneratorConfig::default();
    let fonts = FontSet::default();
    let encoder = QrEncoder::new();
    let generator = Generator::new(&config, &encoder, &fonts);

    println!(
        "Generating individual QR codes from {}...",
        config.input.display()
    );
    let summary = generator.run(cli.for_print, report)?;

    if cli.for_print {
        println!(
            "Wrote {} printable sheet(s) to {}",
            summary.pages.len(),
            config.output_dir.display()
        );
    }
    Ok(())
}

fn report(progress: Progress<'_>) {
    match progress {
        Progress::LabelSaved { uid, path } => {
            println!("Saved QR for UID {} -> {}", uid, path.display());
        }
        Progress::LabelsFinished { count } => {
            println!("Generated {} individual QR code(s)", count);
        }
        Progress::SheetsStarted { pages } => {
            println!("Creating {} printable A4 sheet(s)...", pages);
        }
        Progress::PageSaved { number, path } => {
            println!("Saved page {} -> {}", number, path.display());
        }
    }
}
