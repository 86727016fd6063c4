//! # qrsheet CLI
//!
//! Usage:
//!   qrsheet --code AB --start 1 --end 9
//!   qrsheet                       (prompts for code and range)
//!   qrsheet --preset compact --print-geometry

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use qrsheet::config::{LayoutPreset, RunConfig};
use qrsheet::layout::compute_geometry;
use qrsheet::request::{ask, RunRequest};

#[derive(Debug, Parser)]
#[command(name = "qrsheet", version, about = "Generate labeled QR codes and a printable sheet")]
struct Cli {
    /// Label prefix, e.g. HP
    #[arg(long)]
    code: Option<String>,

    /// First number in the range
    #[arg(long, allow_hyphen_values = true)]
    start: Option<String>,

    /// Last number in the range
    #[arg(long, allow_hyphen_values = true)]
    end: Option<String>,

    /// Never prompt; missing values take their defaults
    #[arg(long)]
    no_input: bool,

    #[arg(long, default_value = "qr-codes")]
    output_dir: PathBuf,

    /// File name of the generated PDF, written inside --output-dir
    #[arg(long, default_value = "QR_Codes.pdf")]
    document: PathBuf,

    #[arg(long, default_value = "logo.png")]
    logo: PathBuf,

    /// TrueType font for label text
    #[arg(long)]
    font: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LayoutPreset::Dense)]
    preset: LayoutPreset,

    /// Print the solved page geometry as JSON and exit
    #[arg(long)]
    print_geometry: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    if cli.print_geometry {
        let geometry = compute_geometry(&cli.preset.grid_spec())?;
        println!("{}", serde_json::to_string_pretty(&geometry)?);
        return Ok(());
    }

    let request = if cli.no_input {
        RunRequest::resolve(cli.code.as_deref(), cli.start.as_deref(), cli.end.as_deref())
    } else {
        let stdin = io::stdin();
        let mut reader = stdin.lock();
        let mut writer = io::stdout();
        let code = answer(&mut reader, &mut writer, cli.code, "Enter two-letter code (default HP): ")?;
        let start = answer(&mut reader, &mut writer, cli.start, "Starting number (default 1): ")?;
        let end = answer(&mut reader, &mut writer, cli.end, "Ending number (default 20): ")?;
        RunRequest::resolve(Some(&code), Some(&start), Some(&end))
    };
    debug!("Resolved request: {request:?}");

    let config = RunConfig {
        output_dir: cli.output_dir,
        document_name: cli.document,
        logo_path: cli.logo,
        font_path: cli.font,
        preset: cli.preset,
    };

    let report = qrsheet::run(&config, &request)?;
    println!(
        "Generated {} label(s) in {} and {} ({} page(s))",
        report.labels.len(),
        config.output_dir.display(),
        report.document_path.display(),
        report.page_count
    );
    Ok(())
}

/// Use the flag value when given, otherwise prompt for it.
fn answer<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    given: Option<String>,
    question: &str,
) -> io::Result<String> {
    match given {
        Some(value) => Ok(value),
        None => ask(reader, writer, question),
    }
}
