use anyhow::{Context, Result};
use clap::Parser;
use jianpu_core::OutputSink;
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use midi_to_jianpu::{convert_file, load_score, FileSink, InputFormat, StdoutSink};

#[derive(Parser, Debug)]
#[command(name = "midi-to-jianpu")]
#[command(about = "Convert MIDI files to Jianpu numbered notation", long_about = None)]
struct Args {
    /// Path to the score file (default: uses first .mid file in current directory)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path (default: `<input-name>.jianpu.txt`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of file
    #[arg(long)]
    stdout: bool,

    /// Input format, detected from the file extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<InputFormat>,

    /// Write the decoded score as JSON instead of Jianpu
    #[arg(long)]
    dump_score: bool,

    /// Suppress informational messages (only errors)
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.quiet);

    let input = if let Some(path) = args.input.clone() {
        if !path.exists() {
            anyhow::bail!("Score file not found: {}", path.display());
        }
        path
    } else {
        find_first_midi_file()?
    };

    let format = args
        .format
        .or_else(|| InputFormat::detect(&input))
        .with_context(|| {
            format!(
                "Cannot tell the format of {}; pass --format midi or --format json",
                input.display()
            )
        })?;

    info!("Processing score file: {}", input.display());

    if args.stdout {
        run(&input, format, args.dump_score, &mut StdoutSink)
    } else {
        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&input, args.dump_score));
        let mut sink = FileSink::new(output_path);
        run(&input, format, args.dump_score, &mut sink)?;
        info!("Output saved to {}", sink.path().display());
        Ok(())
    }
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run<S>(input: &Path, format: InputFormat, dump_score: bool, sink: &mut S) -> Result<()>
where
    S: OutputSink<Error = io::Error>,
{
    if dump_score {
        let score = load_score(input, format)?;
        let json = score.to_json_pretty()?;
        sink.set_output(&json).context("Failed to write score dump")?;
    } else {
        convert_file(input, format, sink)
            .with_context(|| format!("Failed to convert {}", input.display()))?;
    }
    Ok(())
}

fn default_output_path(input: &Path, dump_score: bool) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let suffix = if dump_score { "score.json" } else { "jianpu.txt" };
    PathBuf::from(format!("{}.{}", stem, suffix))
}

fn find_first_midi_file() -> Result<PathBuf> {
    let entries = fs::read_dir(".").context("Failed to read current directory")?;

    for entry in entries {
        let path = entry?.path();

        if InputFormat::detect(&path) == Some(InputFormat::Midi) {
            return Ok(path);
        }
    }

    anyhow::bail!("No MIDI files found in current directory")
}
