use clap::{ArgGroup, Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rgzip::{BlockMode, CodecConfig, GzipCodec, ProgressSink, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rgzip", version, about = "gzip-compatible file compressor and decompressor")]
#[command(group(ArgGroup::new("direction").required(true).args(["compress", "decompress"])))]
struct Cli {
    /// Compress INPUT into a gzip member
    #[arg(short, long)]
    compress: bool,

    /// Decompress a gzip member from INPUT
    #[arg(short, long)]
    decompress: bool,

    /// Block encoding strategy (compression only)
    #[arg(long, value_enum, default_value_t = Mode::Dynamic)]
    mode: Mode,

    /// Emit literals only, skipping the back-reference search
    #[arg(long)]
    no_lz77: bool,

    /// Print size and timing details when done
    #[arg(short, long)]
    verbose: bool,

    /// Show a progress bar sized to the input file
    #[arg(short, long)]
    progress: bool,

    /// File to read
    input: PathBuf,

    /// File to write
    output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Stored,
    Fixed,
    Dynamic,
}

impl From<Mode> for BlockMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Stored => BlockMode::Stored,
            Mode::Fixed => BlockMode::Fixed,
            Mode::Dynamic => BlockMode::Dynamic,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let input = File::open(&cli.input)?;
    let input_len = input.metadata()?.len();
    let reader = BufReader::new(input);
    let writer = BufWriter::new(File::create(&cli.output)?);

    let mut config = CodecConfig::new(cli.mode.into());
    config.lz77 = !cli.no_lz77;
    if cli.compress {
        if let Some(name) = cli.input.file_name().and_then(|n| n.to_str()) {
            config = config.with_filename(name);
        }
    }
    let codec = GzipCodec::new(config);

    let bar = cli.progress.then(|| progress_bar(input_len));
    let mut update = |total: u64| {
        if let Some(b) = &bar {
            b.set_position(total);
        }
    };
    let sink: Option<&mut dyn ProgressSink> = if cli.progress { Some(&mut update) } else { None };

    let started = Instant::now();
    let report = if cli.compress {
        codec.compress(reader, writer, sink)?
    } else {
        codec.decompress(reader, writer, sink)?
    };
    if let Some(b) = &bar {
        b.finish_and_clear();
    }

    if cli.verbose {
        println!("{report}");
        println!("Took {:.3} seconds", started.elapsed().as_secs_f64());
    }
    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    let template = "[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} ({eta})";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=>-"));
    }
    bar
}
