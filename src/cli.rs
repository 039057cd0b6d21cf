use crate::utils::Result;
use clap::{ArgAction, Parser};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="teloscan",
          about="Scans assembly sequences for telomeric repeats at both ends",
          version=&**FULL_VERSION,
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}",
          )]
pub struct Cli {
    #[command(flatten)]
    pub args: ScanArgs,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Parser, Debug)]
pub struct ScanArgs {
    #[clap(required = true)]
    #[clap(help = "FASTA file with assembly sequences (plain or gzipped)")]
    #[clap(value_name = "FASTA")]
    #[arg(value_parser = check_file_exists)]
    pub fasta_path: PathBuf,

    #[clap(long = "motifs")]
    #[clap(short = 'm')]
    #[clap(value_name = "MOTIFS")]
    #[clap(help = "Comma-separated telomere motifs to search for")]
    #[clap(default_value = "TTAGGG,CCCTAA")]
    #[clap(value_delimiter = ',')]
    #[arg(value_parser = check_motif_nonempty)]
    pub motifs: Vec<String>,

    #[clap(long = "min-repeats")]
    #[clap(short = 'r')]
    #[clap(value_name = "MIN_REPEATS")]
    #[clap(help = "Minimum number of consecutive motif copies required")]
    #[clap(default_value = "5")]
    #[arg(value_parser = repeats_in_range)]
    pub min_repeats: usize,

    #[clap(long = "window")]
    #[clap(short = 'w')]
    #[clap(value_name = "WINDOW")]
    #[clap(help = "Number of bases to search at each sequence end")]
    #[clap(default_value = "200")]
    #[arg(value_parser = window_in_range)]
    pub window: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "max-offset")]
    #[clap(value_name = "MAX_OFFSET")]
    #[clap(help = "Only accept repeat runs anchored within this many bases of the sequence end")]
    pub max_offset: Option<usize>,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn check_motif_nonempty(s: &str) -> Result<String> {
    if s.trim().is_empty() {
        Err("Motifs cannot be empty strings".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}

fn repeats_in_range(s: &str) -> Result<usize> {
    let repeats: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid repeat count", s))?;
    if repeats >= 1 {
        Ok(repeats)
    } else {
        Err("Minimum repeat count must be at least 1".into())
    }
}

fn window_in_range(s: &str) -> Result<usize> {
    let window: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid window size", s))?;
    if window >= 1 {
        Ok(window)
    } else {
        Err("Window size must be at least 1".into())
    }
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}
