mod error;
mod markup;
mod parser;
mod pipeline;
mod reduce;
mod settings;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;

use parser::ParseOptions;
use reduce::Domain;
use settings::Settings;

/// sysexits.h EX_USAGE
const EX_USAGE: u8 = 64;

const EXAMPLES: &str = "\
Examples:
  Run with the provided weather file:   pre_table weather
  Run with a custom weather file:       pre_table weather my-weather-data.dat
  Run with the provided soccer file:    pre_table soccer
  Run with a custom soccer file:        pre_table soccer my-soccer-data.dat";

#[derive(Parser)]
#[command(
    name = "pre_table",
    version,
    about = "Answer questions about fixed-width tables embedded in <pre> blocks",
    after_help = EXAMPLES
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day of the month with the smallest temperature spread
    Weather {
        /// Weather document (default: w_data.dat)
        file: Option<PathBuf>,
    },
    /// Team with the smallest difference between goals for and against
    Soccer {
        /// League table document (default: soccer.dat)
        file: Option<PathBuf>,
    },
    /// Print the parsed table as one JSON object per line
    Table {
        file: PathBuf,
        /// The first non-noise line is the header, not a title
        #[arg(long)]
        no_title: bool,
        /// Treat blank lines as table lines
        #[arg(long)]
        keep_blank: bool,
        /// Treat divider lines (`-----`, `=====`) as table lines
        #[arg(long)]
        keep_dividers: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage(e),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn usage(e: clap::Error) -> ExitCode {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        kind => {
            debug!(?kind, "rejected arguments");
            if kind != ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand {
                eprint!("{}", e.render());
            }
            println!("{}", Cli::command().render_long_help());
            ExitCode::from(EX_USAGE)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Weather { file } => print_answer(Domain::Weather, file),
        Commands::Soccer { file } => print_answer(Domain::Soccer, file),
        Commands::Table {
            file,
            no_title,
            keep_blank,
            keep_dividers,
        } => {
            let opts = ParseOptions::default()
                .with_title_line(!no_title)
                .with_blank_lines_ignored(!keep_blank)
                .with_divider_lines_ignored(!keep_dividers);
            let records = pipeline::load_table(&file, &opts)?;
            let mut out = std::io::stdout().lock();
            for record in &records {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }
            Ok(())
        }
    }
}

fn print_answer(domain: Domain, file: Option<PathBuf>) -> Result<()> {
    let path = match file {
        Some(path) => path,
        None => Settings::load()?.data_file(domain).to_path_buf(),
    };
    println!("{}", pipeline::answer(domain, &path)?);
    Ok(())
}
