// main.rs - Command-line frontend
// Builds an index from a dictionary file (or a saved snapshot), then
// answers single-term lookups or corrects whole strings.

use clap::{Parser, Subcommand};
use spellfix::{Config, DamerauLevenshtein, SymSpell, Verbosity};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spellfix", version, about = "Compound-aware spelling correction")]
struct Cli {
    /// Frequency dictionary file (term and count columns)
    #[arg(long, global = true)]
    dictionary: Option<PathBuf>,

    /// Column holding the term
    #[arg(long, global = true)]
    term_index: Option<usize>,

    /// Column holding the count
    #[arg(long, global = true)]
    count_index: Option<usize>,

    /// Edit-distance budget for queries
    #[arg(long, global = true)]
    max_edit_distance: Option<usize>,

    /// Load a previously saved index snapshot instead of a dictionary
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    /// Save the built index to this snapshot before answering
    #[arg(long, global = true)]
    save_index: Option<PathBuf>,

    /// Treat snapshots as gzip-compressed
    #[arg(long, global = true)]
    compressed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ranked suggestions for a single term
    Lookup {
        term: String,
        /// Result policy: best, closest, or all
        #[arg(long, default_value = "best")]
        verbosity: String,
    },
    /// Correct a string, resolving missing and spurious spaces
    Correct {
        /// Text to correct; omit to use --file instead
        text: Option<String>,
        /// Correct every line of this file, in parallel
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn parse_verbosity(raw: &str) -> Option<Verbosity> {
    match raw {
        "best" | "top" => Some(Verbosity::Top),
        "closest" => Some(Verbosity::Closest),
        "all" => Some(Verbosity::All),
        _ => None,
    }
}

fn run(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let max_edit_distance = cli.max_edit_distance.unwrap_or(config.max_edit_distance);

    let mut speller = SymSpell::new(
        DamerauLevenshtein::new(),
        max_edit_distance,
        config.prefix_length,
        config.count_threshold,
    );

    if let Some(snapshot) = &cli.index {
        speller.load(snapshot, cli.compressed)?;
    } else {
        let dictionary = cli
            .dictionary
            .clone()
            .or_else(|| config.dictionary.clone())
            .ok_or("no dictionary configured; pass --dictionary or --index")?;
        let term_index = cli.term_index.unwrap_or(config.term_index);
        let count_index = cli.count_index.unwrap_or(config.count_index);
        speller.load_dictionary(&dictionary, term_index, count_index)?;
    }

    if let Some(snapshot) = &cli.save_index {
        speller.save(snapshot, cli.compressed)?;
    }

    match &cli.command {
        Command::Lookup { term, verbosity } => {
            let verbosity = parse_verbosity(verbosity)
                .ok_or("verbosity must be one of: best, closest, all")?;
            for suggestion in speller.lookup(term, verbosity, max_edit_distance) {
                println!(
                    "{}\t{}\t{}",
                    suggestion.term, suggestion.distance, suggestion.count
                );
            }
        }
        Command::Correct { text, file } => {
            if let Some(text) = text {
                println!("{}", speller.lookup_compound(text, max_edit_distance).term);
            } else if let Some(file) = file {
                let lines: Vec<String> = std::fs::read_to_string(file)?
                    .lines()
                    .map(str::to_string)
                    .collect();
                for corrected in speller.lookup_compound_batch(&lines, max_edit_distance) {
                    println!("{}", corrected.term);
                }
            } else {
                return Err("nothing to correct; pass text or --file".into());
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        Err(_) => Config::default(),
    };

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
