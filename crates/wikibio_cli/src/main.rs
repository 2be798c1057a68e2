//! `wikibio` command-line entry point.
//!
//! # Responsibility
//! - Open a SQLite tree file and run one core use-case per invocation.
//! - Merge biography options from an optional JSON file and flags.
//! - Write generated text to stdout or a file.

use clap::{Args, Parser, Subcommand};
use log::info;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wikibio_core::{
    default_log_level, init_logging, open_db, BiographyOptions, BiographyService, Handle,
    SqliteTree, TreeSnapshot,
};

type CliResult<T> = Result<T, Box<dyn Error>>;

/// Generate WikiTree-style biographies from a genealogy tree database
#[derive(Parser)]
#[command(name = "wikibio", version, about)]
struct Cli {
    /// SQLite tree database (created and migrated when absent)
    #[arg(long, global = true, default_value = "tree.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the biography of one person
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),

    /// Store a person's WikiTree id
    SetExternalId(SetExternalIdArgs),

    /// Load a JSON tree snapshot into the database
    Import(ImportArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Person handle
    #[arg(required_unless_present = "gramps_id", conflicts_with = "gramps_id")]
    handle: Option<String>,

    /// Look the person up by Gramps id (e.g. I0001) instead of handle
    #[arg(long)]
    gramps_id: Option<String>,

    /// JSON file with biography options; flags below override it
    #[arg(long)]
    options: Option<PathBuf>,

    /// Include events where the person was a witness or informant
    #[arg(long)]
    witness_events: bool,

    /// List witnesses of births and marriages
    #[arg(long)]
    witnesses: bool,

    /// Include the notes section and citation notes
    #[arg(long)]
    notes: bool,

    /// Write the biography here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct SetExternalIdArgs {
    /// Person handle
    handle: String,

    /// WikiTree id (e.g. Smith-1234)
    id: String,
}

#[derive(Args)]
struct ImportArgs {
    /// Snapshot file
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("wikibio: logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("wikibio: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let conn = open_db(&cli.db)?;
    let tree = SqliteTree::try_new(&conn)?;

    match cli.command {
        Command::Generate(args) => generate(&tree, args),
        Command::SetExternalId(args) => {
            tree.set_external_id(&Handle::new(args.handle), &args.id)?;
            Ok(())
        }
        Command::Import(args) => {
            let snapshot = TreeSnapshot::from_json(&fs::read_to_string(&args.input)?)?;
            let summary = snapshot.write_to(&tree)?;
            println!("imported {} records", summary.total());
            Ok(())
        }
    }
}

fn generate(tree: &SqliteTree<'_>, args: GenerateArgs) -> CliResult<()> {
    let options = resolve_options(&args)?;
    let service = BiographyService::new(tree);
    let biography = match (&args.gramps_id, &args.handle) {
        (Some(gramps_id), _) => service.generate_for_gramps_id(gramps_id, options)?,
        (None, Some(handle)) => service.generate(&Handle::new(handle.as_str()), options)?,
        (None, None) => return Err("a person handle or --gramps-id is required".into()),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &biography.text)?;
            info!(
                "event=bio_export module=cli status=ok sink=file sources={}",
                biography.source_count
            );
        }
        None => print!("{}", biography.text),
    }
    Ok(())
}

fn resolve_options(args: &GenerateArgs) -> CliResult<BiographyOptions> {
    let mut options = match &args.options {
        Some(path) => load_options(path)?,
        None => BiographyOptions::default(),
    };
    options.include_witness_events |= args.witness_events;
    options.include_witnesses |= args.witnesses;
    options.include_notes |= args.notes;
    Ok(options)
}

fn load_options(path: &Path) -> CliResult<BiographyOptions> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("cannot read options file `{}`: {err}", path.display()))?;
    Ok(serde_json::from_str(&raw)?)
}
