//! Profile form CLI.
//!
//! Keeps the committed profile snapshot in `.profile/profile.json` and runs
//! edit sessions against it: every save goes through the full rule set, and
//! only a passing snapshot is written back.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use profile::core::types::FieldError;
use profile::edit::{EditOutcome, parse_assignment, run_edit};
use profile::exit_codes;
use profile::import::import_server_profile;
use profile::io::card::render_card;
use profile::io::init::{InitOptions, ProfilePaths, init_profile};
use profile::io::profile_store::load_profile;
use profile::logging;
use profile::validate::validate_profile;

#[derive(Parser)]
#[command(name = "profile", version, about = "Editable profile form with field validation")]
struct Cli {
    /// Project directory (contains .profile/).
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Evaluation date for age rules (defaults to the local date).
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create `.profile/` with the sample snapshot, schema and config.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the committed snapshot.
    Show {
        /// Print JSON instead of a text card.
        #[arg(long)]
        json: bool,
    },
    /// Check a snapshot against the field rules.
    Validate {
        /// Snapshot to check (defaults to the committed one).
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Edit fields and save; nothing is written unless every rule passes.
    Edit {
        /// Field assignment, e.g. `--set username=petrov` (repeatable).
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
        /// Discard the edits instead of saving.
        #[arg(long)]
        cancel: bool,
    },
    /// Map a server-data JSON file and commit it if it validates.
    Import { path: PathBuf },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    match cli.command {
        Command::Init { force } => cmd_init(&cli.root, force),
        Command::Show { json } => cmd_show(&cli.root, json),
        Command::Validate { file } => cmd_validate(&cli.root, file.as_deref(), today),
        Command::Edit {
            assignments,
            cancel,
        } => cmd_edit(&cli.root, &assignments, cancel, today),
        Command::Import { path } => report_outcome(import_server_profile(&cli.root, &path, today)?),
    }
}

fn cmd_init(root: &Path, force: bool) -> Result<i32> {
    let paths = init_profile(root, &InitOptions { force })?;
    println!("initialized {}", paths.profile_dir.display());
    Ok(exit_codes::OK)
}

fn cmd_show(root: &Path, json: bool) -> Result<i32> {
    let paths = ProfilePaths::new(root);
    let record = load_profile(&paths.schema_path, &paths.profile_path)?;
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).context("serialize profile")?
        );
    } else {
        print!("{}", render_card("Profile", &record, &BTreeMap::new())?);
    }
    Ok(exit_codes::OK)
}

fn cmd_validate(root: &Path, file: Option<&Path>, today: NaiveDate) -> Result<i32> {
    let outcome = validate_profile(root, file, today)?;
    if outcome.is_valid() {
        println!("{}: valid", outcome.path.display());
        return Ok(exit_codes::OK);
    }
    print_errors(&outcome.errors);
    Ok(exit_codes::REJECTED)
}

fn cmd_edit(root: &Path, assignments: &[String], cancel: bool, today: NaiveDate) -> Result<i32> {
    let edits = assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;
    report_outcome(run_edit(root, edits, cancel, today)?)
}

fn report_outcome(outcome: EditOutcome) -> Result<i32> {
    match outcome {
        EditOutcome::Saved { notification, .. } => {
            println!("{}", notification.message());
            Ok(exit_codes::OK)
        }
        EditOutcome::Rejected {
            errors,
            notification,
        } => {
            eprintln!("{}", notification.message());
            print_errors(&errors);
            Ok(exit_codes::REJECTED)
        }
        EditOutcome::Cancelled { .. } => {
            println!("edits discarded");
            Ok(exit_codes::OK)
        }
    }
}

fn print_errors(errors: &[FieldError]) {
    for error in errors {
        eprintln!("- {error}");
    }
}
