// Muster CLI - unit-catalog reconciliation, headless.

mod config;
mod exit_codes;
mod fix;
mod synth;
mod validate;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG_INVALID, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE, EXIT_VALIDATE_LOAD};

#[derive(Parser)]
#[command(name = "muster")]
#[command(about = "Reconcile unit data across static tables, the record store, and flat reference exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare all sources and report every disagreement
    #[command(after_help = "\
Exit code 3 indicates the sources disagree; 4 indicates a source failed to
load (no partial report is produced).

Examples:
  muster validate
  muster validate --config data/muster.toml --json
  muster validate --offline --output report.json
  MUSTER_STORE_TOKEN=tok_... muster validate")]
    Validate {
        /// Path to the muster.toml config file
        #[arg(long, default_value = "muster.toml")]
        config: PathBuf,

        /// Output the JSON report to stdout instead of only a summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Skip the record store; compare static tables against flat files only
        #[arg(long)]
        offline: bool,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Generate static-definition source text for a faction from its flat file
    #[command(after_help = "\
The output is advisory text in the static-table syntax, meant to be pasted
over the faction's entries by hand.

Examples:
  muster synth northern-tribes
  muster synth northern-tribes --out northern-tribes.rs")]
    Synth {
        /// Faction slug (or label; it is normalized)
        faction: String,

        /// Path to the muster.toml config file
        #[arg(long, default_value = "muster.toml")]
        config: PathBuf,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,

        /// Suppress notes on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Push one accepted fix for one unit field to the record store
    #[command(after_help = "\
The mismatch is re-derived from a fresh load on every invocation; a stale
store value (concurrent edit) aborts with exit 21 and writes nothing.

Examples:
  muster fix wrathmane points
  muster fix \"Icefang Pack\" keywords --faction northern-tribes")]
    Fix {
        /// Unit id or display name
        unit: String,

        /// Field to fix: name, points, availability, command, high_command,
        /// keywords, or special_rules
        field: String,

        /// Faction slug, required when the unit name is ambiguous
        #[arg(long)]
        faction: Option<String>,

        /// Path to the muster.toml config file
        #[arg(long, default_value = "muster.toml")]
        config: PathBuf,

        /// Suppress progress on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a muster.toml without running anything
    CheckConfig {
        /// Path to the config file
        config: PathBuf,
    },
}

// ---------------------------------------------------------------------------
// CLI error
// ---------------------------------------------------------------------------

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_CONFIG_INVALID,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_VALIDATE_LOAD,
            message: msg.into(),
            hint: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn load_config(path: &PathBuf) -> Result<config::MusterConfig, CliError> {
    let input = std::fs::read_to_string(path).map_err(|e| CliError {
        code: EXIT_CONFIG_INVALID,
        message: format!("cannot read {}: {e}", path.display()),
        hint: None,
    })?;
    config::MusterConfig::from_toml(&input).map_err(|e| CliError::config(e.to_string()))
}

fn show_progress(quiet: bool) -> bool {
    !quiet && atty::is(atty::Stream::Stderr)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate {
            config,
            json,
            output,
            offline,
            quiet,
        } => validate::cmd_validate(config, json, output, offline, quiet),
        Commands::Synth {
            faction,
            config,
            out,
            quiet,
        } => synth::cmd_synth(faction, config, out, quiet),
        Commands::Fix {
            unit,
            field,
            faction,
            config,
            quiet,
        } => fix::cmd_fix(unit, field, faction, config, quiet),
        Commands::CheckConfig { config } => cmd_check_config(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = &err.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(if err.code == 0 { EXIT_ERROR } else { err.code })
        }
    }
}

fn cmd_check_config(path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&path)?;
    eprintln!(
        "valid: store table '{}' at {}, flat files under {} ({} faction(s))",
        config.store.table,
        config.store.base_url,
        config.flatfile.dir.display(),
        config.factions().len(),
    );
    Ok(())
}
