//! `muster synth` — generate static-definition text from a flat file.

use std::path::PathBuf;

use muster_core::normalize_faction;
use muster_recon::{load_flat_file, synthesize};

use crate::{load_config, CliError};

pub fn cmd_synth(
    faction: String,
    config_path: PathBuf,
    out: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let slug = normalize_faction(&faction);

    let path = config.flat_file_path(&slug);
    let data = std::fs::read_to_string(&path).map_err(|e| {
        CliError::load(format!(
            "flatfile load failed: cannot read {}: {e}",
            path.display()
        ))
    })?;
    let load = load_flat_file(&data, &config.flat_file_options())
        .map_err(|e| CliError::load(e.to_string()))?;

    if !quiet {
        for warning in &load.warnings {
            eprintln!("warning: {warning}");
        }
    }

    let statics = muster_core::load_static();
    let synthesized = synthesize(&load.records, &statics, &slug);

    match &out {
        Some(path) => {
            std::fs::write(path, &synthesized.text)
                .map_err(|e| CliError::load(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{}", synthesized.text),
    }

    if !quiet {
        eprintln!(
            "{} record(s), {} field change(s) vs the static tables",
            synthesized.record_count, synthesized.changed_field_count,
        );
    }

    Ok(())
}
