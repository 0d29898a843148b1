//! `muster validate` — run the full reconciliation and report.

use std::path::PathBuf;

use muster_core::SourceRecord;
use muster_recon::{load_flat_file, reconcile, LoadError, RowWarning};
use muster_store_client::{load_all, HttpStore};

use crate::config::MusterConfig;
use crate::exit_codes::{store_exit_code, EXIT_STORE_NOT_AUTH, EXIT_VALIDATE_ISSUES};
use crate::{load_config, show_progress, CliError};

pub fn cmd_validate(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
    offline: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let statics = muster_core::load_static();

    let (flat_records, warnings) = load_flat_sources(&config)?;

    let store_records = if offline {
        None
    } else {
        Some(load_store(&config, quiet)?)
    };

    let report = reconcile(&statics, store_records.as_deref(), &flat_records, &warnings);

    // JSON envelope: the engine report is deterministic; the run stamp and
    // tool version live out here.
    if json_output || output_file.is_some() {
        let envelope = serde_json::json!({
            "run_at": chrono::Utc::now().to_rfc3339(),
            "tool_version": env!("CARGO_PKG_VERSION"),
            "report": report,
        });
        let json_str = serde_json::to_string_pretty(&envelope)
            .map_err(|e| CliError::load(format!("JSON serialization error: {e}")))?;

        if let Some(path) = &output_file {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::load(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if json_output {
            println!("{json_str}");
        }
    }

    // Human summary to stderr.
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!(
        "validate: {} static, {} store, {} flatfile record(s)",
        report.meta.static_records,
        report
            .meta
            .store_records
            .map(|n| n.to_string())
            .unwrap_or_else(|| "skipped".into()),
        report.meta.flatfile_records,
    );

    if report.summary.passed {
        eprintln!("validation passed — sources agree");
        return Ok(());
    }

    let buckets: Vec<String> = report
        .summary
        .bucket_counts
        .iter()
        .map(|(bucket, count)| format!("{bucket}: {count}"))
        .collect();
    eprintln!(
        "{} issue(s) — {}",
        report.summary.total_issues,
        buckets.join(", "),
    );
    for issue in &report.issues {
        eprintln!("  [{}] {} — {}", issue.bucket, issue.key, issue.detail);
    }

    Err(CliError {
        code: EXIT_VALIDATE_ISSUES,
        message: format!("{} issue(s) found", report.summary.total_issues),
        hint: None,
    })
}

/// Load every configured faction's flat file. A missing or unreadable file
/// is fatal; row-level problems accumulate as warnings.
pub fn load_flat_sources(
    config: &MusterConfig,
) -> Result<(Vec<SourceRecord>, Vec<RowWarning>), CliError> {
    let opts = config.flat_file_options();
    let mut records = Vec::new();
    let mut warnings = Vec::new();

    for faction in config.factions() {
        let path = config.flat_file_path(&faction);
        let data = std::fs::read_to_string(&path)
            .map_err(|e| CliError::load(format!("flatfile load failed: cannot read {}: {e}", path.display())))?;
        let load = load_flat_file(&data, &opts)
            .map_err(|e: LoadError| CliError::load(e.to_string()))?;
        records.extend(load.records);
        warnings.extend(load.warnings);
    }

    Ok((records, warnings))
}

/// Open the store from config + environment and fetch every row.
pub fn load_store(config: &MusterConfig, quiet: bool) -> Result<Vec<SourceRecord>, CliError> {
    let token = std::env::var(&config.store.api_key_env).unwrap_or_default();
    if token.trim().is_empty() {
        return Err(CliError {
            code: EXIT_STORE_NOT_AUTH,
            message: format!("missing store API token (set {})", config.store.api_key_env),
            hint: None,
        });
    }

    let store = HttpStore::new(&config.store.base_url, token).map_err(|e| CliError {
        code: store_exit_code(&e),
        message: format!("store load failed: {e}"),
        hint: None,
    })?;

    let progress = show_progress(quiet);
    load_all(&store, &config.store.table, |page, rows| {
        if progress {
            eprintln!("  page {page}: {rows} record(s)");
        }
    })
    .map_err(|e| CliError {
        code: store_exit_code(&e),
        message: format!("store load failed: {e}"),
        hint: None,
    })
}
