//! `muster fix` — apply one accepted mismatch to the record store.
//!
//! The mismatch is re-derived from a fresh static + store load on every
//! invocation, so a retry after a stale failure always acts on current
//! data.

use std::path::PathBuf;

use muster_core::{key_of, normalize_faction, Field, SourceRecord};
use muster_recon::{diff_pair, match_records};
use muster_store_client::{
    apply::record_field_value, apply_fix, verify_fix, ApplyError, FieldFix, HttpStore,
};

use crate::exit_codes::{
    store_exit_code, EXIT_FIX_NO_MISMATCH, EXIT_FIX_STALE, EXIT_FIX_UNVERIFIED,
};
use crate::validate::load_store;
use crate::{load_config, CliError};

pub fn cmd_fix(
    unit: String,
    field: String,
    faction: Option<String>,
    config_path: PathBuf,
    quiet: bool,
) -> Result<(), CliError> {
    let field: Field = field
        .parse()
        .map_err(|e: String| CliError::args(format!("{e} (try `muster fix --help`)")))?;

    let config = load_config(&config_path)?;
    let statics = muster_core::load_static();
    let store_records = load_store(&config, quiet)?;

    let matched = match_records(&statics, &store_records);

    // Locate the pair for the requested unit.
    let needle = unit.to_lowercase();
    let faction_filter = faction.as_deref().map(normalize_faction);
    let candidates: Vec<&(SourceRecord, SourceRecord)> = matched
        .pairs
        .iter()
        .filter(|(static_rec, _)| {
            let key = key_of(static_rec);
            let hit = key.ident == needle || static_rec.name.to_lowercase() == needle;
            hit && faction_filter
                .as_ref()
                .map_or(true, |f| &key.faction == f)
        })
        .collect();

    let (static_rec, store_rec) = match candidates.as_slice() {
        [] => {
            return Err(CliError {
                code: EXIT_FIX_NO_MISMATCH,
                message: format!("unit '{unit}' is not matched between static and store"),
                hint: Some("run `muster validate` to see what the sources hold".into()),
            })
        }
        [one] => (&one.0, &one.1),
        many => {
            let keys: Vec<String> = many.iter().map(|(s, _)| key_of(s).to_string()).collect();
            return Err(CliError::args(format!(
                "unit '{unit}' is ambiguous ({}); pass --faction",
                keys.join(", "),
            )));
        }
    };

    let mismatch = diff_pair(static_rec, store_rec)
        .into_iter()
        .find(|m| m.field == field)
        .ok_or_else(|| CliError {
            code: EXIT_FIX_NO_MISMATCH,
            message: format!(
                "no {field} mismatch for {} — sources already agree",
                key_of(static_rec),
            ),
            hint: None,
        })?;

    let record_id = store_rec.id.clone().ok_or_else(|| CliError {
        code: EXIT_FIX_NO_MISMATCH,
        message: format!("store record for {} has no id", key_of(static_rec)),
        hint: None,
    })?;

    let fix = FieldFix {
        record_id,
        key: mismatch.key.clone(),
        field,
        observed: record_field_value(store_rec, field),
        desired: record_field_value(static_rec, field),
    };

    let token = std::env::var(&config.store.api_key_env).unwrap_or_default();
    let store = HttpStore::new(&config.store.base_url, token).map_err(|e| CliError {
        code: store_exit_code(&e),
        message: e.to_string(),
        hint: None,
    })?;

    match apply_fix(&store, &config.store.table, &fix) {
        Ok(()) => {}
        Err(ApplyError::Stale { .. }) => {
            return Err(CliError {
                code: EXIT_FIX_STALE,
                message: format!(
                    "store value for {} {field} changed since detection; nothing written",
                    fix.key,
                ),
                hint: Some("reload and re-run `muster fix` to act on current data".into()),
            })
        }
        Err(ApplyError::Store(e)) => {
            return Err(CliError {
                code: store_exit_code(&e),
                message: format!("fix failed: {e}"),
                hint: None,
            })
        }
    }

    let converged = verify_fix(&store, &config.store.table, &fix).map_err(|e| CliError {
        code: store_exit_code(&e),
        message: format!("fix applied but verification read failed: {e}"),
        hint: None,
    })?;

    if !converged {
        return Err(CliError {
            code: EXIT_FIX_UNVERIFIED,
            message: format!("fix applied but {} {field} did not converge", fix.key),
            hint: None,
        });
    }

    if !quiet {
        eprintln!("fixed {} {field}; store verified", fix.key);
    }
    Ok(())
}
