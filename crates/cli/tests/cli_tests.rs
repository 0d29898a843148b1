// Integration tests for the muster binary: offline validate, synth, and
// config checking. The record store is never touched here.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn muster() -> Command {
    Command::new(env!("CARGO_BIN_EXE_muster"))
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Render one faction's static entries as a flat reference export.
fn faction_csv(faction: &str) -> String {
    let mut out = String::from(
        "id,name,faction,points,keywords,availability,command,high_command,special_rules\n",
    );
    for def in muster_core::STATIC_UNITS
        .iter()
        .filter(|d| d.faction == faction)
    {
        let _ = writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            def.id,
            def.name,
            def.faction,
            def.points,
            def.keywords.join("|"),
            def.availability,
            def.command,
            def.high_command,
            def.special_rules.join("|"),
        );
    }
    out
}

/// Write a config plus flat files mirroring the static catalog; returns the
/// config path.
fn setup_workspace(dir: &Path) -> PathBuf {
    let flat_dir = dir.join("flat");
    for faction in muster_core::static_factions() {
        let faction_dir = flat_dir.join(&faction);
        fs::create_dir_all(&faction_dir).unwrap();
        fs::write(faction_dir.join("troops.csv"), faction_csv(&faction)).unwrap();
    }

    let config_path = dir.join("muster.toml");
    fs::write(
        &config_path,
        format!(
            "[store]\nbase_url = \"http://localhost:9\"\ntable = \"units\"\n\n\
             [flatfile]\ndir = \"{}\"\n",
            flat_dir.display(),
        ),
    )
    .unwrap();
    config_path
}

#[test]
fn check_config_reports_valid() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());

    let output = muster()
        .args(["check-config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stderr_of(&output).contains("valid:"));
}

#[test]
fn check_config_rejects_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("muster.toml");
    fs::write(&path, "not = [toml\n").unwrap();

    let output = muster().args(["check-config"]).arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(5), "stderr: {}", stderr_of(&output));
}

#[test]
fn validate_offline_clean_run_passes() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());

    let output = muster()
        .args(["validate", "--offline", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stderr_of(&output).contains("validation passed"));
}

#[test]
fn validate_offline_detects_points_drift() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());

    // Drift one unit's cost in the northern-tribes export.
    let troops = dir.path().join("flat/northern-tribes/troops.csv");
    let drifted = fs::read_to_string(&troops).unwrap().replace(",30,", ",32,");
    fs::write(&troops, drifted).unwrap();

    let output = muster()
        .args(["validate", "--offline", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr_of(&output));
    let stderr = stderr_of(&output);
    assert!(stderr.contains("points_conflict"), "stderr: {stderr}");
    assert!(stderr.contains("northern-tribes/wrathmane"), "stderr: {stderr}");
}

#[test]
fn validate_json_envelope_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());

    let output = muster()
        .args(["validate", "--offline", "--json", "-q", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let envelope: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(envelope["report"]["summary"]["passed"], true);
    assert_eq!(envelope["report"]["meta"]["store_records"], serde_json::Value::Null);
    assert!(envelope["run_at"].is_string());
}

#[test]
fn validate_missing_flat_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());
    fs::remove_file(dir.path().join("flat/ashen-covenant/troops.csv")).unwrap();

    let output = muster()
        .args(["validate", "--offline", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr_of(&output));
    assert!(stderr_of(&output).contains("ashen-covenant"));
}

#[test]
fn synth_emits_static_def_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());

    let output = muster()
        .args(["synth", "northern-tribes", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let stdout = stdout_of(&output);
    assert!(stdout.contains("StaticDef {"));
    assert!(stdout.contains("name: \"Wrathmane\","));
    assert!(stdout.contains("image: \"northern-tribes/wrathmane_card.jpg\","));
    // Flat files mirror the catalog, so nothing would change on paste.
    assert!(stderr_of(&output).contains("0 field change(s)"));
}

#[test]
fn synth_accepts_unnormalized_faction_label() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_workspace(dir.path());

    let output = muster()
        .args(["synth", "Northern Tribes", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("faction: \"northern-tribes\","));
}
