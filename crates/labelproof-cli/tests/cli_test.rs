use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::process::Output;

const DIE_CUT_CONFIG: &str = r#"{
  "mode": "Make",
  "labelType": "Die-cut",
  "shapeType": "Squared",
  "widthInches": 3,
  "heightInches": 2
}"#;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("labelproof-cli"));
    cmd.current_dir(dir);
    cmd
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn create_writes_document_and_svg() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, DIE_CUT_CONFIG).expect("write config");
    let legends = tmp.path().join("legends");
    fs::create_dir(&legends).expect("legends dir");
    fs::write(legends.join("Die-cut.ai"), b"legend").expect("legend");

    let output = cli(tmp.path())
        .args([
            "create",
            "--legends",
            legends.to_string_lossy().as_ref(),
            "--out",
            "proof.json",
            "--svg",
            "proof.svg",
            config.to_string_lossy().as_ref(),
        ])
        .assert()
        .success()
        .get_output()
        .clone();

    let status = stdout_json(&output);
    assert_eq!(status["status"], "OK");
    assert_eq!(status["warnings"], serde_json::json!([]));
    assert_eq!(status["document"], "proof.json");

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(tmp.path().join("proof.json")).expect("doc"))
            .expect("document JSON");
    let layers: Vec<&str> = doc["layers"]
        .as_array()
        .expect("layers")
        .iter()
        .map(|l| l["name"].as_str().expect("layer name"))
        .collect();
    assert_eq!(
        layers,
        vec!["Annotations", "Artwork", "Guides", "White Background"]
    );

    let svg = fs::read_to_string(tmp.path().join("proof.svg")).expect("svg");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("data-name=\"Dieline\""));
}

#[test]
fn create_reads_stdin_and_reports_missing_legends() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = cli(tmp.path())
        .write_stdin(DIE_CUT_CONFIG)
        .assert()
        .success()
        .get_output()
        .clone();

    let status = stdout_json(&output);
    assert_eq!(status["status"], "OK");
    let warnings = status["warnings"].as_array().expect("warnings");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().expect("warning").contains("Die-cut.ai"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("warning: Legend file not found"));
}

#[test]
fn invalid_config_fails_with_status_one() {
    let tmp = tempfile::tempdir().expect("tempdir");

    cli(tmp.path())
        .write_stdin(r#"{ "mode": "Make", "labelType": "Sheets" }"#)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn unknown_flags_print_usage() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = cli(tmp.path())
        .arg("--bogus")
        .assert()
        .failure()
        .code(2)
        .get_output()
        .clone();
    assert!(String::from_utf8_lossy(&output.stderr).contains("USAGE:"));
}

#[test]
fn band_prints_the_selected_style() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = cli(tmp.path())
        .args(["band", "Die-cut", "3"])
        .assert()
        .success()
        .get_output()
        .clone();

    let selection = stdout_json(&output);
    assert_eq!(selection["band"], "2to4");
    assert_eq!(selection["style"]["dimLine"], 0.3625);
    assert_eq!(selection["style"]["fontSize"], 8.0);
    assert_eq!(selection["style"]["arrowAction"], "50%");
}

#[test]
fn legend_names_the_asset_and_checks_the_library() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("roll.json");
    fs::write(
        &config,
        r#"{ "mode": "Make", "labelType": "Rolls", "material": "Clear",
             "whiteInk": "vertical", "widthInches": 2, "heightInches": 1 }"#,
    )
    .expect("write config");

    let output = cli(tmp.path())
        .args([
            "legend",
            "--legends",
            tmp.path().to_string_lossy().as_ref(),
            config.to_string_lossy().as_ref(),
        ])
        .assert()
        .success()
        .get_output()
        .clone();

    let legend = stdout_json(&output);
    assert_eq!(legend["fileName"], "Rolls_Clear_WhiteVertical.ai");
    assert_eq!(legend["exists"], false);
}

#[test]
fn check_actions_lists_what_is_missing() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("actions.json"),
        r#"{ "Proofer Actions": {
               "Sheet Offset": [0.0625, -0.0625],
               "Roll Offset": [0.0625, -0.0625],
               "Die-Cut Offset": [0.0625, -0.0625, -0.125]
           } }"#,
    )
    .expect("write actions");

    let output = cli(tmp.path())
        .args(["check-actions", "--actions", "actions.json"])
        .assert()
        .failure()
        .code(3)
        .get_output()
        .clone();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing required actions:"));
    assert!(stderr.contains("Proofer Actions > Custom"));
    assert!(!stderr.contains("Sheet Offset"));

    cli(tmp.path()).arg("check-actions").assert().success();
}

#[test]
fn prefs_remember_the_upload_directory() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let uploads = tmp.path().join("uploads");
    fs::create_dir(&uploads).expect("uploads dir");
    fs::write(uploads.join("notes.txt"), b"not a template").expect("notes");
    fs::write(uploads.join("label.pdf"), b"%PDF").expect("template");

    let output = cli(tmp.path())
        .args([
            "prefs",
            "--set-default-dir",
            uploads.to_string_lossy().as_ref(),
        ])
        .assert()
        .success()
        .get_output()
        .clone();

    let prefs = stdout_json(&output);
    assert_eq!(prefs["defaultUploadDir"], &*uploads.to_string_lossy());
    assert_eq!(
        prefs["mostRecentTemplate"],
        &*uploads.join("label.pdf").to_string_lossy()
    );
    assert!(tmp.path().join("LabelProofPrefs.json").is_file());

    // A second run reads the saved file.
    let output = cli(tmp.path())
        .arg("prefs")
        .assert()
        .success()
        .get_output()
        .clone();
    assert_eq!(
        stdout_json(&output)["defaultUploadDir"],
        &*uploads.to_string_lossy()
    );
}
