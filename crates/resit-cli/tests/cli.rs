use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const BANK_AT_AM: &str = "BANK@AM\nFund Transfer\nReference No. AB12345\n15 Oct 2024 05:03 pm\nRM 123.45\n";

/// A `resit` command isolated from the user's configuration.
fn resit(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("resit").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("OCR_SPACE_API_KEY");
    cmd
}

#[test]
fn extract_prints_json_fields() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("receipt.txt");
    fs::write(&input, BANK_AT_AM).unwrap();

    resit(&home)
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""reference_id": "AB12345""#))
        .stdout(predicate::str::contains(r#""date": "2024-10-15""#))
        .stdout(predicate::str::contains(r#""amount": "123.45""#))
        .stdout(predicate::str::contains(r#""transaction_type": "Transfer""#));
}

#[test]
fn extract_reads_stdin_as_csv() {
    let home = TempDir::new().unwrap();

    resit(&home)
        .args(["extract", "-", "--format", "csv"])
        .write_stdin(BANK_AT_AM)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "vendor,reference_id,date,amount,transaction_type",
        ))
        .stdout(predicate::str::contains("bank_at_am,AB12345,2024-10-15,123.45,Transfer"));
}

#[test]
fn extract_explain_shows_rules() {
    let home = TempDir::new().unwrap();

    resit(&home)
        .args(["extract", "-", "--format", "text", "--explain"])
        .write_stdin("Total RM 9.90")
        .assert()
        .success()
        .stdout(predicate::str::contains("amount.rm_prefix"))
        .stdout(predicate::str::contains("could not extract reference_id"));
}

#[test]
fn extract_missing_file_fails() {
    let home = TempDir::new().unwrap();

    resit(&home)
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let home = TempDir::new().unwrap();
    let inputs = home.path().join("in");
    let outputs = home.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), BANK_AT_AM).unwrap();
    fs::write(inputs.join("b.txt"), "nothing to see").unwrap();
    fs::write(inputs.join("c.md"), BANK_AT_AM).unwrap();

    let pattern = format!("{}/*.txt", inputs.display());
    resit(&home)
        .args(["batch", &pattern, "--summary", "--output-dir"])
        .arg(&outputs)
        .assert()
        .success();

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());
    assert!(!outputs.join("c.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.contains("a.txt,complete,bank_at_am,AB12345,2024-10-15,123.45,Transfer"));
    assert!(summary.contains("b.txt,partial,unknown"));
}

#[test]
fn batch_without_matches_fails() {
    let home = TempDir::new().unwrap();
    let pattern = format!("{}/*.txt", home.path().display());

    resit(&home)
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

fn confirm_args<'a>(date: &'a str, today: &'a str) -> Vec<&'a str> {
    vec![
        "confirm",
        "--reference",
        "AB12345",
        "--date",
        date,
        "--amount",
        "123.45",
        "--image-url",
        "https://example.test/r.jpg",
        "--today",
        today,
        "--counts",
    ]
}

#[test]
fn confirm_updates_counts_file() {
    let home = TempDir::new().unwrap();
    let counts = home.path().join("counts.json");

    resit(&home)
        .args(confirm_args("2024-11-18", "2024-11-18"))
        .arg(&counts)
        .assert()
        .success()
        .stdout(predicate::str::contains("week 2, month 11"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&counts).unwrap()).unwrap();
    assert_eq!(json["week_counts"][1], 1);
    assert_eq!(json["month_counts"]["11"], 1);
    assert_eq!(json["total_count"], 1);
}

#[test]
fn confirm_refuses_repeated_reference() {
    let home = TempDir::new().unwrap();
    let counts = home.path().join("counts.json");

    resit(&home)
        .args(confirm_args("2024-11-18", "2024-11-18"))
        .arg(&counts)
        .assert()
        .success();

    resit(&home)
        .args(confirm_args("2024-11-18", "2024-11-18"))
        .arg(&counts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already confirmed"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&counts).unwrap()).unwrap();
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["confirmed"][0], "AB12345");
}

#[test]
fn confirm_rejects_invalid_image_url() {
    let home = TempDir::new().unwrap();
    let counts = home.path().join("counts.json");
    let mut args = confirm_args("2024-11-18", "2024-11-18");
    args[8] = "not a url";

    resit(&home)
        .args(args)
        .arg(&counts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid URL"));

    assert!(!counts.exists());
}

#[test]
fn confirm_rejects_past_week_without_writing() {
    let home = TempDir::new().unwrap();
    let counts = home.path().join("counts.json");

    resit(&home)
        .args(confirm_args("2024-11-12", "2024-11-20"))
        .arg(&counts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("past weeks"));

    assert!(!counts.exists());
}

#[test]
fn confirm_rejects_future_date() {
    let home = TempDir::new().unwrap();
    let counts = home.path().join("counts.json");

    resit(&home)
        .args(confirm_args("2024-11-21", "2024-11-20"))
        .arg(&counts)
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be between"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();

    resit(&home)
        .args(["config", "set", "campaign.max_weeks", "6"])
        .assert()
        .success();

    resit(&home)
        .args(["config", "get", "campaign.max_weeks"])
        .assert()
        .success()
        .stdout(predicate::str::diff("6\n"));
}

#[test]
fn config_set_unknown_key_fails() {
    let home = TempDir::new().unwrap();

    resit(&home)
        .args(["config", "set", "campaign.nope", "1"])
        .assert()
        .failure();
}

#[test]
fn scan_requires_api_key() {
    let home = TempDir::new().unwrap();
    let image = home.path().join("receipt.png");
    fs::write(&image, b"\x89PNG\r\n\x1a\n").unwrap();

    resit(&home)
        .arg("scan")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No OCR.space API key"));
}
