use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const INVESTMENT_HEADER: &str = "!Account\nNGSU\nTInvst\n^\n!Type:Invst\n";
const CASH_HEADER: &str = "!Account\nNPayroll\nTBank\n^\n!Type:Bank\n";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../gsulib/tests/fixtures")
        .join(name)
}

fn gsu(input: &Path, dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gsu").unwrap();
    cmd.env_remove("GSU_LAYOUT")
        .env_remove("GSU_CONFIG")
        .arg("-i")
        .arg(input)
        .arg("--investment-qif")
        .arg(dir.join("investment.qif"))
        .arg("--cash-qif")
        .arg(dir.join("cash.qif"));
    cmd
}

/// Тело файла после заголовка делится на две одинаковые половины.
fn assert_two_identical_groups(text: &str, header: &str) {
    let body = text.strip_prefix(header).expect("header first");
    assert!(!body.contains("!Account"), "header written twice");
    let (first, second) = body.split_at(body.len() / 2);
    assert_eq!(first, second);
}

#[test]
fn second_run_appends_without_second_header() {
    let dir = tempfile::tempdir().unwrap();
    for _ in 0..2 {
        gsu(&fixture("original.txt"), dir.path()).assert().success();
    }

    let invst = fs::read_to_string(dir.path().join("investment.qif")).unwrap();
    assert_two_identical_groups(&invst, INVESTMENT_HEADER);
    assert_eq!(invst.lines().filter(|l| *l == "NBuy").count(), 2);
    assert_eq!(invst.lines().filter(|l| *l == "NSell").count(), 2);
    assert!(invst.lines().filter(|l| l.starts_with('I')).all(|l| l == "I536.09"));

    let cash = fs::read_to_string(dir.path().join("cash.qif")).unwrap();
    assert_two_identical_groups(&cash, CASH_HEADER);
    assert_eq!(cash.lines().filter(|l| *l == "T9453.40").count(), 2);
    assert_eq!(cash.lines().filter(|l| l.starts_with('S')).count(), 10);
}

#[test]
fn reconciliation_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let text = fs::read_to_string(fixture("original.txt"))
        .unwrap()
        .replace("\n17\n", "\n18\n");
    let input = dir.path().join("bad.txt");
    fs::write(&input, text).unwrap();

    gsu(&input, dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("identity 2"));

    assert!(!dir.path().join("investment.qif").exists());
    assert!(!dir.path().join("cash.qif").exists());
}

#[test]
fn parse_failure_names_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let text = fs::read_to_string(fixture("original.txt"))
        .unwrap()
        .replace("Award ID:", "Award Id:");
    let input = dir.path().join("bad.txt");
    fs::write(&input, text).unwrap();

    gsu(&input, dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 11").and(predicate::str::contains("[Award Id:]")));
    assert!(!dir.path().join("investment.qif").exists());
}

#[test]
fn layout_flag_selects_statement_family() {
    let dir = tempfile::tempdir().unwrap();
    gsu(&fixture("post2016.txt"), dir.path())
        .args(["--layout", "post2016"])
        .assert()
        .success();
    let invst = fs::read_to_string(dir.path().join("investment.qif")).unwrap();
    assert!(invst.contains("NBuy\nYGoogle Inc Class C\nI771.41\nQ42\nT32399.22\n"));

    gsu(&fixture("original.txt"), dir.path())
        .args(["--layout", "alt-summary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("layout alt-summary is not supported"));
}

#[test]
fn config_file_renames_accounts() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("gsu.yaml");
    fs::write(&config, "cash_account: Checking\ninvestment_account: Brokerage\n").unwrap();

    gsu(&fixture("rated_taxes.txt"), dir.path())
        .args(["--layout", "rated-taxes", "--config"])
        .arg(&config)
        .assert()
        .success();

    let cash = fs::read_to_string(dir.path().join("cash.qif")).unwrap();
    assert!(cash.starts_with("!Account\nNChecking\nTBank\n"));
    let invst = fs::read_to_string(dir.path().join("investment.qif")).unwrap();
    assert!(invst.starts_with("!Account\nNBrokerage\nTInvst\n"));
    assert!(invst.contains("YGoogle Inc Class A\n"));
}

#[test]
fn dry_run_prints_release_only() {
    let dir = tempfile::tempdir().unwrap();
    gsu(&fixture("original.txt"), dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("ticker: GOOG").and(predicate::str::contains("award_id: C123456")));

    assert!(!dir.path().join("investment.qif").exists());
    assert!(!dir.path().join("cash.qif").exists());
}

#[test]
fn unopenable_cash_file_leaves_no_investment_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("gsu").unwrap();
    cmd.env_remove("GSU_LAYOUT")
        .env_remove("GSU_CONFIG")
        .arg("-i")
        .arg(fixture("original.txt"))
        .arg("--investment-qif")
        .arg(dir.path().join("investment.qif"))
        .arg("--cash-qif")
        .arg(dir.path().join("missing_dir").join("cash.qif"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("gsu: I/O error"));

    assert!(!dir.path().join("investment.qif").exists());
}

#[test]
fn unopenable_cash_file_keeps_existing_investment_file_intact() {
    let dir = tempfile::tempdir().unwrap();
    gsu(&fixture("original.txt"), dir.path()).assert().success();
    let before = fs::read_to_string(dir.path().join("investment.qif")).unwrap();

    let mut cmd = Command::cargo_bin("gsu").unwrap();
    cmd.env_remove("GSU_LAYOUT")
        .env_remove("GSU_CONFIG")
        .arg("-i")
        .arg(fixture("original.txt"))
        .arg("--investment-qif")
        .arg(dir.path().join("investment.qif"))
        .arg("--cash-qif")
        .arg(dir.path().join("missing_dir").join("cash.qif"))
        .assert()
        .failure();

    let after = fs::read_to_string(dir.path().join("investment.qif")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn piped_stderr_has_no_colour_codes() {
    let dir = tempfile::tempdir().unwrap();
    gsu(&fixture("original.txt"), dir.path())
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains("transactions appended").and(predicate::str::contains("\x1b[").not()));
}
