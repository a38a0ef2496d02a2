use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn ftt(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ftt").unwrap();
    cmd.env("FTT_DATA_DIR", dir.path())
        .env_remove("FTT_LOG")
        .env_remove("FTT_PASSWORD")
        .current_dir(dir.path());
    cmd
}

fn initialized(sample: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut cmd = ftt(&dir);
    cmd.arg("init");
    if sample {
        cmd.arg("--sample");
    }
    cmd.assert().success().stdout(contains("Initialized budget"));
    dir
}

#[test]
fn init_twice_keeps_existing_budget() {
    let dir = initialized(true);
    assert!(dir.path().join("config.json").exists());

    ftt(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("A budget already exists"));

    ftt(&dir)
        .args(["income", "list"])
        .assert()
        .success()
        .stdout(contains("My Paycheck").and(contains("₹7,50,000.00")));
}

#[test]
fn summary_shows_targets_and_compliance() {
    let dir = initialized(true);

    ftt(&dir)
        .arg("summary")
        .assert()
        .success()
        .stdout(
            contains("50/30/20 Summary")
                .and(contains("Compliance"))
                .and(contains("Health score")),
        );
}

#[test]
fn line_items_add_edit_remove() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["wants", "add", "Concerts", "--budget", "1500"])
        .assert()
        .success()
        .stdout(contains("Added wants line #10: Concerts"));

    ftt(&dir)
        .args(["wants", "set", "concerts", "--actual", "1,200.50"])
        .assert()
        .success()
        .stdout(contains("Updated wants line #10"));

    ftt(&dir)
        .args(["wants", "list"])
        .assert()
        .success()
        .stdout(contains("Concerts").and(contains("₹1,200.50")));

    ftt(&dir)
        .args(["wants", "remove", "10"])
        .assert()
        .success()
        .stdout(contains("Removed wants line: Concerts"));

    ftt(&dir)
        .args(["wants", "remove", "Concerts"])
        .assert()
        .failure()
        .stderr(contains("Line item not found"));
}

#[test]
fn payday_rejected_outside_income() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["needs", "add", "Gym", "--payday", "2025-02-01"])
        .assert()
        .failure()
        .stderr(contains("Only income lines have a payday"));
}

#[test]
fn transactions_and_day_summary() {
    let dir = initialized(false);

    ftt(&dir)
        .args([
            "txn", "add", "income", "5000", "Invoice", "-c", "freelance", "-d", "2025-02-14", "-t",
            "09:00",
        ])
        .assert()
        .success();
    ftt(&dir)
        .args([
            "txn",
            "add",
            "expense",
            "250",
            "Lunch",
            "-c",
            "Food & Dining",
            "-d",
            "2025-02-14",
            "-t",
            "13:00",
        ])
        .assert()
        .success()
        .stdout(contains("Recorded txn-"));

    ftt(&dir)
        .args(["txn", "day", "2025-02-14"])
        .assert()
        .success()
        .stdout(
            contains("Lunch")
                .and(contains("-₹250.00"))
                .and(contains("₹4,750.00")),
        );

    ftt(&dir)
        .args(["txn", "add", "expense", "10", "Oops", "-c", "salary"])
        .assert()
        .failure();
}

#[test]
fn goal_progress() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["goal", "add", "Laptop", "80000", "--deadline", "2030-01-01", "-p", "high"])
        .assert()
        .success()
        .stdout(contains("Created goal goal-"));

    ftt(&dir)
        .args(["goal", "progress", "laptop", "20000"])
        .assert()
        .success()
        .stdout(contains("(25%)"));

    ftt(&dir)
        .args(["goal", "list"])
        .assert()
        .success()
        .stdout(contains("Laptop (Other)").and(contains("High")));
}

#[test]
fn exports_write_files() {
    let dir = initialized(true);
    let json = dir.path().join("out.json");
    let html = dir.path().join("report.html");

    ftt(&dir)
        .args(["export", "json"])
        .arg(&json)
        .arg("--pretty")
        .assert()
        .success();
    let contents = std::fs::read_to_string(&json).unwrap();
    assert!(contents.contains("\"schema_version\""));
    assert!(contents.contains("Groceries"));

    ftt(&dir).args(["export", "html"]).arg(&html).assert().success();
    assert!(std::fs::read_to_string(&html).unwrap().contains("Needs (50%)"));
}

#[test]
fn reset_requires_confirmation() {
    let dir = initialized(true);

    ftt(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(contains("--yes"));

    ftt(&dir).args(["reset", "--yes"]).assert().success();
    ftt(&dir)
        .args(["income", "list"])
        .assert()
        .success()
        .stdout(contains("₹7,50,000.00").not());
}

#[test]
fn streak_check_in_once_per_day() {
    let dir = initialized(true);

    ftt(&dir)
        .args(["streak", "--check-in"])
        .assert()
        .success()
        .stdout(contains("Current streak:"));

    ftt(&dir)
        .args(["streak", "--check-in"])
        .assert()
        .success()
        .stdout(contains("Today is already recorded."));
}

#[test]
fn on_budget_check_in_records_a_good_day() {
    let dir = initialized(false);

    for (bucket, amount) in [
        ("income", "100000"),
        ("needs", "50000"),
        ("wants", "30000"),
        ("savings", "20000"),
    ] {
        ftt(&dir)
            .args([bucket, "set", "1", "--actual", amount])
            .assert()
            .success();
    }

    ftt(&dir)
        .args(["streak", "--check-in"])
        .assert()
        .success()
        .stdout(
            contains("On budget today. Streak is now 1 day(s).")
                .and(contains("Last 1 day(s): ●")),
        );

    let state: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("state.json")).unwrap())
            .unwrap();
    assert_eq!(state["streak"]["history"], serde_json::json!([true]));
    assert_eq!(state["streak"]["current"], 1);
    assert_eq!(state["streak"]["longest"], 1);
}

#[test]
fn malformed_amounts_are_rejected_cleanly() {
    let dir = initialized(false);

    for amount in ["1.5é", "100000000000000000", "abc10"] {
        ftt(&dir)
            .args(["needs", "add", "Phone", "--actual", amount])
            .assert()
            .code(2)
            .stderr(contains("panicked").not());
    }

    ftt(&dir)
        .args(["needs", "add", "Phone", "--actual", "₹-10"])
        .assert()
        .failure()
        .stderr(contains("cannot be negative"));
}

#[test]
fn achievements_and_suggestions() {
    let dir = initialized(true);

    ftt(&dir)
        .arg("achievements")
        .assert()
        .success()
        .stdout(contains("[✓] Budget Rookie"));

    ftt(&dir).arg("suggest").assert().success().stdout(contains("Debt"));
}

#[test]
fn onboarding_skip_is_recorded() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["onboarding", "--skip"])
        .assert()
        .success()
        .stdout(contains("Onboarding skipped."));

    ftt(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("Onboarding done:    true"));
}

#[test]
fn history_lists_changes() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["needs", "add", "Gym"])
        .assert()
        .success();

    ftt(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("CREATE LineItem needs#10 (Gym)"));
}

#[test]
fn sign_in_switches_to_account_store() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["wants", "add", "Concerts", "--actual", "900"])
        .assert()
        .success();

    ftt(&dir)
        .args(["auth", "signup", "--email", "asha@example.com", "--name", "Asha"])
        .env("FTT_PASSWORD", "hunter22")
        .assert()
        .success()
        .stdout(contains("Account created"));

    ftt(&dir)
        .args(["auth", "signin", "--email", "asha@example.com"])
        .env("FTT_PASSWORD", "hunter22")
        .assert()
        .success()
        .stdout(contains("Signed in as asha@example.com"));

    ftt(&dir)
        .args(["wants", "list"])
        .assert()
        .success()
        .stdout(contains("Concerts"));

    ftt(&dir)
        .args(["auth", "status"])
        .assert()
        .success()
        .stdout(contains("Signed in as asha@example.com"));

    ftt(&dir)
        .args(["auth", "signout"])
        .assert()
        .success()
        .stdout(contains("Signed out."));
}

#[test]
fn bad_credentials_get_friendly_message() {
    let dir = initialized(false);

    ftt(&dir)
        .args(["auth", "signin", "--email", "not-an-email"])
        .env("FTT_PASSWORD", "whatever")
        .assert()
        .failure()
        .stderr(contains("Please enter a valid email address"));
}
