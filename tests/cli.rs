use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A pharmabot command isolated in its own directory and database
fn pharmabot(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pharmabot").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("PHARMABOT_DATABASE", dir.path().join("data.db"))
        .env("NO_COLOR", "1")
        .env_remove("PHARMABOT_CONFIG")
        .env_remove("PHARMABOT_USER")
        .env_remove("PHARMABOT_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

fn register(dir: &TempDir, shop: &str, user: &str, password: &str) {
    pharmabot(dir)
        .args(["register", shop, user, "--password", password])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registration successful"));
}

fn ask(dir: &TempDir, user: &str, password: &str, text: &str) -> assert_cmd::assert::Assert {
    pharmabot(dir)
        .args(["ask", "--user", user, "--password", password, text])
        .assert()
}

#[test]
fn add_search_and_isolation() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");
    register(&dir, "Other Shop", "otheradmin", "password");

    ask(&dir, "testadmin", "password123", "Add 50 Paracetamol to Shelf A")
        .success()
        .stdout(predicate::str::contains(
            "✅ Updated Paracetamol at Shelf A. New Quantity: 50",
        ));

    ask(&dir, "testadmin", "password123", "Add 20 Paracetamol to Shelf A")
        .success()
        .stdout(predicate::str::contains("New Quantity: 70"));

    ask(&dir, "testadmin", "password123", "Where is paracetamol?")
        .success()
        .stdout(predicate::str::contains("Found 'paracetamol'"))
        .stdout(predicate::str::contains("70 units at *Shelf A*"));

    ask(&dir, "otheradmin", "password", "Where is Paracetamol?")
        .success()
        .stdout(predicate::str::contains("couldn't find"));
}

#[test]
fn duplicate_shop_is_rejected() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");

    pharmabot(&dir)
        .args(["register", "Test Shop", "someoneelse", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Shop name already exists"));
}

#[test]
fn wrong_password_is_refused() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");

    ask(&dir, "testadmin", "nope", "list")
        .failure()
        .stderr(predicate::str::contains("Invalid username or password"));
}

#[test]
fn unknown_text_gets_help() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");

    ask(&dir, "testadmin", "password123", "good morning")
        .success()
        .stdout(predicate::str::contains("I didn't understand that"));
}

#[test]
fn stock_accepts_negative_deltas() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");

    pharmabot(&dir)
        .env("PHARMABOT_USER", "testadmin")
        .env("PHARMABOT_PASSWORD", "password123")
        .args(["stock", "crocin", "box 1", "5", "--expiry", "2027-06-30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated Crocin at Box 1. New Quantity: 5"));

    pharmabot(&dir)
        .env("PHARMABOT_USER", "testadmin")
        .env("PHARMABOT_PASSWORD", "password123")
        .args(["stock", "Crocin", "Box 1", "-9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New Quantity: 0"));

    pharmabot(&dir)
        .env("PHARMABOT_USER", "testadmin")
        .env("PHARMABOT_PASSWORD", "password123")
        .args(["--format", "json", "inventory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"quantity\": 0"))
        .stdout(predicate::str::contains("2027-06-30"));
}

#[test]
fn chat_reads_lines_until_exit() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");

    pharmabot(&dir)
        .env("PHARMABOT_USER", "testadmin")
        .env("PHARMABOT_PASSWORD", "password123")
        .arg("chat")
        .write_stdin("add 5 crocin to box 1\n\nlist\nexit\nadd 1 aspirin to shelf a\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("New Quantity: 5"))
        .stdout(predicate::str::contains("Crocin"))
        .stdout(predicate::str::contains("Aspirin").not());
}

#[test]
fn stats_counts_one_shop() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");
    ask(&dir, "testadmin", "password123", "add 10 aspirin to shelf a").success();
    ask(&dir, "testadmin", "password123", "add 5 aspirin to shelf b").success();

    pharmabot(&dir)
        .args(["stats", "--user", "testadmin", "--password", "password123", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_units\": 15"))
        .stdout(predicate::str::contains("\"locations\": 2"));
}

#[test]
fn init_creates_app_dir() {
    let dir = TempDir::new().unwrap();

    pharmabot(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized pharmabot"));

    assert!(dir.path().join(".pharmabot").join("config.toml").exists());
    assert!(dir.path().join(".pharmabot").join("data.db").exists());

    pharmabot(&dir).arg("init").assert().failure();
}

#[test]
fn stats_report_shows_registration_date() {
    let dir = TempDir::new().unwrap();
    register(&dir, "Test Shop", "testadmin", "password123");

    pharmabot(&dir)
        .args(["stats", "--user", "testadmin", "--password", "password123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inventory Statistics: Test Shop"))
        .stdout(predicate::str::is_match(r"Registered:\s+\d{4}-\d{2}-\d{2} ").unwrap());
}
