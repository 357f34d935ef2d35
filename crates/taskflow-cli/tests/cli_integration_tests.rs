//! CLI integration tests
//!
//! Run the built binary against a temporary database and check the rows it
//! leaves behind.

use rusqlite::Connection;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_taskflow"))
        .current_dir(temp_dir.path())
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_migrate_creates_schema() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("data/taskflow.db");

    let output = run(&temp_dir, &["migrate", "--db", db.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("001_initial_schema"));

    // Re-running is a no-op
    let again = run(&temp_dir, &["migrate", "--db", db.to_str().unwrap()]);
    assert!(again.status.success());

    // The file is left in WAL mode so the server and the CLI can share it
    let conn = Connection::open(&db).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode, "wal");
}

#[test]
fn test_user_create_stores_hashed_password() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("taskflow.db");
    let db = db.to_str().unwrap();

    let output = run(
        &temp_dir,
        &[
            "user", "create", "--db", db, "--referenceid", "ADM-1", "--email",
            "Admin@Example.com", "--password", "bootstrap-pass-1", "--role", "admin",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let conn = Connection::open(db).unwrap();
    let (email, role, hash): (String, String, String) = conn
        .query_row(
            "SELECT email, role, password_hash FROM users WHERE referenceid = 'ADM-1'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(email, "admin@example.com");
    assert_eq!(role, "Admin");
    assert!(hash.starts_with("$argon2"));

    // Same e-mail again is refused
    let dup = run(
        &temp_dir,
        &[
            "user", "create", "--db", db, "--referenceid", "ADM-2", "--email",
            "admin@example.com", "--password", "bootstrap-pass-1", "--role", "admin",
        ],
    );
    assert!(!dup.status.success());
}

#[test]
fn test_user_create_rejects_unknown_role() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("taskflow.db");
    let output = run(
        &temp_dir,
        &[
            "user", "create", "--db", db.to_str().unwrap(), "--referenceid", "X-1",
            "--email", "x@example.com", "--password", "bootstrap-pass-1", "--role", "intern",
        ],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("intern"));
}

#[test]
fn test_accounts_import_is_all_or_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db = temp_dir.path().join("taskflow.db");
    let db = db.to_str().unwrap();

    let good = temp_dir.path().join("good.json");
    std::fs::write(
        &good,
        serde_json::json!([
            { "referenceid": "TSA-1", "company_name": "Acme" },
            { "referenceid": "TSA-1", "company_name": "Bravo", "region": "NCR" }
        ])
        .to_string(),
    )
    .unwrap();
    let output = run(&temp_dir, &["accounts", "import", "--db", db, good.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let bad = temp_dir.path().join("bad.json");
    std::fs::write(
        &bad,
        serde_json::json!([
            { "referenceid": "TSA-2", "company_name": "Charlie" },
            { "referenceid": "TSA-2" }
        ])
        .to_string(),
    )
    .unwrap();
    let output = run(&temp_dir, &["accounts", "import", "--db", db, bad.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("row 2"));

    let conn = Connection::open(db).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}
