// Integration tests for the migration framework

use rusqlite::Connection;
use taskflow_core::errors::TfErrorKind;
use taskflow_store::migrations::{apply_migrations, current_version};

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    let mut conn = setup_test_db();

    let result = apply_migrations(&mut conn);
    assert!(result.is_ok(), "Migrations should succeed: {:?}", result.err());

    let tables = get_table_names(&conn);
    for expected in [
        "schema_version",
        "accounts",
        "activity",
        "history",
        "revised_quotations",
        "quotation_numbers",
        "endorsed_tickets",
        "users",
        "task_logs",
        "security_alerts",
        "password_resets",
    ] {
        assert!(
            tables.contains(&expected.to_string()),
            "Missing table: {}",
            expected
        );
    }
}

#[test]
fn test_reapplying_is_a_no_op() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();
    apply_migrations(&mut conn).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        current_version(&conn).unwrap().as_deref(),
        Some("001_initial_schema")
    );
}

#[test]
fn test_edited_migration_is_rejected() {
    let mut conn = setup_test_db();
    apply_migrations(&mut conn).unwrap();

    conn.execute(
        "UPDATE schema_version SET checksum = 'tampered' WHERE migration_id = '001_initial_schema'",
        [],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::Persistence);
    assert!(err.message().contains("Checksum mismatch"));
}

#[test]
fn test_on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskflow.db");
    {
        let mut conn = taskflow_store::db::open(&path).unwrap();
        taskflow_store::db::configure(&conn).unwrap();
        apply_migrations(&mut conn).unwrap();
    }
    let conn = taskflow_store::db::open(&path).unwrap();
    assert!(current_version(&conn).unwrap().is_some());
}
