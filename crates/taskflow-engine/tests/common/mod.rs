#![allow(dead_code)]

use rusqlite::Connection;
use taskflow_core::model::{NewUser, Role};
use taskflow_core_types::Sensitive;
use taskflow_engine::commands::users::create_user;
use tempfile::TempDir;

pub const PASSWORD: &str = "correct-horse-1";

pub fn setup_db() -> (TempDir, Connection) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let mut conn = Connection::open(&db_path).unwrap();
    taskflow_store::migrations::apply_migrations(&mut conn).unwrap();
    (temp_dir, conn)
}

pub fn seed_user(
    conn: &Connection,
    referenceid: &str,
    email: &str,
    role: Role,
    tsm: Option<&str>,
    manager: Option<&str>,
) {
    create_user(
        conn,
        NewUser {
            referenceid: Some(referenceid.to_string()),
            email: Some(email.to_string()),
            firstname: Some("Test".to_string()),
            lastname: Some(referenceid.to_string()),
            password: Some(Sensitive::new(PASSWORD.to_string())),
            role: Some(role),
            tsm: tsm.map(str::to_string),
            manager: manager.map(str::to_string),
            department: Some("Sales".to_string()),
            extra: None,
        },
    )
    .unwrap();
}
