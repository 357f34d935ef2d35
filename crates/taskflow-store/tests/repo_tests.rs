// Integration tests for SqliteRepo against an in-memory database

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;
use taskflow_core::errors::TfErrorKind;
use taskflow_core::model::{
    Account, AccountPatch, AccountStatus, Activity, ActivityStatus, History, QuotationNumber,
    Revision, Role, TaskLogStatus, Ticket, TicketStatus, User, UserStatus,
};
use taskflow_core::rules::scope::Scope;
use taskflow_core_types::Sensitive;
use taskflow_store::repo::now;
use taskflow_store::SqliteRepo;

fn setup_test_db() -> Connection {
    let mut conn = Connection::open_in_memory().expect("in-memory database");
    taskflow_store::migrations::apply_migrations(&mut conn).expect("migrations");
    conn
}

fn account(id: &str, owner: &str, name: &str) -> Account {
    let ts = now();
    Account {
        id: id.into(),
        account_reference_number: format!("ACC-{id}"),
        referenceid: owner.into(),
        tsm: Some("TSM-1".into()),
        manager: Some("MGR-1".into()),
        company_name: name.into(),
        contact_person: None,
        contact_number: None,
        email_address: None,
        address: None,
        region: None,
        industry: None,
        type_client: None,
        status: AccountStatus::Active,
        transfer_to: None,
        remarks: None,
        created_at: ts,
        updated_at: ts,
    }
}

fn user(referenceid: &str, email: &str, role: Role) -> User {
    let ts = now();
    User {
        id: format!("id-{referenceid}"),
        referenceid: referenceid.into(),
        email: email.into(),
        firstname: "Ana".into(),
        lastname: referenceid.into(),
        password_hash: Sensitive::new("$argon2id$placeholder".into()),
        role,
        tsm: Some("TSM-1".into()),
        manager: Some("MGR-1".into()),
        department: None,
        status: UserStatus::Active,
        login_attempts: 0,
        locked_until: None,
        extra: serde_json::json!({"contact_number": "0917"}),
        created_at: ts,
        updated_at: ts,
    }
}

fn history(activity: &str) -> History {
    let ts = now();
    History {
        id: 0,
        activity_reference_number: activity.into(),
        referenceid: "TSA-1".into(),
        type_activity: "Quotation Preparation".into(),
        call_status: None,
        quotation_number: Some("QT-0001".into()),
        quotation_amount: Some(1500.0),
        quotation_status: Some("Pending".into()),
        so_number: None,
        so_amount: None,
        remarks: None,
        created_at: ts,
        updated_at: ts,
    }
}

#[test]
fn test_account_round_trip_and_listing() {
    let conn = setup_test_db();
    let a = account("a1", "TSA-1", "Acme Corp");
    SqliteRepo::insert_account(&conn, &a).unwrap();
    SqliteRepo::insert_account(&conn, &account("a2", "TSA-2", "Other")).unwrap();

    assert_eq!(SqliteRepo::get_account(&conn, "a1").unwrap(), Some(a));
    let listed = SqliteRepo::list_accounts(&conn, "TSA-1", None).unwrap();
    assert_eq!(listed.len(), 1);

    assert_eq!(SqliteRepo::remove_account(&conn, "a1").unwrap(), 1);
    assert!(SqliteRepo::list_accounts(&conn, "TSA-1", None)
        .unwrap()
        .is_empty());
    let removed = SqliteRepo::list_accounts(&conn, "TSA-1", Some(AccountStatus::Removed)).unwrap();
    assert_eq!(removed.len(), 1);
}

#[test]
fn test_duplicate_reference_number_is_conflict() {
    let conn = setup_test_db();
    SqliteRepo::insert_account(&conn, &account("a1", "TSA-1", "Acme")).unwrap();
    let mut clash = account("a2", "TSA-1", "Acme Two");
    clash.account_reference_number = "ACC-a1".into();
    let err = SqliteRepo::insert_account(&conn, &clash).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::Conflict);
}

#[test]
fn test_update_account_zero_rows_for_unknown_id() {
    let conn = setup_test_db();
    let patch = AccountPatch {
        remarks: Some("x".into()),
        ..Default::default()
    };
    assert_eq!(SqliteRepo::update_account(&conn, "nope", &patch).unwrap(), 0);
}

#[test]
fn test_update_account_keeps_absent_fields() {
    let conn = setup_test_db();
    let mut a = account("a1", "TSA-1", "Acme");
    a.region = Some("NCR".into());
    SqliteRepo::insert_account(&conn, &a).unwrap();
    let patch = AccountPatch {
        industry: Some("Retail".into()),
        ..Default::default()
    };
    assert_eq!(SqliteRepo::update_account(&conn, "a1", &patch).unwrap(), 1);
    let stored = SqliteRepo::get_account(&conn, "a1").unwrap().unwrap();
    assert_eq!(stored.region.as_deref(), Some("NCR"));
    assert_eq!(stored.industry.as_deref(), Some("Retail"));
}

#[test]
fn test_duplicate_candidates_skip_removed() {
    let conn = setup_test_db();
    SqliteRepo::insert_account(&conn, &account("a1", "TSA-1", "ACME Trading")).unwrap();
    SqliteRepo::insert_account(&conn, &account("a2", "TSA-1", "Acme Foods")).unwrap();
    SqliteRepo::insert_account(&conn, &account("a3", "TSA-1", "Zenith")).unwrap();
    SqliteRepo::remove_account(&conn, "a2").unwrap();

    let found = SqliteRepo::find_duplicate_candidates(&conn, "acme").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "a1");
}

#[test]
fn test_duplicate_candidates_fold_non_ascii_case() {
    let conn = setup_test_db();
    SqliteRepo::insert_account(&conn, &account("a1", "TSA-1", "ÉCOLE Supply")).unwrap();

    let found = SqliteRepo::find_duplicate_candidates(&conn, "école").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "a1");
}

#[test]
fn test_transfer_lifecycle() {
    let conn = setup_test_db();
    SqliteRepo::insert_account(&conn, &account("a1", "TSA-1", "Acme")).unwrap();

    assert_eq!(SqliteRepo::mark_transfer_pending(&conn, "a1", "TSA-2").unwrap(), 1);
    assert_eq!(
        SqliteRepo::complete_transfer(&conn, "a1", Some("TSM-9"), None).unwrap(),
        1
    );
    let moved = SqliteRepo::get_account(&conn, "a1").unwrap().unwrap();
    assert_eq!(moved.referenceid, "TSA-2");
    assert_eq!(moved.tsm.as_deref(), Some("TSM-9"));
    assert_eq!(moved.status, AccountStatus::Active);
    assert_eq!(moved.transfer_to, None);

    // Nothing pending any more.
    assert_eq!(SqliteRepo::cancel_transfer(&conn, "a1").unwrap(), 0);
}

#[test]
fn test_activity_date_window_and_delete() {
    let conn = setup_test_db();
    let ts = now();
    for (n, day) in [(1, 1), (2, 15), (3, 28)] {
        SqliteRepo::insert_activity(
            &conn,
            &Activity {
                id: format!("act-{n}"),
                activity_reference_number: format!("ACT-{n}"),
                account_reference_number: "ACC-a1".into(),
                referenceid: "TSA-1".into(),
                tsm: None,
                manager: None,
                company_name: "Acme".into(),
                type_client: None,
                status: ActivityStatus::Scheduled,
                scheduled_date: NaiveDate::from_ymd_opt(2024, 2, day),
                remarks: None,
                created_at: ts,
                updated_at: ts,
            },
        )
        .unwrap();
    }

    let window = SqliteRepo::list_activities(
        &conn,
        "TSA-1",
        NaiveDate::from_ymd_opt(2024, 2, 10),
        NaiveDate::from_ymd_opt(2024, 2, 28),
    )
    .unwrap();
    let refs: Vec<_> = window.iter().map(|a| a.activity_reference_number.as_str()).collect();
    assert_eq!(refs, vec!["ACT-3", "ACT-2"]);

    assert_eq!(
        SqliteRepo::update_activity_status(&conn, "ACT-1", ActivityStatus::Completed).unwrap(),
        1
    );
    assert_eq!(SqliteRepo::delete_activity(&conn, "ACT-1").unwrap(), 1);
    assert_eq!(SqliteRepo::delete_activity(&conn, "ACT-1").unwrap(), 0);
}

#[test]
fn test_history_and_revisions() {
    let conn = setup_test_db();
    let id = SqliteRepo::insert_history(&conn, &history("ACT-1")).unwrap();
    let stored = SqliteRepo::get_history(&conn, id).unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(SqliteRepo::count_revisions(&conn, "ACT-1").unwrap(), 0);

    let revision = Revision {
        id: 0,
        history_id: id,
        activity_reference_number: "ACT-1".into(),
        revision_label: "Revised-Quotation-001-QT-0001".into(),
        quotation_number: stored.quotation_number.clone(),
        quotation_amount: stored.quotation_amount,
        quotation_status: stored.quotation_status.clone(),
        remarks: None,
        revised_by: Some("TSA-1".into()),
        created_at: now(),
    };
    SqliteRepo::insert_revision(&conn, &revision).unwrap();
    assert_eq!(SqliteRepo::count_revisions(&conn, "ACT-1").unwrap(), 1);

    let err = SqliteRepo::insert_revision(&conn, &revision).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::Conflict);

    let mut next = stored.clone();
    next.quotation_amount = Some(999.0);
    assert_eq!(SqliteRepo::update_quotation_fields(&conn, &next).unwrap(), 1);
    next.id = 4242;
    assert_eq!(SqliteRepo::update_quotation_fields(&conn, &next).unwrap(), 0);
}

#[test]
fn test_quotation_number_reserve_once() {
    let conn = setup_test_db();
    assert_eq!(SqliteRepo::next_quotation_sequence(&conn, "QT").unwrap(), 1);
    SqliteRepo::insert_quotation_number(
        &conn,
        &QuotationNumber {
            quotation_number: "QT-0001".into(),
            prefix: "QT".into(),
            sequence: 1,
            reserved: false,
            reserved_by: None,
            reserved_at: None,
            created_at: now(),
        },
    )
    .unwrap();
    assert_eq!(SqliteRepo::next_quotation_sequence(&conn, "QT").unwrap(), 2);

    assert_eq!(
        SqliteRepo::reserve_quotation_number(&conn, "QT-0001", "TSA-1", now()).unwrap(),
        1
    );
    assert_eq!(
        SqliteRepo::reserve_quotation_number(&conn, "QT-0001", "TSA-2", now()).unwrap(),
        0
    );
    let stored = SqliteRepo::get_quotation_number(&conn, "QT-0001")
        .unwrap()
        .unwrap();
    assert!(stored.reserved);
    assert_eq!(stored.reserved_by.as_deref(), Some("TSA-1"));
}

#[test]
fn test_ticket_status_is_conditional() {
    let conn = setup_test_db();
    let ts = now();
    SqliteRepo::insert_ticket(
        &conn,
        &Ticket {
            id: "t1".into(),
            ticket_reference_number: "TKT-1".into(),
            company_name: "Acme".into(),
            contact_person: None,
            contact_number: None,
            concern: "Pricing".into(),
            endorsed_by: "CSR-1".into(),
            referenceid: "TSA-1".into(),
            tsm: Some("TSM-1".into()),
            status: TicketStatus::Endorsed,
            remarks: None,
            created_at: ts,
            updated_at: ts,
        },
    )
    .unwrap();

    let moved = SqliteRepo::update_ticket_status(
        &conn,
        "TKT-1",
        TicketStatus::Endorsed,
        TicketStatus::Received,
        None,
    )
    .unwrap();
    assert_eq!(moved, 1);
    let stale = SqliteRepo::update_ticket_status(
        &conn,
        "TKT-1",
        TicketStatus::Endorsed,
        TicketStatus::Closed,
        None,
    )
    .unwrap();
    assert_eq!(stale, 0);

    let counts = SqliteRepo::count_tickets_by_status(&conn, &Scope::Tsm("TSM-1".into())).unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].status, "Received");
}

#[test]
fn test_user_lookup_and_lock_state() {
    let conn = setup_test_db();
    let u = user("TSA-1", "ana@example.com", Role::Tsa);
    SqliteRepo::insert_user(&conn, &u).unwrap();

    let by_email = SqliteRepo::get_user_by_email(&conn, "ANA@example.com")
        .unwrap()
        .unwrap();
    assert_eq!(by_email.referenceid, "TSA-1");
    assert_eq!(by_email.extra["contact_number"], "0917");
    assert!(SqliteRepo::email_exists(&conn, "Ana@Example.com").unwrap());

    let until = now() + Duration::minutes(15);
    SqliteRepo::lock_user(&conn, &u.id, 5, until).unwrap();
    let locked = SqliteRepo::get_user(&conn, "TSA-1").unwrap().unwrap();
    assert_eq!(locked.status, UserStatus::Locked);
    assert_eq!(locked.login_attempts, 5);
    assert_eq!(locked.locked_until, Some(until));

    SqliteRepo::reset_login_state(&conn, &u.id).unwrap();
    let open = SqliteRepo::get_user(&conn, "TSA-1").unwrap().unwrap();
    assert_eq!(open.status, UserStatus::Active);
    assert_eq!(open.login_attempts, 0);
    assert_eq!(open.locked_until, None);
}

#[test]
fn test_list_users_by_scope() {
    let conn = setup_test_db();
    SqliteRepo::insert_user(&conn, &user("TSA-1", "a@example.com", Role::Tsa)).unwrap();
    SqliteRepo::insert_user(&conn, &user("TSA-2", "b@example.com", Role::Tsa)).unwrap();
    let mut outsider = user("TSA-3", "c@example.com", Role::Tsa);
    outsider.tsm = Some("TSM-2".into());
    SqliteRepo::insert_user(&conn, &outsider).unwrap();

    assert_eq!(
        SqliteRepo::list_users(&conn, &Scope::Tsm("TSM-1".into()))
            .unwrap()
            .len(),
        2
    );
    assert_eq!(SqliteRepo::list_users(&conn, &Scope::All).unwrap().len(), 3);
}

#[test]
fn test_task_logs_alerts_and_resets() {
    let conn = setup_test_db();
    SqliteRepo::insert_task_log(&conn, "TSA-1", "a@example.com", TaskLogStatus::Login, now())
        .unwrap();
    SqliteRepo::insert_task_log(&conn, "TSA-1", "a@example.com", TaskLogStatus::Logout, now())
        .unwrap();
    let logs = SqliteRepo::list_task_logs(&conn, "TSA-1", 10).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].status, TaskLogStatus::Logout);

    SqliteRepo::insert_security_alert(
        &conn,
        "a@example.com",
        Some("TSA-1"),
        "account_locked",
        "locked",
        now(),
    )
    .unwrap();
    assert_eq!(
        SqliteRepo::list_security_alerts(&conn, "A@example.com")
            .unwrap()
            .len(),
        1
    );

    let id = SqliteRepo::insert_password_reset(
        &conn,
        "a@example.com",
        "digest",
        now() + Duration::minutes(60),
        now(),
    )
    .unwrap();
    let reset = SqliteRepo::get_password_reset(&conn, "digest").unwrap().unwrap();
    assert!(!reset.used);
    assert_eq!(SqliteRepo::mark_password_reset_used(&conn, id).unwrap(), 1);
    assert_eq!(SqliteRepo::mark_password_reset_used(&conn, id).unwrap(), 0);
}
