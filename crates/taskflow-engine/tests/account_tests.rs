// Integration tests for account operations and the account-list cache.

mod common;

use std::time::Duration;

use common::{seed_user, setup_db};
use taskflow_core::errors::TfErrorKind;
use taskflow_core::logging_facility::init_test_capture;
use taskflow_core::model::{AccountPatch, AccountStatus, NewAccount, Role};
use taskflow_core::taskflow_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use taskflow_engine::commands::accounts::{
    approve_transfer, bulk_remove_accounts, check_duplicate, create_account, get_account,
    list_accounts, request_transfer, update_account,
};
use taskflow_store::cache::{keys, Cache, MemoryCache};

const TTL: Duration = Duration::from_secs(60);

fn new_account(owner: &str, name: &str) -> NewAccount {
    NewAccount {
        referenceid: Some(owner.to_string()),
        tsm: Some("TSM-1".to_string()),
        manager: Some("MGR-1".to_string()),
        company_name: Some(name.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_missing_referenceid_is_rejected() {
    let (_tmp, conn) = setup_db();
    let cache = MemoryCache::new();
    for blank in [None, Some(""), Some("   ")] {
        let err = list_accounts(&conn, &cache, TTL, blank, None).unwrap_err();
        assert_eq!(err.kind(), TfErrorKind::MissingField);
        assert_eq!(err.field(), Some("referenceid"));
    }
}

#[test]
fn test_list_is_cached_and_writes_evict() {
    let (_tmp, conn) = setup_db();
    let cache = MemoryCache::new();
    create_account(&conn, &cache, new_account("TSA-1", "Acme")).unwrap();

    let first = list_accounts(&conn, &cache, TTL, Some("TSA-1"), None).unwrap();
    assert_eq!(first.len(), 1);
    assert!(cache.get(&keys::accounts("TSA-1", None)).unwrap().is_some());

    create_account(&conn, &cache, new_account("TSA-1", "Bravo")).unwrap();
    assert!(cache.get(&keys::accounts("TSA-1", None)).unwrap().is_none());
    let second = list_accounts(&conn, &cache, TTL, Some("TSA-1"), None).unwrap();
    assert_eq!(second.len(), 2);
}

#[test]
fn test_status_filter_must_be_known() {
    let (_tmp, conn) = setup_db();
    let err = list_accounts(&conn, &MemoryCache::new(), TTL, Some("TSA-1"), Some("Archived"))
        .unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::InvalidInput);
}

#[test]
fn test_update_unknown_account_is_not_found() {
    let (_tmp, conn) = setup_db();
    let patch = AccountPatch {
        remarks: Some("follow up".to_string()),
        ..Default::default()
    };
    let err = update_account(&conn, &MemoryCache::new(), "missing", patch).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::NotFound);
}

#[test]
fn test_update_applies_patch() {
    let (_tmp, conn) = setup_db();
    let cache = MemoryCache::new();
    let created = create_account(&conn, &cache, new_account("TSA-1", "Acme")).unwrap();
    let updated = update_account(
        &conn,
        &cache,
        &created.id,
        AccountPatch {
            status: Some(AccountStatus::Inactive),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.status, AccountStatus::Inactive);
    assert_eq!(updated.company_name, "Acme");
    assert_eq!(get_account(&conn, &created.id).unwrap(), updated);
}

#[test]
fn test_bulk_remove_skips_unknown_ids() {
    let (_tmp, mut conn) = setup_db();
    let cache = MemoryCache::new();
    let a = create_account(&conn, &cache, new_account("TSA-1", "Acme")).unwrap();
    let b = create_account(&conn, &cache, new_account("TSA-1", "Bravo")).unwrap();

    let removed = bulk_remove_accounts(
        &mut conn,
        &cache,
        &[a.id.clone(), b.id.clone(), "ghost".to_string()],
    )
    .unwrap();
    assert_eq!(removed, 2);
    assert!(list_accounts(&conn, &cache, TTL, Some("TSA-1"), None)
        .unwrap()
        .is_empty());

    let err = bulk_remove_accounts(&mut conn, &cache, &[a.id]).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::NotFound);
}

#[test]
fn test_duplicate_check() {
    let (_tmp, conn) = setup_db();
    let cache = MemoryCache::new();
    create_account(&conn, &cache, new_account("TSA-1", "Northwind Traders, Inc.")).unwrap();
    create_account(&conn, &cache, new_account("TSA-2", "Contoso")).unwrap();

    let matches = check_duplicate(&conn, Some("northwind traders corp")).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].score, 1.0);

    assert!(check_duplicate(&conn, Some("Fabrikam")).unwrap().is_empty());

    let err = check_duplicate(&conn, Some("No")).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::InvalidInput);
}

#[test]
fn test_transfer_moves_account_to_target_hierarchy() {
    let (_tmp, mut conn) = setup_db();
    let cache = MemoryCache::new();
    seed_user(&conn, "TSA-2", "ben@example.com", Role::Tsa, Some("TSM-9"), Some("MGR-9"));
    let account = create_account(&conn, &cache, new_account("TSA-1", "Acme")).unwrap();

    let err = request_transfer(&mut conn, &cache, &[account.id.clone()], Some("TSA-404"))
        .unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::NotFound);

    request_transfer(&mut conn, &cache, &[account.id.clone()], Some("TSA-2")).unwrap();
    assert_eq!(
        get_account(&conn, &account.id).unwrap().status,
        AccountStatus::PendingTransfer
    );

    let moved = approve_transfer(&mut conn, &cache, &account.id, true).unwrap();
    assert_eq!(moved.referenceid, "TSA-2");
    assert_eq!(moved.tsm.as_deref(), Some("TSM-9"));
    assert_eq!(moved.manager.as_deref(), Some("MGR-9"));

    let err = approve_transfer(&mut conn, &cache, &account.id, true).unwrap_err();
    assert_eq!(err.kind(), TfErrorKind::NotFound);
}

#[test]
fn test_operations_emit_boundary_events() {
    let capture = init_test_capture();
    let (_tmp, conn) = setup_db();
    let cache = MemoryCache::new();

    list_accounts(&conn, &cache, TTL, Some("TSA-boundary-ok"), None).unwrap();
    let _ = list_accounts(&conn, &cache, TTL, Some("TSA-boundary-ok"), Some("bogus"));

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("list_accounts")
            && e.event.as_deref() == Some(EVENT_START)
            && e.fields.get("subject").map(String::as_str) == Some("TSA-boundary-ok")
    });
    assert!(starts >= 2);
    capture.assert_event_exists("list_accounts", EVENT_END);
    capture.assert_event_exists("list_accounts", EVENT_END_ERROR);
}
