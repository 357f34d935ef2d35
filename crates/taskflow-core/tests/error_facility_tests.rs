#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use taskflow_core::errors::{TaskflowError, TfError, TfErrorKind};
use taskflow_core::taskflow_core_types::RequestId;

fn kind_of(err: TaskflowError) -> TfErrorKind {
    TfError::from(err).kind()
}

#[test]
fn test_validation_errors_name_the_field() {
    let err: TfError = TaskflowError::MissingField {
        field: "referenceid".into(),
    }
    .into();
    assert_eq!(err.kind(), TfErrorKind::MissingField);
    assert_eq!(err.field(), Some("referenceid"));

    let err: TfError = TaskflowError::CompanyNameTooShort { min_len: 3 }.into();
    assert_eq!(err.kind(), TfErrorKind::InvalidInput);
    assert_eq!(err.field(), Some("company_name"));
}

#[test]
fn test_lookup_and_zero_row_errors_are_not_found() {
    assert_eq!(
        kind_of(TaskflowError::HistoryNotFound { history_id: 9 }),
        TfErrorKind::NotFound
    );
    assert_eq!(
        kind_of(TaskflowError::NoRowsAffected {
            entity: "activity".into(),
            id: "ACT-1".into()
        }),
        TfErrorKind::NotFound
    );
}

#[test]
fn test_auth_error_kinds() {
    assert_eq!(
        kind_of(TaskflowError::InvalidCredentials {
            remaining_attempts: Some(2)
        }),
        TfErrorKind::Unauthorised
    );
    assert_eq!(
        kind_of(TaskflowError::AccountInactive {
            status: "Resigned".into()
        }),
        TfErrorKind::Forbidden
    );

    let until = Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap();
    let err: TfError = TaskflowError::AccountLocked { until }.into();
    assert_eq!(err.kind(), TfErrorKind::Locked);
    assert_eq!(err.code(), "ERR_LOCKED");
    assert_eq!(
        err.details().unwrap()["locked_until"],
        "2024-05-01T08:15:00+00:00"
    );
}

#[test]
fn test_remaining_attempts_surface_in_details() {
    let err: TfError = TaskflowError::InvalidCredentials {
        remaining_attempts: Some(3),
    }
    .into();
    assert_eq!(err.details().unwrap()["remaining_attempts"], 3);
}

#[test]
fn test_conflicts() {
    assert_eq!(
        kind_of(TaskflowError::RevisionLabelConflict {
            label: "Revised-Quotation-001-QT-0001".into()
        }),
        TfErrorKind::Conflict
    );
    assert_eq!(
        kind_of(TaskflowError::EmailAlreadyRegistered {
            email: "a@b.co".into()
        }),
        TfErrorKind::Conflict
    );
}

#[test]
fn test_request_id_is_carried() {
    let id = RequestId::from_string("req-7".into());
    let err = TfError::new(TfErrorKind::Internal).with_request_id(id.clone());
    assert_eq!(err.request_id(), Some(&id));
}

#[test]
fn test_serde_error_converts() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
    let err: TaskflowError = parse.unwrap_err().into();
    assert_eq!(kind_of(err), TfErrorKind::Serialization);
}
