use chrono::{DateTime, Utc};
use taskflow_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using TaskflowError
pub type Result<T> = std::result::Result<T, TaskflowError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that leaves the engine is classified by one of these
/// kinds. The kind decides the HTTP status and carries a stable code that
/// clients and tests can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfErrorKind {
    // Validation
    InvalidInput,
    MissingField,

    // Lookup / write outcome
    NotFound,
    Conflict,

    // Auth
    Unauthorised,
    Forbidden,
    Locked,

    // Transport
    MethodNotAllowed,

    // Integration/IO
    Persistence,
    Cache,
    Serialization,
    Config,

    // Internal
    Internal,
}

impl TfErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            TfErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            TfErrorKind::MissingField => "ERR_MISSING_FIELD",
            TfErrorKind::NotFound => "ERR_NOT_FOUND",
            TfErrorKind::Conflict => "ERR_CONFLICT",
            TfErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            TfErrorKind::Forbidden => "ERR_FORBIDDEN",
            TfErrorKind::Locked => "ERR_LOCKED",
            TfErrorKind::MethodNotAllowed => "ERR_METHOD_NOT_ALLOWED",
            TfErrorKind::Persistence => "ERR_PERSISTENCE",
            TfErrorKind::Cache => "ERR_CACHE",
            TfErrorKind::Serialization => "ERR_SERIALIZATION",
            TfErrorKind::Config => "ERR_CONFIG",
            TfErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            TfErrorKind::Persistence
                | TfErrorKind::Cache
                | TfErrorKind::Serialization
                | TfErrorKind::Config
                | TfErrorKind::Internal
        )
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, entity,
/// offending field, free-form details) to build a response body and a
/// log line without re-parsing the message.
#[derive(Debug, Clone)]
pub struct TfError {
    kind: TfErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    details: Option<serde_json::Value>,
}

impl TfError {
    /// Create a new error with the specified kind
    pub fn new(kind: TfErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            details: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Name the request field that failed validation
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach machine-readable details that are surfaced to the caller
    /// alongside the message (e.g. `remaining_attempts`).
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> TfErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&serde_json::Value> {
        self.details.as_ref()
    }
}

impl std::fmt::Display for TfError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for TfError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for Taskflow operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskflowError {
    // ===== Validation Errors =====
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Company name must be at least {min_len} characters")]
    CompanyNameTooShort { min_len: usize },

    #[error("Invalid role: {role}")]
    InvalidRole { role: String },

    #[error("Invalid {entity} status: {status}")]
    InvalidStatus { entity: String, status: String },

    // ===== Lookup Errors =====
    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    #[error("Activity not found: {activity_reference_number}")]
    ActivityNotFound { activity_reference_number: String },

    #[error("History record not found: {history_id}")]
    HistoryNotFound { history_id: i64 },

    #[error("Quotation number not found: {quotation_number}")]
    QuotationNumberNotFound { quotation_number: String },

    #[error("Ticket not found: {ticket_reference_number}")]
    TicketNotFound { ticket_reference_number: String },

    #[error("User not found: {referenceid}")]
    UserNotFound { referenceid: String },

    /// A write matched no rows
    #[error("No {entity} matched {id}")]
    NoRowsAffected { entity: String, id: String },

    // ===== Conflict Errors =====
    #[error("Quotation number {quotation_number} is already reserved")]
    QuotationAlreadyReserved {
        quotation_number: String,
        reserved_by: Option<String>,
    },

    #[error("Revision label already exists: {label}")]
    RevisionLabelConflict { label: String },

    #[error("Email already registered: {email}")]
    EmailAlreadyRegistered { email: String },

    #[error("Reference id already registered: {referenceid}")]
    ReferenceIdAlreadyRegistered { referenceid: String },

    // ===== Auth Errors =====
    #[error("Invalid credentials")]
    InvalidCredentials { remaining_attempts: Option<u32> },

    #[error("Account locked until {until}")]
    AccountLocked { until: DateTime<Utc> },

    #[error("Account is not active: {status}")]
    AccountInactive { status: String },

    #[error("Password reset token is invalid or expired")]
    ResetTokenInvalid,

    #[error("Password does not meet requirements: {reason}")]
    WeakPassword { reason: String },

    // ===== Generic Errors =====
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<TaskflowError> for TfError {
    fn from(err: TaskflowError) -> Self {
        let message = err.to_string();
        match err {
            TaskflowError::MissingField { field } => TfError::new(TfErrorKind::MissingField)
                .with_field(field)
                .with_message(message),

            TaskflowError::InvalidField { field, .. } => TfError::new(TfErrorKind::InvalidInput)
                .with_field(field)
                .with_message(message),

            TaskflowError::CompanyNameTooShort { .. } => TfError::new(TfErrorKind::InvalidInput)
                .with_field("company_name")
                .with_message(message),

            TaskflowError::InvalidRole { .. } => TfError::new(TfErrorKind::InvalidInput)
                .with_field("role")
                .with_message(message),

            TaskflowError::InvalidStatus { .. } => TfError::new(TfErrorKind::InvalidInput)
                .with_field("status")
                .with_message(message),

            TaskflowError::AccountNotFound { account_id } => TfError::new(TfErrorKind::NotFound)
                .with_entity_id(account_id)
                .with_message(message),

            TaskflowError::ActivityNotFound {
                activity_reference_number,
            } => TfError::new(TfErrorKind::NotFound)
                .with_entity_id(activity_reference_number)
                .with_message(message),

            TaskflowError::HistoryNotFound { history_id } => TfError::new(TfErrorKind::NotFound)
                .with_entity_id(history_id.to_string())
                .with_message(message),

            TaskflowError::QuotationNumberNotFound { quotation_number } => {
                TfError::new(TfErrorKind::NotFound)
                    .with_entity_id(quotation_number)
                    .with_message(message)
            }

            TaskflowError::TicketNotFound {
                ticket_reference_number,
            } => TfError::new(TfErrorKind::NotFound)
                .with_entity_id(ticket_reference_number)
                .with_message(message),

            TaskflowError::UserNotFound { referenceid } => TfError::new(TfErrorKind::NotFound)
                .with_entity_id(referenceid)
                .with_message(message),

            TaskflowError::NoRowsAffected { id, .. } => TfError::new(TfErrorKind::NotFound)
                .with_entity_id(id)
                .with_message(message),

            TaskflowError::QuotationAlreadyReserved {
                quotation_number,
                reserved_by,
            } => TfError::new(TfErrorKind::Conflict)
                .with_entity_id(quotation_number)
                .with_message(message)
                .with_details(serde_json::json!({ "reserved_by": reserved_by })),

            TaskflowError::RevisionLabelConflict { label } => TfError::new(TfErrorKind::Conflict)
                .with_entity_id(label)
                .with_message(message),

            TaskflowError::EmailAlreadyRegistered { .. } => TfError::new(TfErrorKind::Conflict)
                .with_field("email")
                .with_message(message),

            TaskflowError::ReferenceIdAlreadyRegistered { referenceid } => {
                TfError::new(TfErrorKind::Conflict)
                    .with_entity_id(referenceid)
                    .with_field("referenceid")
                    .with_message(message)
            }

            TaskflowError::InvalidCredentials { remaining_attempts } => {
                let err = TfError::new(TfErrorKind::Unauthorised).with_message(message);
                match remaining_attempts {
                    Some(n) => err.with_details(serde_json::json!({ "remaining_attempts": n })),
                    None => err,
                }
            }

            TaskflowError::AccountLocked { until } => TfError::new(TfErrorKind::Locked)
                .with_message(message)
                .with_details(serde_json::json!({ "locked_until": until.to_rfc3339() })),

            TaskflowError::AccountInactive { .. } => {
                TfError::new(TfErrorKind::Forbidden).with_message(message)
            }

            TaskflowError::ResetTokenInvalid => TfError::new(TfErrorKind::InvalidInput)
                .with_field("token")
                .with_message(message),

            TaskflowError::WeakPassword { .. } => TfError::new(TfErrorKind::InvalidInput)
                .with_field("password")
                .with_message(message),

            TaskflowError::Serialization { .. } => {
                TfError::new(TfErrorKind::Serialization).with_message(message)
            }

            TaskflowError::Internal { .. } => {
                TfError::new(TfErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to TaskflowError
impl From<serde_json::Error> for TaskflowError {
    fn from(err: serde_json::Error) -> Self {
        TaskflowError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(TfErrorKind::NotFound.is_client_error());
        assert!(TfErrorKind::Locked.is_client_error());
        assert!(!TfErrorKind::Persistence.is_client_error());
        assert!(!TfErrorKind::Internal.is_client_error());
    }

    #[test]
    fn test_display_includes_code_op_and_field() {
        let err = TfError::new(TfErrorKind::MissingField)
            .with_op("list_accounts")
            .with_field("referenceid")
            .with_message("Missing required field: referenceid");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_MISSING_FIELD]"));
        assert!(rendered.contains("list_accounts"));
        assert!(rendered.contains("field: referenceid"));
    }

    #[test]
    fn test_reserved_conflict_carries_holder() {
        let err: TfError = TaskflowError::QuotationAlreadyReserved {
            quotation_number: "QT-0001".into(),
            reserved_by: Some("TSA-1".into()),
        }
        .into();
        assert_eq!(err.kind(), TfErrorKind::Conflict);
        assert_eq!(err.details().unwrap()["reserved_by"], "TSA-1");
    }

    #[test]
    fn test_invalid_credentials_without_counter_has_no_details() {
        let err: TfError = TaskflowError::InvalidCredentials {
            remaining_attempts: None,
        }
        .into();
        assert_eq!(err.kind(), TfErrorKind::Unauthorised);
        assert!(err.details().is_none());
    }
}
