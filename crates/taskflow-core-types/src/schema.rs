//! Canonical schema constants for structured logging
//!
//! Every engine operation and every HTTP request logs with these keys so
//! that log pipelines can filter on stable names.

// Canonical field keys
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_REFERENCE_ID: &str = "referenceid";
pub const FIELD_ACCOUNT_ID: &str = "account_id";
pub const FIELD_ACTIVITY_REF: &str = "activity_reference_number";
pub const FIELD_QUOTATION_NUMBER: &str = "quotation_number";
pub const FIELD_TICKET_REF: &str = "ticket_reference_number";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// Header used to propagate a caller-supplied request id.
pub const HEADER_REQUEST_ID: &str = "x-request-id";
