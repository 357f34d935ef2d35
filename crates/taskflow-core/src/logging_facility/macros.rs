//! Canonical logging macros
//!
//! Engine operations bracket their work with these so every operation
//! produces a start event and exactly one end or end_error event.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use taskflow_core::log_op_start;
/// log_op_start!("list_accounts");
/// log_op_start!("list_accounts", referenceid = "TSA-001");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::taskflow_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::taskflow_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use taskflow_core::log_op_end;
/// log_op_end!("list_accounts", duration_ms = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::taskflow_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::taskflow_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Client errors (validation, not-found, auth) log at `warn`; everything
/// else logs at `error`.
///
/// # Example
///
/// ```
/// # use taskflow_core::{log_op_error, errors::TaskflowError};
/// let err = TaskflowError::MissingField { field: "referenceid".to_string() };
/// log_op_error!("list_accounts", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::TfError;
        let tf_err: TfError = $err.into();
        if tf_err.kind().is_client_error() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::taskflow_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?tf_err.kind(),
                err_code = tf_err.code(),
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::taskflow_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ?tf_err.kind(),
                err_code = tf_err.code(),
                error = %tf_err,
            );
        }
    }};
}
