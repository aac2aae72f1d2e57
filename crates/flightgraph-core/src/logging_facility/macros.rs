//! Canonical logging macros
//!
//! Every stage of an import run reports through these so that log lines
//! share the `component`/`op`/`event` fields.

/// Log the start of an operation
///
/// ```
/// # use flightgraph_core::log_op_start;
/// log_op_start!("import_file");
/// log_op_start!("import_file", file = "flights.csv");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log a progress line inside an operation (batch N/M, retry k/max, ...)
///
/// ```
/// # use flightgraph_core::log_op_progress;
/// log_op_progress!("upsert_batch", "batch 1/3", batch = 1, total = 3);
/// ```
#[macro_export]
macro_rules! log_op_progress {
    ($op:expr, $msg:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_PROGRESS,
            "{}",
            $msg
        );
    };
    ($op:expr, $msg:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_PROGRESS,
            $($field)*,
            "{}",
            $msg
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use flightgraph_core::log_op_end;
/// log_op_end!("import_file", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// ```
/// # use flightgraph_core::log_op_error;
/// # use flightgraph_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Transaction);
/// log_op_error!("upsert_batch", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: &$crate::errors::ExError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            "{}",
            ex_err
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: &$crate::errors::ExError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = flightgraph_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*,
            "{}",
            ex_err
        );
    }};
}
