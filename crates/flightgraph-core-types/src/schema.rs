//! Canonical schema constants for structured logging and events
//!
//! These constants keep progress lines and error reports consistent
//! between the core, the store and the engine.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Import progress
pub const FIELD_BATCH: &str = "batch";
pub const FIELD_TOTAL_BATCHES: &str = "total";
pub const FIELD_FLIGHT_ID: &str = "flight_id";
pub const FIELD_CODES: &str = "codes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_PROGRESS: &str = "progress";
