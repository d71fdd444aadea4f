//! Per-session configuration, passed to [`Room::new`] when a session is
//! spun up.
//!
//! Request-scoped, unlike the process-level [`crate::conf::Conf`] —
//! deployment concerns (bind address, default timeouts) never belong here.
//!
//! [`Room::new`]: crate::signalling::Room::new

use serde_json::Value as Json;

/// Options recognized at session start (§6).
#[derive(Clone, Debug, Default)]
pub struct SessionOpts {
    /// Logging/grouping identifier for this session.
    pub id: String,

    /// Opaque distributed-tracing context, threaded through but never
    /// interpreted by the Engine.
    pub trace_ctx: Option<Json>,

    /// Key-value labels attached to telemetry emitted for this session.
    pub telemetry_label: Vec<(String, String)>,

    /// Selects a Filter Tee instead of a Push Tee for non-simulcast tracks
    /// (§4.5).
    pub display_manager: bool,
}
