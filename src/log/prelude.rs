//! Re-exports of [`slog_scope`]'s logging macros.
//!
//! Call sites just `use crate::log::prelude::*;` and then `warn!(...)`
//! against the thread-local current logger, without threading a
//! [`slog::Logger`] through every function signature.

pub use slog_scope::{crit, debug, error, info, trace, warn};
