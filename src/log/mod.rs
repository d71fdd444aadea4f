//! Structured logging facility built on [`slog`].
//!
//! Every component of the Engine logs through a [`slog::Logger`] rather than
//! `println!`/`eprintln!`. The root logger is installed globally via
//! [`slog_scope`] and bridged to the [`log`] facade via [`slog_stdlog`], so
//! dependencies that log through `log::*` macros are captured by the same
//! drain chain. Components further down the tree (a [`Room`], its
//! [`Resolver`], its [`RoutingGraph`]) are handed a child logger created with
//! [`slog::Logger::new`] and `o!("room_id" => ...)` so every line they emit
//! is already tagged with the session it belongs to.
//!
//! [`Room`]: crate::signalling::Room
//! [`Resolver`]: crate::signalling::resolver::Resolver
//! [`RoutingGraph`]: crate::signalling::graph::RoutingGraph

pub mod prelude;

use slog::Drain as _;
use slog_scope::GlobalLoggerGuard;

/// Guard holding the global [`slog`] logger alive.
///
/// Dropping it restores the previous global logger (or the no-op one), so it
/// must be kept alive for the lifetime of the process (held in `main`'s
/// stack frame).
pub type LoggerGuard = GlobalLoggerGuard;

/// Initializes the process-wide [`slog`] logger.
///
/// Drain chain: a [`slog_term`] decorator, wrapped by [`slog_envlogger`]
/// (level filtering driven by `RUST_LOG`), wrapped by [`slog_async`] so
/// logging never blocks the calling actor.
///
/// # Panics
///
/// If [`slog_stdlog`] has already been initialized by someone else in this
/// process.
#[must_use]
pub fn new() -> LoggerGuard {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain).fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let logger = slog::Logger::root(drain, slog::o!());

    let guard = slog_scope::set_global_logger(logger);
    slog_stdlog::init().unwrap();

    guard
}
