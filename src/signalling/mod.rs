//! The signalling layer: the [`Room`] actor and every component it is
//! assembled from (§2, §4 of this codebase's design docs).
//!
//! Module-to-component mapping:
//! - [`state`] — Session State Store.
//! - [`admission`] — Peer Admission Controller.
//! - [`lifecycle`] — Endpoint Lifecycle Manager.
//! - [`resolver`] — Track Publication & Subscription Resolver.
//! - [`graph`] — Routing Graph Builder.
//! - [`codec`] — Media Event Codec & Dispatcher.
//! - [`registry`] — Registry.
//!
//! [`conf`] and [`error`] carry the session-scoped configuration type and
//! the error taxonomy shared by every component above.

pub mod admission;
pub mod codec;
pub mod conf;
pub mod error;
pub mod graph;
pub mod lifecycle;
pub mod registry;
pub mod resolver;
pub mod room;
pub mod state;

pub use self::{conf::SessionOpts, error::RoomError, room::Room};
