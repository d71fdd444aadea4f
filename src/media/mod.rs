//! Domain model the Session State Store is authoritative over: [`Peer`]s,
//! [`Endpoint`]s, [`Track`]s and [`Subscription`]s.
//!
//! These are richer, server-side counterparts of the wire-level types in
//! [`rtc_engine_proto`]: e.g. [`Track`] additionally carries a
//! `depayloading_filter` and `active` flag that are never serialized onto
//! the wire, only reflected into [`rtc_engine_proto::Track`] /
//! [`rtc_engine_proto::PeerSnapshot`] when a snapshot is built.

pub mod endpoint;
pub mod peer;
pub mod subscription;
pub mod track;

pub use self::{
    endpoint::Endpoint,
    peer::Peer,
    subscription::{Subscription, SubscriptionOpts, SubscriptionStatus},
    track::Track,
};
