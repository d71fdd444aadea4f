//! `rtc-engine`: the control-plane core of a real-time media routing engine.
//!
//! This crate implements the Session State Store, Peer Admission Controller,
//! Endpoint Lifecycle Manager, Track Publication & Subscription Resolver,
//! Routing Graph Builder, Media Event Codec & Dispatcher and Registry
//! described by this codebase's design docs, as a single [`actix`] actor
//! ([`signalling::Room`]) per session. Media data-plane concerns (RTP,
//! jitter buffers, ICE/DTLS, HLS) are out of scope — this crate only tracks
//! who is in a session and wires the routing graph that connects publishers
//! to subscribers.
//!
//! The [`api`] module is a thin, illustrative transport binding (WebSocket +
//! HTTP admin surface) over the [`signalling::Room`] message API; embedding
//! applications are free to ignore it and drive `Room` directly.

#![forbid(non_ascii_idents, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod conf;
pub mod log;
pub mod media;
pub mod signalling;
