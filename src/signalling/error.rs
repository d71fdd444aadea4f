//! [`RoomError`] — the error taxonomy of a [`Room`].
//!
//! [`Room`]: crate::signalling::Room

use derive_more::Display;
use rtc_engine_proto::{EndpointId, PeerId, TrackId};

/// Errors a [`Room`] actor can produce.
///
/// Only [`InvalidArguments`](RoomError::InvalidArguments) and the
/// `Subscribe`-specific variants are surfaced to a caller; every other
/// variant is logged as a warning and otherwise ignored — see §7's
/// propagation policy.
///
/// [`Room`]: crate::signalling::Room
#[derive(Clone, Debug, Display, failure::Fail)]
pub enum RoomError {
    /// Both `endpoint_id` and `peer_id` were given to a call that accepts
    /// at most one.
    #[display(fmt = "invalid arguments: {}", _0)]
    InvalidArguments(String),

    /// A referenced peer does not exist. Logged and dropped, not returned.
    #[display(fmt = "peer [id = {}] not found", _0)]
    PeerNotFound(PeerId),

    /// A referenced endpoint does not exist. Logged and dropped.
    #[display(fmt = "endpoint [id = {}] not found", _0)]
    EndpointNotFound(EndpointId),

    /// Returned synchronously from `Subscribe`.
    #[display(fmt = "track [id = {}] not found", _0)]
    InvalidTrackId(TrackId),

    /// Returned synchronously from `Subscribe`.
    #[display(fmt = "track [id = {}] does not accept requested format", _0)]
    InvalidFormat(TrackId),

    /// Returned synchronously from `Subscribe`.
    #[display(
        fmt = "track [id = {}] has no simulcast encoding {:?}",
        _0,
        _1
    )]
    InvalidDefaultSimulcastEncoding(TrackId, String),

    /// Returned from `Subscribe` after the 5 second timeout elapses.
    #[display(fmt = "subscribe timed out")]
    SubscribeTimeout,

    /// `AddEndpoint` with an id that already exists. Treated as an
    /// idempotent no-op, never surfaced as a hard error — see §8 invariant
    /// 6.
    #[display(fmt = "endpoint [id = {}] already exists", _0)]
    EndpointAlreadyExists(EndpointId),
}
