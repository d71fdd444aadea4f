//! Media Event wire protocol shared between the Engine and the signalling
//! transport that drives it.
//!
//! Everything in this crate is deliberately transport-agnostic: it only
//! describes how `Command`s (inbound) and `Event`s (outbound) are shaped and
//! how they round-trip through JSON. What carries the resulting bytes (a
//! WebSocket, a channel, long polling) is not this crate's concern.

#![forbid(non_ascii_idents, unsafe_code)]

use std::collections::HashMap;

use derive_more::Display;
use rtc_engine_macro::dispatchable;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// ID of a [`PeerSnapshot`], assigned by the application on `join`.
#[derive(
    Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PeerId(pub String);

/// ID of an `Endpoint`. Equal to its owning [`PeerId`] for Peer Endpoints.
#[derive(
    Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EndpointId(pub String);

/// ID of a `Track`, unique within a session.
#[derive(
    Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TrackId(pub String);

impl From<PeerId> for EndpointId {
    fn from(id: PeerId) -> Self {
        Self(id.0)
    }
}

impl From<&EndpointId> for PeerId {
    fn from(id: &EndpointId) -> Self {
        Self(id.0.clone())
    }
}

/// Kind of media a [`Track`] carries.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

/// A delivery format a subscriber may request a [`Track`] in.
///
/// `Raw` means unpacked media handed straight to the subscriber; any other
/// value is an opaque remote/packetized format name (e.g. a container or RTP
/// payload convention) that this crate does not interpret.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TrackFormat {
    #[serde(rename = "raw")]
    Raw,
    #[serde(other, rename = "remote")]
    Remote(String),
}

impl TrackFormat {
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw)
    }
}

/// A published media track, as tracked by the Session State Store.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub owner: EndpointId,
    pub media_type: MediaType,

    /// Primary codec tag this track is encoded with.
    pub encoding: String,

    /// Formats a subscriber is allowed to request this track in.
    pub formats: Vec<TrackFormat>,

    /// Simulcast layer identifiers, if this track is simulcast. Non-empty
    /// when present.
    pub simulcast_encodings: Option<Vec<String>>,

    pub active: bool,

    #[serde(default)]
    pub metadata: Json,
}

impl Track {
    #[must_use]
    pub fn is_simulcast(&self) -> bool {
        self.simulcast_encodings.is_some()
    }
}

/// Message sent by the signalling transport to the Engine on behalf of a
/// connected peer.
#[dispatchable]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Command {
    /// The peer asks to join the session.
    Join {
        #[serde(default)]
        metadata: Json,
    },

    /// The peer leaves the session.
    Leave,

    /// The peer updates its own metadata.
    UpdatePeerMetadata { metadata: Json },

    /// The peer updates the metadata of one of its own tracks.
    UpdateTrackMetadata { track_id: TrackId, metadata: Json },

    /// The peer requests a specific simulcast encoding for a track it is
    /// subscribed to.
    SelectEncoding {
        /// ID of the peer owning the track.
        peer_id: PeerId,
        track_id: TrackId,
        encoding: String,
    },

    /// Opaque, application-defined event passed through to the endpoint
    /// that owns the sending peer.
    Custom(Json),
}

/// A snapshot of a peer and its currently active tracks, as delivered to
/// newcomers and broadcast to the room.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerSnapshot {
    pub id: PeerId,
    #[serde(default)]
    pub metadata: Json,
    pub track_id_to_metadata: HashMap<TrackId, Json>,
}

/// Message sent by the Engine to one or more peers.
#[dispatchable]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Event {
    /// Sent only to a newly accepted peer.
    PeerAccepted {
        id: PeerId,
        peers_in_room: Vec<PeerSnapshot>,
    },

    /// Sent only to the applicant of a denied `join`.
    PeerDenied(Option<Json>),

    /// Broadcast when a peer was accepted into the room.
    PeerJoined { peer: PeerSnapshot },

    /// Broadcast when a peer left voluntarily.
    PeerLeft { peer_id: PeerId },

    /// Broadcast when a peer updated its metadata.
    PeerUpdated { peer_id: PeerId, metadata: Json },

    /// Sent only to a peer whose endpoint was removed involuntarily
    /// (e.g. by a crash).
    PeerRemoved { peer_id: PeerId, reason: String },

    /// Broadcast when new active tracks became available.
    TracksAdded {
        peer_id: PeerId,
        track_id_to_metadata: HashMap<TrackId, Json>,
    },

    /// Broadcast when tracks stopped being available.
    TracksRemoved {
        peer_id: PeerId,
        track_ids: Vec<TrackId>,
    },

    /// Broadcast when a track's metadata changed.
    TrackUpdated {
        peer_id: PeerId,
        track_id: TrackId,
        metadata: Json,
    },

    /// Informs a subscriber of the relative priority order its subscribed
    /// tracks should be rendered in.
    TracksPriority { track_ids: Vec<TrackId> },

    /// Sent only to the receiver whose simulcast selection took effect.
    EncodingSwitched {
        peer_id: PeerId,
        track_id: TrackId,
        encoding: String,
    },

    /// Opaque, application-defined event.
    Custom(Json),
}

/// Where an [`Event`] should be delivered.
///
/// This is a dispatcher-internal routing concern, not part of the wire
/// schema: the transport only ever sees the already-targeted, serialized
/// [`Event`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    Broadcast,
    Peer(PeerId),
}

impl From<PeerId> for Target {
    fn from(id: PeerId) -> Self {
        Self::Peer(id)
    }
}

/// An [`Event`] paired with its delivery [`Target`].
#[derive(Clone, Debug, PartialEq)]
pub struct OutgoingEvent {
    pub to: Target,
    pub event: Event,
}

impl OutgoingEvent {
    #[must_use]
    pub fn broadcast(event: Event) -> Self {
        Self {
            to: Target::Broadcast,
            event,
        }
    }

    #[must_use]
    pub fn to(peer_id: PeerId, event: Event) -> Self {
        Self {
            to: Target::Peer(peer_id),
            event,
        }
    }
}
