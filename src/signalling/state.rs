//! Session State Store: the authoritative in-memory record of peers,
//! endpoints and tracks.
//!
//! Every mutation here runs on the single [`Room`] actor thread — there is
//! no internal locking, by design (§5).
//!
//! [`Room`]: crate::signalling::Room

use std::collections::HashMap;

use rtc_engine_proto::{EndpointId, PeerId, PeerSnapshot, TrackId};

use crate::{
    log::prelude::*,
    media::{Endpoint, Peer, Track},
    signalling::error::RoomError,
};

/// Authoritative store of a session's [`Peer`]s, [`Endpoint`]s and
/// [`Track`]s.
#[derive(Default)]
pub struct SessionStateStore {
    peers: HashMap<PeerId, Peer>,
    endpoints: HashMap<EndpointId, Endpoint>,
}

impl SessionStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Peers ---------------------------------------------------------

    #[must_use]
    pub fn peer(&self, id: &PeerId) -> Option<&Peer> {
        self.peers.get(id)
    }

    #[must_use]
    pub fn peer_mut(&mut self, id: &PeerId) -> Option<&mut Peer> {
        self.peers.get_mut(id)
    }

    #[must_use]
    pub fn peers(&self) -> impl Iterator<Item = &Peer> {
        self.peers.values()
    }

    /// Inserts `peer`. A duplicate id is a no-op returning a warning, not an
    /// error (§4.1).
    pub fn add_peer(&mut self, peer: Peer) {
        if self.peers.contains_key(peer.id()) {
            warn!("Peer [id = {}] already exists, ignoring", peer.id());
            return;
        }
        self.peers.insert(peer.id().clone(), peer);
    }

    /// Removes a peer along with its attached endpoint and that endpoint's
    /// tracks, atomically.
    pub fn remove_peer(&mut self, id: &PeerId) -> Option<Peer> {
        let peer = self.peers.remove(id)?;
        if let Some(endpoint_id) = peer.endpoint_id() {
            self.endpoints.remove(endpoint_id);
        }
        Some(peer)
    }

    // --- Endpoints -------------------------------------------------------

    #[must_use]
    pub fn endpoint(&self, id: &EndpointId) -> Option<&Endpoint> {
        self.endpoints.get(id)
    }

    #[must_use]
    pub fn endpoint_mut(&mut self, id: &EndpointId) -> Option<&mut Endpoint> {
        self.endpoints.get_mut(id)
    }

    #[must_use]
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.values()
    }

    #[must_use]
    pub fn endpoint_ids(&self) -> impl Iterator<Item = &EndpointId> {
        self.endpoints.keys()
    }

    /// Validates and inserts an endpoint, attaching it to `peer_id` if
    /// given.
    ///
    /// # Errors
    ///
    /// - [`RoomError::InvalidArguments`] if both `endpoint_id` and `peer_id`
    ///   were supplied by the caller (checked by the caller, not here — this
    ///   method only enforces the peer-attachment side).
    /// - [`RoomError::EndpointAlreadyExists`] if the id is already taken;
    ///   treated by the caller as an idempotent no-op (§8 invariant 6).
    pub fn add_endpoint(
        &mut self,
        endpoint: Endpoint,
    ) -> Result<(), RoomError> {
        if self.endpoints.contains_key(endpoint.id()) {
            return Err(RoomError::EndpointAlreadyExists(
                endpoint.id().clone(),
            ));
        }
        if let Some(peer_id) = endpoint.peer_id() {
            let peer_id = peer_id.clone();
            match self.peers.get_mut(&peer_id) {
                Some(peer) => peer.attach_endpoint(endpoint.id().clone()),
                None => {
                    warn!(
                        "AddEndpoint referenced nonexistent peer [id = {}], \
                         dropping",
                        peer_id,
                    );
                    return Ok(());
                }
            }
        }
        self.endpoints.insert(endpoint.id().clone(), endpoint);
        Ok(())
    }

    /// Removes an endpoint record, returning it for teardown by the caller.
    pub fn remove_endpoint(&mut self, id: &EndpointId) -> Option<Endpoint> {
        self.endpoints.remove(id)
    }

    /// All currently active outbound (inbound-to-the-session) tracks across
    /// every endpoint, used to seed a newly added endpoint via `NewTracks`.
    #[must_use]
    pub fn active_tracks(&self) -> Vec<&Track> {
        self.endpoints
            .values()
            .flat_map(Endpoint::active_inbound_tracks)
            .collect()
    }

    #[must_use]
    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.endpoints.values().find_map(|e| e.inbound_track(id))
    }

    #[must_use]
    pub fn track_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        self.endpoints
            .values_mut()
            .find_map(|e| e.inbound_track_mut(id))
    }

    /// Builds a [`PeerSnapshot`] of `peer_id` for delivery to newcomers and
    /// broadcasts, reflecting only that peer's currently active tracks.
    #[must_use]
    pub fn snapshot_of(&self, peer_id: &PeerId) -> Option<PeerSnapshot> {
        let peer = self.peers.get(peer_id)?;
        let endpoint = peer.endpoint_id().and_then(|id| self.endpoints.get(id));
        let track_id_to_metadata = endpoint
            .into_iter()
            .flat_map(Endpoint::active_inbound_tracks)
            .map(|t| (t.id().clone(), t.metadata().clone()))
            .collect();
        Some(PeerSnapshot {
            id: peer.id().clone(),
            metadata: peer.metadata().clone(),
            track_id_to_metadata,
        })
    }

    /// Snapshots of every peer currently in the session, for `peerAccepted`.
    #[must_use]
    pub fn snapshot_all(&self) -> Vec<PeerSnapshot> {
        self.peers
            .keys()
            .filter_map(|id| self.snapshot_of(id))
            .collect()
    }
}
