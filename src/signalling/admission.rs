//! Peer Admission Controller (§4.2): drives the join→accept/deny handshake
//! with the application.
//!
//! The handshake is never a blocking wait on the actor thread (§5, §9): a
//! `join` records a [`PendingJoin`] in `awaiting_decision` and publishes a
//! [`EngineEvent::NewPeer`] observer notification; `AcceptPeer`/`DenyPeer`
//! arrive later as ordinary messages that consume that entry. A mismatched
//! `peer_id` on either message is logged and ignored — the entry, if any,
//! simply keeps waiting for a correctly addressed reply.

use rtc_engine_proto::{Event, OutgoingEvent, PeerId};
use serde_json::Value as Json;

use crate::{
    log::prelude::*,
    signalling::{
        registry::EngineEvent,
        room::{PendingJoin, Room},
    },
};

impl Room {
    /// Handles an inbound `join` Media Event: records the pending admission
    /// and notifies observers. A peer already mid-handshake (or already
    /// joined) re-joining is treated as a fresh admission attempt, replacing
    /// any previous pending entry.
    pub(crate) fn handle_join(&mut self, peer_id: PeerId, metadata: Json) {
        if self.store.peer(&peer_id).is_some() {
            warn!("join from already-admitted peer [id = {}], ignoring", peer_id);
            return;
        }
        self.awaiting_decision
            .insert(peer_id.clone(), PendingJoin { metadata });
        self.registry
            .dispatch(EngineEvent::NewPeer { peer_id });
    }

    pub(crate) fn do_accept_peer(
        &mut self,
        id: PeerId,
        _ctx: &mut actix::Context<Self>,
    ) {
        let Some(pending) = self.awaiting_decision.remove(&id) else {
            warn!(
                "AcceptPeer for [id = {}] with no pending admission, ignoring",
                id,
            );
            return;
        };

        // Snapshot of the room *before* the new peer is inserted: the
        // newcomer must not see itself in `peersInRoom`.
        let peers_in_room = self.store.snapshot_all();

        self.store
            .add_peer(crate::media::Peer::new(id.clone(), pending.metadata));

        // Ordering invariant (§5c, §8 invariant 3): `peerAccepted` to the
        // newcomer precedes the `peerJoined` broadcast.
        self.emit(OutgoingEvent::to(
            id.clone(),
            Event::PeerAccepted {
                id: id.clone(),
                peers_in_room,
            },
        ));

        if let Some(snapshot) = self.store.snapshot_of(&id) {
            self.emit(OutgoingEvent::broadcast(Event::PeerJoined {
                peer: snapshot,
            }));
        }
    }

    pub(crate) fn do_deny_peer(&mut self, id: PeerId, data: Option<Json>) {
        if self.awaiting_decision.remove(&id).is_none() {
            warn!(
                "DenyPeer for [id = {}] with no pending admission, ignoring",
                id,
            );
            return;
        }
        self.emit(OutgoingEvent::to(id, Event::PeerDenied(data)));
    }
}
