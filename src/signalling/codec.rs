//! Media Event Codec & Dispatcher (§4.6): parses inbound Media Events and
//! dispatches them to the appropriate component, using the generated
//! [`CommandHandler`] trait so handling is exhaustive by construction.
//!
//! Deserialization failures and events from unknown peers (other than
//! `join`) are logged and dropped — never torn down a connection
//! (`ProtocolError`, §7).

use actix::Context;
use rtc_engine_proto::{
    Command, CommandHandler, EndpointId, Event, OutgoingEvent, PeerId, TrackId,
};
use serde_json::Value as Json;

use crate::{
    log::prelude::*,
    signalling::{
        resolver::SelectEncoding,
        room::{EndpointControl, Room},
    },
};

impl Room {
    /// Parses `bytes` as a [`Command`] and dispatches it, enforcing that
    /// only `join` is accepted from a peer not yet admitted.
    pub(crate) fn dispatch_media_event(
        &mut self,
        peer_id: PeerId,
        bytes: &[u8],
        ctx: &mut Context<Self>,
    ) {
        let command: Command = match serde_json::from_slice(bytes) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!(
                    "Malformed Media Event from peer [id = {}]: {}",
                    peer_id, e,
                );
                return;
            }
        };

        let is_admitted = self.store.peer(&peer_id).is_some();
        let is_pending_join = self.awaiting_decision.contains_key(&peer_id);
        if !is_admitted && !is_pending_join && !matches!(command, Command::Join { .. })
        {
            warn!(
                "Media Event from unknown peer [id = {}], ignoring",
                peer_id,
            );
            return;
        }

        let mut dispatch = Dispatch {
            room: self,
            peer_id,
            ctx,
        };
        command.dispatch_with(&mut dispatch);
    }
}

/// Binds an inbound [`Command`] to the peer it arrived from, so generated
/// handler methods (which carry no implicit sender) can act on the right
/// peer/endpoint.
struct Dispatch<'a> {
    room: &'a mut Room,
    peer_id: PeerId,
    ctx: &'a mut Context<Room>,
}

impl CommandHandler for Dispatch<'_> {
    fn on_join(&mut self, metadata: Json) {
        self.room.handle_join(self.peer_id.clone(), metadata);
    }

    fn on_leave(&mut self) {
        self.room
            .do_remove_peer(self.peer_id.clone(), None, &mut *self.ctx);
    }

    fn on_update_peer_metadata(&mut self, metadata: Json) {
        if let Some(peer) = self.room.store.peer_mut(&self.peer_id) {
            peer.set_metadata(metadata.clone());
            self.room.emit(OutgoingEvent::broadcast(Event::PeerUpdated {
                peer_id: self.peer_id.clone(),
                metadata,
            }));
        } else {
            warn!(
                "updatePeerMetadata from unknown peer [id = {}]",
                self.peer_id,
            );
        }
    }

    fn on_update_track_metadata(&mut self, track_id: TrackId, metadata: Json) {
        let endpoint_id: EndpointId = self.peer_id.clone().into();
        let owns_track = self
            .room
            .store
            .track(&track_id)
            .map_or(false, |t| t.owner() == &endpoint_id);
        if !owns_track {
            warn!(
                "updateTrackMetadata from peer [id = {}] for track [id = {}] \
                 it does not own",
                self.peer_id, track_id,
            );
            return;
        }
        if let Some(track) = self.room.store.track_mut(&track_id) {
            track.set_metadata(metadata.clone());
            self.room.emit(OutgoingEvent::broadcast(Event::TrackUpdated {
                peer_id: self.peer_id.clone(),
                track_id,
                metadata,
            }));
        }
    }

    fn on_select_encoding(
        &mut self,
        peer_id: PeerId,
        track_id: TrackId,
        encoding: String,
    ) {
        let subscriber_id: EndpointId = self.peer_id.clone().into();
        self.room.handle_select_encoding(SelectEncoding {
            subscriber_id,
            peer_id,
            track_id,
            encoding,
        });
    }

    fn on_custom(&mut self, data: Json) {
        let endpoint_id: EndpointId = self.peer_id.clone().into();
        if let Some(chan) = self.room.endpoint_channels.get(&endpoint_id) {
            let _ = chan.do_send(EndpointControl::Custom(data));
        } else {
            warn!(
                "custom Media Event from peer [id = {}] has no owning \
                 endpoint to forward to",
                self.peer_id,
            );
        }
    }
}
