//! Endpoint Lifecycle Manager (§4.3): adds, removes, and crash-contains
//! endpoints, wiring them into the routing graph.

use actix::{Context, Handler, Message};
use rtc_engine_proto::{EndpointId, Event, OutgoingEvent, PeerId};

use crate::{
    log::prelude::*,
    media::Endpoint,
    signalling::{
        error::RoomError,
        registry::EngineEvent,
        room::{AddEndpoint, EndpointControl, RemovePeer, Room},
    },
};

/// Reported by an endpoint's completion watcher when its failure domain
/// terminates abnormally. Other endpoints MUST survive (§4.3, §8 invariant
/// 4).
#[derive(Message)]
#[rtype(result = "()")]
pub struct EndpointCrashed {
    pub endpoint_id: EndpointId,
}

impl Handler<EndpointCrashed> for Room {
    type Result = ();

    fn handle(&mut self, msg: EndpointCrashed, ctx: &mut Self::Context) {
        self.handle_endpoint_crash(msg.endpoint_id, ctx);
    }
}

impl Room {
    pub(crate) fn do_add_endpoint(
        &mut self,
        msg: AddEndpoint,
        _ctx: &mut Context<Self>,
    ) -> Result<(), RoomError> {
        if msg.endpoint_id.is_some() && msg.peer_id.is_some() {
            return Err(RoomError::InvalidArguments(
                "both `endpoint_id` and `peer_id` were given to AddEndpoint"
                    .into(),
            ));
        }

        let id = match (&msg.endpoint_id, &msg.peer_id) {
            (Some(id), None) => id.clone(),
            (None, Some(peer_id)) => peer_id.clone().into(),
            (None, None) => {
                return Err(RoomError::InvalidArguments(
                    "AddEndpoint requires `endpoint_id` or `peer_id`".into(),
                ))
            }
            (Some(_), Some(_)) => unreachable!(),
        };

        let endpoint =
            Endpoint::new(id.clone(), msg.peer_id.clone(), msg.node.clone());

        match self.store.add_endpoint(endpoint) {
            Ok(()) => {}
            Err(RoomError::EndpointAlreadyExists(id)) => {
                warn!("Endpoint [id = {}] already exists, ignoring", id);
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        self.endpoint_channels.insert(id.clone(), msg.control.clone());

        let _ = msg
            .control
            .do_send(EndpointControl::SetDisplayManager(self.opts.display_manager));

        let active: Vec<_> = self
            .store
            .active_tracks()
            .into_iter()
            .map(|t| t.to_wire())
            .collect();
        if !active.is_empty() {
            let _ = msg.control.do_send(EndpointControl::NewTracks(active));
        }

        Ok(())
    }

    pub(crate) fn do_remove_endpoint(
        &mut self,
        id: &EndpointId,
        _ctx: &mut Context<Self>,
    ) {
        let Some(endpoint) = self.store.remove_endpoint(id) else {
            warn!("RemoveEndpoint: no such endpoint [id = {}]", id);
            return;
        };

        self.teardown_endpoint(&endpoint);
        self.endpoint_channels.remove(id);
    }

    /// Shared teardown for voluntary removal and crash containment: fans
    /// `RemoveTracks` out to every subscriber, tears down Tees, and cancels
    /// this endpoint's own pending subscriptions.
    pub(crate) fn teardown_endpoint(&mut self, endpoint: &Endpoint) {
        let track_ids: Vec<_> =
            endpoint.inbound_tracks().map(|t| t.id().clone()).collect();

        for other in self.store.endpoints() {
            if other.id() == endpoint.id() {
                continue;
            }
            let relevant: Vec<_> = track_ids
                .iter()
                .filter(|t| other.has_active_subscription(t))
                .cloned()
                .collect();
            if relevant.is_empty() {
                continue;
            }
            if let Some(chan) = self.endpoint_channels.get(other.id()) {
                let _ =
                    chan.do_send(EndpointControl::RemoveTracks(relevant));
            }
        }

        for track_id in &track_ids {
            self.graph.remove_tee(track_id);
        }
        self.graph.unlink_subscriber_everywhere(endpoint.id());

        self.pending_subscriptions
            .retain(|p| &p.endpoint_id != endpoint.id());
    }

    pub(crate) fn handle_endpoint_crash(
        &mut self,
        endpoint_id: EndpointId,
        ctx: &mut Context<Self>,
    ) {
        let peer_id = self.peer_id_of(&endpoint_id);
        if let Some(peer_id) = &peer_id {
            self.emit(OutgoingEvent::to(
                peer_id.clone(),
                Event::PeerRemoved {
                    peer_id: peer_id.clone(),
                    reason: "Internal server error".into(),
                },
            ));
        }
        self.registry
            .dispatch(EngineEvent::EndpointCrashed { endpoint_id: endpoint_id.clone() });

        if let Some(peer_id) = peer_id {
            self.do_remove_peer(peer_id, None, ctx);
        } else {
            self.do_remove_endpoint(&endpoint_id, ctx);
        }
    }

    pub(crate) fn do_remove_peer(
        &mut self,
        id: PeerId,
        reason: Option<String>,
        _ctx: &mut Context<Self>,
    ) {
        let Some(peer) = self.store.peer(&id) else {
            warn!("RemovePeer: no such peer [id = {}]", id);
            return;
        };
        let endpoint_id = peer.endpoint_id().cloned();

        if let Some(endpoint_id) = &endpoint_id {
            if let Some(endpoint) = self.store.endpoint(endpoint_id).cloned() {
                self.teardown_endpoint(&endpoint);
            }
            self.endpoint_channels.remove(endpoint_id);
        }

        self.store.remove_peer(&id);

        match reason {
            Some(reason) => {
                self.emit(OutgoingEvent::to(
                    id.clone(),
                    Event::PeerRemoved {
                        peer_id: id.clone(),
                        reason,
                    },
                ));
            }
            None => {
                self.emit(OutgoingEvent::broadcast(Event::PeerLeft {
                    peer_id: id.clone(),
                }));
            }
        }
        self.registry
            .dispatch(EngineEvent::PeerLeft { peer_id: id });
    }
}
