//! The [`Room`] actor: a single long-lived control actor per session,
//! tying together every component from §2 of the design.

use std::collections::HashMap;

use actix::{Actor, Context, Handler, Message, Recipient};
use bytes::Bytes;
use rtc_engine_proto::{EndpointId, OutgoingEvent, PeerId};
use serde_json::Value as Json;

use crate::{
    log::prelude::*,
    media::{Endpoint, Peer},
    signalling::{
        conf::SessionOpts,
        error::RoomError,
        graph::RoutingGraph,
        registry::{EngineEvent, Registry},
        state::SessionStateStore,
    },
};

/// A pending `join` awaiting an `AcceptPeer`/`DenyPeer` reply from the
/// application controller (§4.2, §9).
pub(crate) struct PendingJoin {
    pub metadata: Json,
}

/// Per-endpoint channel the Engine uses to deliver control notifications
/// (`SetDisplayManager`, `NewTracks`, `RemoveTracks`, `SelectEncoding`).
#[derive(Clone, Debug, Message)]
#[rtype(result = "()")]
pub enum EndpointControl {
    SetDisplayManager(bool),
    NewTracks(Vec<rtc_engine_proto::Track>),
    RemoveTracks(Vec<rtc_engine_proto::TrackId>),
    SelectEncoding {
        receiver_id: EndpointId,
        track_id: rtc_engine_proto::TrackId,
        encoding: String,
    },
    /// Pass-through of a `custom` Media Event (§4.6) to the endpoint that
    /// owns the sending peer.
    Custom(Json),
}

/// The Engine's single control actor for one session.
pub struct Room {
    pub(crate) id: String,
    pub(crate) opts: SessionOpts,
    pub(crate) store: SessionStateStore,
    pub(crate) graph: RoutingGraph,
    pub(crate) registry: Registry,
    pub(crate) endpoint_channels: HashMap<EndpointId, Recipient<EndpointControl>>,
    pub(crate) awaiting_decision: HashMap<PeerId, PendingJoin>,
    pub(crate) pending_subscriptions: Vec<crate::signalling::resolver::PendingSubscription>,
}

impl Room {
    #[must_use]
    pub fn new(opts: SessionOpts) -> Self {
        Self {
            id: opts.id.clone(),
            opts,
            store: SessionStateStore::new(),
            graph: RoutingGraph::new(),
            registry: Registry::new(),
            endpoint_channels: HashMap::new(),
            awaiting_decision: HashMap::new(),
            pending_subscriptions: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Dispatches `event` targeted at `to` through the Registry.
    pub(crate) fn emit(&self, event: OutgoingEvent) {
        self.registry.dispatch(EngineEvent::MediaEvent(event));
    }
}

impl Actor for Room {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("Room [id = {}] started", self.id);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("Room [id = {}] stopped", self.id);
    }
}

/// `Register(observer)` — subscribes an observer to every [`EngineEvent`]
/// dispatched by this [`Room`] (§4.7).
#[derive(Message)]
#[rtype(result = "()")]
pub struct Register(pub Recipient<EngineEvent>);

impl Handler<Register> for Room {
    type Result = ();

    fn handle(&mut self, msg: Register, _: &mut Self::Context) {
        self.registry.register(msg.0);
    }
}

/// `Unregister(observer)`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Unregister(pub Recipient<EngineEvent>);

impl Handler<Unregister> for Room {
    type Result = ();

    fn handle(&mut self, msg: Unregister, _: &mut Self::Context) {
        self.registry.unregister(&msg.0);
    }
}

/// `AddPeer(peer)` — inserts a peer directly into the Session State Store,
/// bypassing the admission handshake. Used internally once `AcceptPeer`
/// resolves a pending `join`, and available directly for application
/// controllers that perform their own out-of-band admission.
#[derive(Message)]
#[rtype(result = "()")]
pub struct AddPeer {
    pub id: PeerId,
    pub metadata: Json,
}

impl Handler<AddPeer> for Room {
    type Result = ();

    fn handle(&mut self, msg: AddPeer, _: &mut Self::Context) {
        self.store.add_peer(Peer::new(msg.id, msg.metadata));
    }
}

/// `RemovePeer(id, reason?)`.
///
/// `reason: None` models a voluntary leave (S5): the removal is broadcast
/// as `peerLeft`. `reason: Some(_)` models a forced removal (e.g. the tail
/// end of the crash-containment path, §4.3): only the affected peer is
/// notified, via a targeted `peerRemoved`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RemovePeer {
    pub id: PeerId,
    pub reason: Option<String>,
}

impl Handler<RemovePeer> for Room {
    type Result = ();

    fn handle(&mut self, msg: RemovePeer, ctx: &mut Self::Context) {
        self.do_remove_peer(msg.id, msg.reason, ctx);
    }
}

/// `AddEndpoint(descriptor, opts)`.
///
/// Fails with [`RoomError::InvalidArguments`] if both `endpoint_id` and
/// `peer_id` are given. If `peer_id` is given but does not resolve to an
/// existing peer, the request is dropped with a warning (§4.3; left
/// unresolved by the source per an Open Question — see `DESIGN.md`).
#[derive(Message)]
#[rtype(result = "Result<(), RoomError>")]
pub struct AddEndpoint {
    pub endpoint_id: Option<EndpointId>,
    pub peer_id: Option<PeerId>,
    pub node: Option<String>,
    pub control: Recipient<EndpointControl>,
}

impl Handler<AddEndpoint> for Room {
    type Result = Result<(), RoomError>;

    fn handle(
        &mut self,
        msg: AddEndpoint,
        ctx: &mut Self::Context,
    ) -> Self::Result {
        self.do_add_endpoint(msg, ctx)
    }
}

/// `RemoveEndpoint(id)`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct RemoveEndpoint {
    pub id: EndpointId,
}

impl Handler<RemoveEndpoint> for Room {
    type Result = ();

    fn handle(&mut self, msg: RemoveEndpoint, ctx: &mut Self::Context) {
        self.do_remove_endpoint(&msg.id, ctx);
    }
}

/// `AcceptPeer(id)`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct AcceptPeer {
    pub id: PeerId,
}

impl Handler<AcceptPeer> for Room {
    type Result = ();

    fn handle(&mut self, msg: AcceptPeer, ctx: &mut Self::Context) {
        self.do_accept_peer(msg.id, ctx);
    }
}

/// `DenyPeer(id, data?)`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct DenyPeer {
    pub id: PeerId,
    pub data: Option<Json>,
}

impl Handler<DenyPeer> for Room {
    type Result = ();

    fn handle(&mut self, msg: DenyPeer, _: &mut Self::Context) {
        self.do_deny_peer(msg.id, msg.data);
    }
}

/// `ReceiveMediaEvent(peer_id, bytes)` — inbound frame from the signaling
/// transport, fed to the Media Event Codec & Dispatcher.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ReceiveMediaEvent {
    pub peer_id: PeerId,
    pub bytes: Bytes,
}

impl Handler<ReceiveMediaEvent> for Room {
    type Result = ();

    fn handle(&mut self, msg: ReceiveMediaEvent, ctx: &mut Self::Context) {
        self.dispatch_media_event(msg.peer_id, &msg.bytes, ctx);
    }
}
