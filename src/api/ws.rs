//! WebSocket half of the transport demonstration (§10.5): one [`WsSession`]
//! per connecting `(room_id, peer_id)`, relaying inbound text frames into
//! [`ReceiveMediaEvent`] and outbound [`Event`]s back as text frames.
//!
//! Grounded on this codebase's `WsSession` pattern for a `StreamHandler`
//! actor over `actix-web-actors`: ping/pong keep-alive via
//! `ctx.run_interval`, JSON text frames in both directions, and forwarding
//! into the owning actor's address.

use std::time::Duration;

use actix::{
    fut::wrap_future, Actor, ActorContext, ActorFutureExt, Addr,
    AsyncContext, Handler, StreamHandler,
};
use actix_web::{
    web::{Data, Path, Payload},
    Error, HttpRequest, HttpResponse,
};
use actix_web_actors::ws;
use bytes::Bytes;
use rtc_engine_proto::{Event, OutgoingEvent, PeerId, Target};

use crate::{
    api::AppState,
    log::prelude::*,
    signalling::{
        registry::EngineEvent,
        room::{AddEndpoint, EndpointControl, ReceiveMediaEvent, Register, Room, Unregister},
    },
};

/// Handles the HTTP upgrade request, spinning up (or reusing) the `room_id`
/// [`Room`] and attaching a fresh [`WsSession`] as its `peer_id` Peer
/// Endpoint.
///
/// # Errors
///
/// Errors if the WebSocket handshake fails for any underlying reason.
pub async fn create_ws(
    request: HttpRequest,
    path: Path<(String, String)>,
    state: Data<AppState>,
    payload: Payload,
) -> Result<HttpResponse, Error> {
    let (room_id, peer_id) = path.into_inner();
    let room = state.get_or_create_room(&room_id);
    let ping_interval = state.conf.engine.ws_ping_interval;

    ws::start(
        WsSession {
            room,
            peer_id: PeerId(peer_id),
            ping_interval,
            last_ping_num: 0,
        },
        &request,
        payload,
    )
}

/// A WebSocket connection standing in for a Peer's signaling channel and,
/// for the purposes of this demonstration, its Peer Endpoint's control
/// channel as well (§3: a Peer Endpoint's id equals its Peer's id).
struct WsSession {
    room: Addr<Room>,
    peer_id: PeerId,
    ping_interval: Duration,
    last_ping_num: u32,
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.room.do_send(Register(ctx.address().recipient()));

        let peer_id = self.peer_id.clone();
        ctx.spawn(wrap_future(
            self.room.send(AddEndpoint {
                endpoint_id: None,
                peer_id: Some(peer_id.clone()),
                node: None,
                control: ctx.address().recipient(),
            }),
        ).map(move |res, _: &mut Self, _| {
            match res {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(
                    "AddEndpoint for peer [id = {}] rejected: {}",
                    peer_id, e,
                ),
                Err(e) => warn!("Room mailbox error: {}", e),
            }
        }));

        let interval = self.ping_interval;
        ctx.run_interval(interval, |this: &mut WsSession, ctx| {
            this.last_ping_num += 1;
            ctx.ping(&this.last_ping_num.to_be_bytes());
        });
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        self.room.do_send(Unregister(ctx.address().recipient()));
    }
}

impl Handler<EngineEvent> for WsSession {
    type Result = ();

    /// Forwards only [`EngineEvent::MediaEvent`]s targeted at this session's
    /// peer, either directly or via broadcast; `NewPeer`/`PeerLeft`/
    /// `EndpointCrashed` are application-controller concerns delivered to
    /// whichever observer plays that role, not to peer-facing sessions.
    fn handle(&mut self, msg: EngineEvent, ctx: &mut Self::Context) {
        if let EngineEvent::MediaEvent(OutgoingEvent { to, event }) = msg {
            let targeted = match &to {
                Target::Broadcast => true,
                Target::Peer(id) => *id == self.peer_id,
            };
            if targeted {
                send_event(ctx, &event);
            }
        }
    }
}

impl Handler<EndpointControl> for WsSession {
    type Result = ();

    /// Only [`EndpointControl::Custom`] has wire significance here: the
    /// media-plane wiring hints (`NewTracks`, `RemoveTracks`,
    /// `SetDisplayManager`, `SelectEncoding`) are addressed to whatever
    /// schedules this endpoint's actual media workload, which this
    /// demonstration does not implement.
    fn handle(&mut self, msg: EndpointControl, ctx: &mut Self::Context) {
        match msg {
            EndpointControl::Custom(data) => send_event(ctx, &Event::Custom(data)),
            other => debug!(
                "Endpoint [id = {}] control (no media plane to apply it to): {:?}",
                self.peer_id, other,
            ),
        }
    }
}

fn send_event(ctx: &mut ws::WebsocketContext<WsSession>, event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => ctx.text(json),
        Err(e) => error!("Failed to serialize outbound Event: {}", e),
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(
        &mut self,
        msg: Result<ws::Message, ws::ProtocolError>,
        ctx: &mut Self::Context,
    ) {
        match msg {
            Ok(ws::Message::Ping(ping)) => ctx.pong(&ping),
            Ok(ws::Message::Pong(_)) => {}
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Text(text)) => {
                self.room.do_send(ReceiveMediaEvent {
                    peer_id: self.peer_id.clone(),
                    bytes: Bytes::copy_from_slice(text.as_bytes()),
                });
            }
            Ok(other) => {
                warn!("Unsupported WS message from peer [id = {}]: {:?}", self.peer_id, other);
            }
            Err(e) => error!("WS protocol error for peer [id = {}]: {}", self.peer_id, e),
        }
    }
}
