//! HTTP half of the transport demonstration (§10.5): a small REST surface
//! standing in for "the registered application controller" (§4.2) that a
//! real deployment would wire to its own auth/admission logic.
//!
//! Grounded on this codebase's REST Control API server pattern: a
//! `Data<AppState>`-scoped `actix-web` handler per verb, returning a plain
//! JSON `Response`.

use actix_web::{
    web::{Data, Path},
    HttpResponse,
};
use rtc_engine_proto::{EndpointId, PeerId};
use serde::Serialize;

use crate::{
    api::AppState,
    signalling::room::{AcceptPeer, DenyPeer, RemoveEndpoint},
};

/// Plain status response returned by every control endpoint below.
#[derive(Serialize)]
struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Response {
    fn ok() -> HttpResponse {
        HttpResponse::Ok().json(Self { error: None })
    }

    fn bad_request(error: impl ToString) -> HttpResponse {
        HttpResponse::BadRequest().json(Self {
            error: Some(error.to_string()),
        })
    }
}

/// `POST /control/{room_id}/peer/{peer_id}/accept` — application decision
/// half of the admission handshake (§4.2).
pub async fn accept_peer(
    path: Path<(String, String)>,
    state: Data<AppState>,
) -> HttpResponse {
    let (room_id, peer_id) = path.into_inner();
    let room = state.get_or_create_room(&room_id);
    room.do_send(AcceptPeer {
        id: PeerId(peer_id),
    });
    Response::ok()
}

/// `POST /control/{room_id}/peer/{peer_id}/deny` — the other half of the
/// admission handshake; carries no `data` payload in this minimal surface.
pub async fn deny_peer(
    path: Path<(String, String)>,
    state: Data<AppState>,
) -> HttpResponse {
    let (room_id, peer_id) = path.into_inner();
    let room = state.get_or_create_room(&room_id);
    room.do_send(DenyPeer {
        id: PeerId(peer_id),
        data: None,
    });
    Response::ok()
}

/// `POST /control/{room_id}/endpoint/{endpoint_id}` — adds a Standalone
/// Endpoint (one with no attached peer) to `room_id`, e.g. a recorder or an
/// HLS writer driven entirely by the application rather than a connecting
/// peer.
///
/// This demonstration has no out-of-band channel for such an endpoint's own
/// control notifications, so it is rejected: real standalone endpoints are
/// expected to hold their own `Recipient<EndpointControl>` and call
/// `AddEndpoint` directly against the `Room` address rather than through
/// this REST surface.
pub async fn add_endpoint(path: Path<(String, String)>) -> HttpResponse {
    let (_room_id, _endpoint_id) = path.into_inner();
    Response::bad_request(
        "standalone endpoint administration requires a direct Room address; \
         not available over this demonstration REST surface",
    )
}

/// `DELETE /control/{room_id}/endpoint/{endpoint_id}`.
pub async fn remove_endpoint(
    path: Path<(String, String)>,
    state: Data<AppState>,
) -> HttpResponse {
    let (room_id, endpoint_id) = path.into_inner();
    let room = state.get_or_create_room(&room_id);
    room.do_send(RemoveEndpoint {
        id: EndpointId(endpoint_id),
    });
    Response::ok()
}
