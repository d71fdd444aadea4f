//! Peer Admission Controller scenarios (S1, S2) and the admission
//! handshake's ordering invariant (§8 invariant 3).

use rtc_engine::signalling::{registry::EngineEvent, room::*};
use rtc_engine_proto::{Event, PeerId, Target};

use crate::common::{media_events, spawn_observer, start_room};

#[actix_rt::test]
async fn accepted_peer_sees_accepted_before_joined_broadcast() {
    let room = start_room("s1");
    let (observer, events) = spawn_observer();
    room.send(Register(observer)).await.unwrap();

    room.send(ReceiveMediaEvent {
        peer_id: PeerId("alice".into()),
        bytes: br#"{"type":"join","data":{"metadata":{}}}"#.to_vec().into(),
    })
    .await
    .unwrap();

    assert!(matches!(
        events.lock().unwrap().last(),
        Some(EngineEvent::NewPeer { peer_id }) if peer_id.0 == "alice"
    ));

    room.send(AcceptPeer {
        id: PeerId("alice".into()),
    })
    .await
    .unwrap();

    let outgoing = media_events(&events);
    let accepted_idx = outgoing
        .iter()
        .position(|e| matches!(e.event, Event::PeerAccepted { .. }))
        .expect("PeerAccepted was emitted");
    let joined_idx = outgoing
        .iter()
        .position(|e| matches!(e.event, Event::PeerJoined { .. }))
        .expect("PeerJoined was emitted");
    assert!(accepted_idx < joined_idx);

    match &outgoing[accepted_idx].to {
        Target::Peer(id) => assert_eq!(id.0, "alice"),
        Target::Broadcast => panic!("PeerAccepted must be targeted, not broadcast"),
    }
    match &outgoing[accepted_idx].event {
        Event::PeerAccepted { peers_in_room, .. } => {
            assert!(peers_in_room.is_empty(), "newcomer must not see itself");
        }
        _ => unreachable!(),
    }
    assert_eq!(outgoing[joined_idx].to, Target::Broadcast);
}

#[actix_rt::test]
async fn second_peer_sees_first_peer_in_peers_in_room() {
    let room = start_room("s1b");
    let (observer, events) = spawn_observer();
    room.send(Register(observer)).await.unwrap();

    for peer in ["alice", "bob"] {
        room.send(ReceiveMediaEvent {
            peer_id: PeerId(peer.into()),
            bytes: br#"{"type":"join","data":{"metadata":{}}}"#.to_vec().into(),
        })
        .await
        .unwrap();
        room.send(AcceptPeer {
            id: PeerId(peer.into()),
        })
        .await
        .unwrap();
    }

    let outgoing = media_events(&events);
    let bob_accepted = outgoing
        .iter()
        .find_map(|e| match &e.event {
            Event::PeerAccepted { id, peers_in_room } if id.0 == "bob" => {
                Some(peers_in_room.clone())
            }
            _ => None,
        })
        .expect("bob was accepted");
    assert_eq!(bob_accepted.len(), 1);
    assert_eq!(bob_accepted[0].id.0, "alice");
}

#[actix_rt::test]
async fn denied_peer_gets_peer_denied_only() {
    let room = start_room("s2");
    let (observer, events) = spawn_observer();
    room.send(Register(observer)).await.unwrap();

    room.send(ReceiveMediaEvent {
        peer_id: PeerId("carol".into()),
        bytes: br#"{"type":"join","data":{"metadata":{}}}"#.to_vec().into(),
    })
    .await
    .unwrap();

    room.send(DenyPeer {
        id: PeerId("carol".into()),
        data: Some(serde_json::json!({"reason": "room full"})),
    })
    .await
    .unwrap();

    let outgoing = media_events(&events);
    assert_eq!(outgoing.len(), 1);
    match (&outgoing[0].to, &outgoing[0].event) {
        (Target::Peer(id), Event::PeerDenied(Some(data))) => {
            assert_eq!(id.0, "carol");
            assert_eq!(data["reason"], "room full");
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

#[actix_rt::test]
async fn accept_peer_with_no_pending_join_is_ignored() {
    let room = start_room("s1c");
    let (observer, events) = spawn_observer();
    room.send(Register(observer)).await.unwrap();

    room.send(AcceptPeer {
        id: PeerId("ghost".into()),
    })
    .await
    .unwrap();

    assert!(media_events(&events).is_empty());
}

#[actix_rt::test]
async fn duplicate_register_does_not_duplicate_deliveries() {
    let room = start_room("s1d");
    let (observer, events) = spawn_observer();
    room.send(Register(observer.clone())).await.unwrap();
    room.send(Register(observer)).await.unwrap();

    room.send(ReceiveMediaEvent {
        peer_id: PeerId("dave".into()),
        bytes: br#"{"type":"join","data":{"metadata":{}}}"#.to_vec().into(),
    })
    .await
    .unwrap();

    let new_peer_events = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| matches!(e, EngineEvent::NewPeer { .. }))
        .count();
    assert_eq!(new_peer_events, 1);
}
