//! Simulcast encoding selection scenario (S4): a subscriber requests a
//! different layer, the owning endpoint is told to switch, and reports back
//! once applied.

use rtc_engine::signalling::{
    resolver::{EncodingSwitched, NewTrackDescriptor, Publish, SelectEncoding, Subscribe, TrackReady},
    room::*,
};
use rtc_engine_proto::{EndpointId, Event, MediaType, PeerId, Target, TrackFormat, TrackId};
use serde_json::Value as Json;

use crate::common::{media_events, spawn_endpoint, spawn_observer, start_room};

#[actix_rt::test]
async fn select_encoding_round_trips_through_owner_to_subscriber() {
    let room = start_room("s4");
    let (observer, events) = spawn_observer();
    room.send(Register(observer)).await.unwrap();

    let (owner_ctl, owner_received) = spawn_endpoint();
    let (sub_ctl, _) = spawn_endpoint();

    room.send(AddPeer {
        id: PeerId("owner".into()),
        metadata: Json::Null,
    })
    .await
    .unwrap();
    room.send(AddPeer {
        id: PeerId("viewer".into()),
        metadata: Json::Null,
    })
    .await
    .unwrap();

    room.send(AddEndpoint {
        endpoint_id: None,
        peer_id: Some(PeerId("owner".into())),
        node: None,
        control: owner_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(AddEndpoint {
        endpoint_id: None,
        peer_id: Some(PeerId("viewer".into())),
        node: None,
        control: sub_ctl,
    })
    .await
    .unwrap()
    .unwrap();

    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("owner".into()),
        tracks: vec![NewTrackDescriptor {
            id: TrackId("t1".into()),
            media_type: MediaType::Video,
            formats: vec![TrackFormat::Raw],
            simulcast_encodings: Some(vec!["low".into(), "mid".into(), "high".into()]),
            metadata: Json::Null,
        }],
    })
    .await
    .unwrap();
    // The "low" layer is merely the first to come up; the track still
    // offers all three declared encodings.
    room.send(TrackReady {
        track_id: TrackId("t1".into()),
        rid: Some("low".into()),
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();

    room.send(Subscribe {
        endpoint_id: EndpointId("viewer".into()),
        track_id: TrackId("t1".into()),
        format: TrackFormat::Raw,
        opts: Default::default(),
    })
    .await
    .unwrap()
    .unwrap();

    room.send(SelectEncoding {
        subscriber_id: EndpointId("viewer".into()),
        peer_id: PeerId("owner".into()),
        track_id: TrackId("t1".into()),
        encoding: "mid".into(),
    })
    .await
    .unwrap();

    let forwarded = owner_received.lock().unwrap();
    assert!(forwarded.iter().any(|c| matches!(
        c,
        EndpointControl::SelectEncoding { receiver_id, track_id, encoding }
            if receiver_id.0 == "viewer" && track_id.0 == "t1" && encoding == "mid"
    )));
    drop(forwarded);

    room.send(EncodingSwitched {
        track_id: TrackId("t1".into()),
        receiver_id: EndpointId("viewer".into()),
        encoding: "mid".into(),
    })
    .await
    .unwrap();

    let outgoing = media_events(&events);
    let switched = outgoing
        .iter()
        .find(|e| matches!(e.event, Event::EncodingSwitched { .. }))
        .expect("EncodingSwitched delivered to subscriber");
    assert_eq!(switched.to, Target::Peer(PeerId("viewer".into())));
    match &switched.event {
        Event::EncodingSwitched { peer_id, track_id, encoding } => {
            assert_eq!(peer_id.0, "owner");
            assert_eq!(track_id.0, "t1");
            assert_eq!(encoding, "mid");
        }
        _ => unreachable!(),
    }
}

#[actix_rt::test]
async fn select_encoding_ignored_when_subscriber_has_no_active_subscription() {
    let room = start_room("s4b");
    let (owner_ctl, owner_received) = spawn_endpoint();

    room.send(AddPeer {
        id: PeerId("owner".into()),
        metadata: Json::Null,
    })
    .await
    .unwrap();
    room.send(AddEndpoint {
        endpoint_id: None,
        peer_id: Some(PeerId("owner".into())),
        node: None,
        control: owner_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("owner".into()),
        tracks: vec![NewTrackDescriptor {
            id: TrackId("t1".into()),
            media_type: MediaType::Video,
            formats: vec![TrackFormat::Raw],
            simulcast_encodings: Some(vec!["low".into(), "mid".into(), "high".into()]),
            metadata: Json::Null,
        }],
    })
    .await
    .unwrap();
    room.send(TrackReady {
        track_id: TrackId("t1".into()),
        rid: Some("low".into()),
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();

    room.send(SelectEncoding {
        subscriber_id: EndpointId("never-subscribed".into()),
        peer_id: PeerId("owner".into()),
        track_id: TrackId("t1".into()),
        encoding: "mid".into(),
    })
    .await
    .unwrap();

    assert!(owner_received.lock().unwrap().is_empty());
}
