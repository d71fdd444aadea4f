//! Track Publication & Subscription Resolver scenarios (S3) and the
//! pending-subscription fulfillment path.

use rtc_engine::signalling::{
    resolver::{NewTrackDescriptor, Publish, Subscribe, TrackReady},
    room::*,
    RoomError,
};
use rtc_engine_proto::{EndpointId, Event, MediaType, PeerId, Target, TrackFormat, TrackId};
use serde_json::Value as Json;

use crate::common::{media_events, spawn_endpoint, spawn_observer, start_room};

/// Standalone endpoints (no attached peer) sidestep the peer-admission
/// handshake entirely, which these tests have no need to drive.
fn standalone(id: &str) -> Option<EndpointId> {
    Some(EndpointId(id.into()))
}

fn track(id: &str) -> NewTrackDescriptor {
    NewTrackDescriptor {
        id: TrackId(id.into()),
        media_type: MediaType::Video,
        formats: vec![TrackFormat::Raw, TrackFormat::Remote("rtp".into())],
        simulcast_encodings: None,
        metadata: Json::Null,
    }
}

#[actix_rt::test]
async fn publishing_notifies_other_endpoints_with_inactive_track() {
    let room = start_room("s3a");
    let (pub_ctl, _) = spawn_endpoint();
    let (sub_ctl, sub_received) = spawn_endpoint();

    room.send(AddEndpoint {
        endpoint_id: standalone("publisher"),
        peer_id: None,
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(AddEndpoint {
        endpoint_id: standalone("subscriber"),
        peer_id: None,
        node: None,
        control: sub_ctl,
    })
    .await
    .unwrap()
    .unwrap();

    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![track("t1")],
    })
    .await
    .unwrap();

    let received = sub_received.lock().unwrap();
    let saw_new_tracks = received.iter().any(|c| {
        matches!(c, EndpointControl::NewTracks(tracks) if tracks.iter().any(|t| t.id.0 == "t1" && !t.active))
    });
    assert!(saw_new_tracks, "subscriber endpoint should learn of the new (inactive) track");
}

#[actix_rt::test]
async fn track_ready_broadcasts_tracks_added() {
    let room = start_room("s3a2");
    let (observer, events) = spawn_observer();
    room.send(Register(observer)).await.unwrap();

    let (pub_ctl, _) = spawn_endpoint();
    room.send(AddPeer {
        id: PeerId("publisher".into()),
        metadata: Json::Null,
    })
    .await
    .unwrap();
    room.send(AddEndpoint {
        endpoint_id: None,
        peer_id: Some(PeerId("publisher".into())),
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();

    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![track("t1")],
    })
    .await
    .unwrap();

    // Still inactive: publishing alone must not broadcast `tracksAdded`.
    assert!(media_events(&events)
        .iter()
        .all(|e| !matches!(e.event, Event::TracksAdded { .. })));

    room.send(TrackReady {
        track_id: TrackId("t1".into()),
        rid: None,
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();

    let outgoing = media_events(&events);
    let added = outgoing
        .iter()
        .find(|e| matches!(e.event, Event::TracksAdded { .. }))
        .expect("tracksAdded broadcast once the track becomes active");
    assert_eq!(added.to, Target::Broadcast);
    match &added.event {
        Event::TracksAdded {
            peer_id,
            track_id_to_metadata,
        } => {
            assert_eq!(peer_id.0, "publisher");
            assert!(track_id_to_metadata.contains_key(&TrackId("t1".into())));
        }
        _ => unreachable!(),
    }
}

#[actix_rt::test]
async fn subscribe_before_track_ready_is_fulfilled_once_ready() {
    let room = start_room("s3b");
    let (pub_ctl, _) = spawn_endpoint();

    room.send(AddEndpoint {
        endpoint_id: standalone("publisher"),
        peer_id: None,
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![track("t1")],
    })
    .await
    .unwrap();

    let subscribe_fut = room.send(Subscribe {
        endpoint_id: EndpointId("viewer".into()),
        track_id: TrackId("t1".into()),
        format: TrackFormat::Remote("rtp".into()),
        opts: Default::default(),
    });

    room.send(rtc_engine::signalling::resolver::TrackReady {
        track_id: TrackId("t1".into()),
        rid: None,
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();

    let result = subscribe_fut.await.unwrap();
    assert!(result.is_ok(), "pending subscription should resolve once the track becomes ready");
}

#[actix_rt::test]
async fn multiple_pending_subscriptions_all_drain_on_track_ready() {
    let room = start_room("s3b2");
    let (pub_ctl, _) = spawn_endpoint();

    room.send(AddEndpoint {
        endpoint_id: standalone("publisher"),
        peer_id: None,
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![track("t1")],
    })
    .await
    .unwrap();

    // Three subscribers queue up against the same not-yet-ready track,
    // in this order; §8 invariant 2 requires them to drain FIFO.
    let first = room.send(Subscribe {
        endpoint_id: EndpointId("viewer-a".into()),
        track_id: TrackId("t1".into()),
        format: TrackFormat::Remote("rtp".into()),
        opts: Default::default(),
    });
    let second = room.send(Subscribe {
        endpoint_id: EndpointId("viewer-b".into()),
        track_id: TrackId("t1".into()),
        format: TrackFormat::Remote("rtp".into()),
        opts: Default::default(),
    });
    let third = room.send(Subscribe {
        endpoint_id: EndpointId("viewer-c".into()),
        track_id: TrackId("t1".into()),
        format: TrackFormat::Remote("rtp".into()),
        opts: Default::default(),
    });

    room.send(rtc_engine::signalling::resolver::TrackReady {
        track_id: TrackId("t1".into()),
        rid: None,
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();

    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());
    assert!(third.await.unwrap().is_ok());
}

#[actix_rt::test]
async fn subscribe_to_already_active_track_resolves_immediately() {
    let room = start_room("s3c");
    let (pub_ctl, _) = spawn_endpoint();

    room.send(AddEndpoint {
        endpoint_id: standalone("publisher"),
        peer_id: None,
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![track("t1")],
    })
    .await
    .unwrap();
    room.send(rtc_engine::signalling::resolver::TrackReady {
        track_id: TrackId("t1".into()),
        rid: None,
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();

    let result = room
        .send(Subscribe {
            endpoint_id: EndpointId("viewer".into()),
            track_id: TrackId("t1".into()),
            format: TrackFormat::Raw,
            opts: Default::default(),
        })
        .await
        .unwrap();
    assert!(result.is_ok());
}

#[actix_rt::test]
async fn subscribe_rejects_unknown_track() {
    let room = start_room("s3d");
    let result = room
        .send(Subscribe {
            endpoint_id: EndpointId("viewer".into()),
            track_id: TrackId("nonexistent".into()),
            format: TrackFormat::Raw,
            opts: Default::default(),
        })
        .await
        .unwrap();
    assert!(matches!(result, Err(RoomError::InvalidTrackId(_))));
}

#[actix_rt::test]
async fn subscribe_rejects_unsupported_format() {
    let room = start_room("s3e");
    let (pub_ctl, _) = spawn_endpoint();
    room.send(AddEndpoint {
        endpoint_id: standalone("publisher"),
        peer_id: None,
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![NewTrackDescriptor {
            id: TrackId("t1".into()),
            media_type: MediaType::Video,
            formats: vec![TrackFormat::Remote("rtp".into())],
            simulcast_encodings: None,
            metadata: Json::Null,
        }],
    })
    .await
    .unwrap();

    let result = room
        .send(Subscribe {
            endpoint_id: EndpointId("viewer".into()),
            track_id: TrackId("t1".into()),
            format: TrackFormat::Raw,
            opts: Default::default(),
        })
        .await
        .unwrap();
    assert!(matches!(result, Err(RoomError::InvalidFormat(_))));
}

#[actix_rt::test]
async fn removing_tracks_notifies_active_subscribers_and_broadcasts() {
    let room = start_room("s3f");
    let (pub_ctl, _) = spawn_endpoint();
    let (sub_ctl, sub_received) = spawn_endpoint();

    room.send(AddEndpoint {
        endpoint_id: standalone("publisher"),
        peer_id: None,
        node: None,
        control: pub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(AddEndpoint {
        endpoint_id: standalone("subscriber"),
        peer_id: None,
        node: None,
        control: sub_ctl,
    })
    .await
    .unwrap()
    .unwrap();
    room.send(Publish::NewTracks {
        endpoint_id: EndpointId("publisher".into()),
        tracks: vec![track("t1")],
    })
    .await
    .unwrap();
    room.send(rtc_engine::signalling::resolver::TrackReady {
        track_id: TrackId("t1".into()),
        rid: None,
        encoding: "vp8".into(),
        depayloading_filter: "vp8-depay".into(),
    })
    .await
    .unwrap();
    room.send(Subscribe {
        endpoint_id: EndpointId("subscriber".into()),
        track_id: TrackId("t1".into()),
        format: TrackFormat::Raw,
        opts: Default::default(),
    })
    .await
    .unwrap()
    .unwrap();

    room.send(Publish::RemovedTracks {
        endpoint_id: EndpointId("publisher".into()),
        track_ids: vec![TrackId("t1".into())],
    })
    .await
    .unwrap();

    let received = sub_received.lock().unwrap();
    assert!(received.iter().any(|c| matches!(
        c,
        EndpointControl::RemoveTracks(ids) if ids.iter().any(|id| id.0 == "t1")
    )));
}
