//! Track Publication & Subscription Resolver (§4.4): validates
//! subscriptions, fulfills them when tracks become ready, and maintains the
//! pending set.

use std::time::Duration;

use actix::{Handler, Message};
use rtc_engine_proto::{
    EndpointId, Event, MediaType, OutgoingEvent, PeerId, TrackFormat, TrackId,
};
use serde_json::Value as Json;
use tokio::sync::oneshot;

use crate::{
    log::prelude::*,
    media::{subscription::SubscriptionOpts, Subscription, Track},
    signalling::{
        error::RoomError,
        room::{EndpointControl, Room},
    },
};

/// A subscription held in the pending set, awaiting its target track
/// becoming ready. Drained in insertion order (§3, §8 invariant 2).
pub struct PendingSubscription {
    pub endpoint_id: EndpointId,
    pub track_id: TrackId,
    pub format: TrackFormat,
    pub opts: SubscriptionOpts,
    pub notify: oneshot::Sender<Result<(), RoomError>>,
}

/// `Subscribe(endpoint_id, track_id, format, opts)`.
///
/// Resolves once the subscription is fulfilled or rejected; surfaces
/// [`RoomError::SubscribeTimeout`] if neither happens within 5 seconds
/// (§4.4, §5).
#[derive(Message)]
#[rtype(result = "Result<(), RoomError>")]
pub struct Subscribe {
    pub endpoint_id: EndpointId,
    pub track_id: TrackId,
    pub format: TrackFormat,
    pub opts: SubscriptionOpts,
}

impl Handler<Subscribe> for Room {
    type Result = actix::ResponseFuture<Result<(), RoomError>>;

    fn handle(&mut self, msg: Subscribe, _: &mut Self::Context) -> Self::Result {
        match self.validate_and_fulfill_or_pend(
            msg.endpoint_id,
            msg.track_id,
            msg.format,
            msg.opts,
        ) {
            Ok(None) => Box::pin(async { Ok(()) }),
            Err(e) => Box::pin(async move { Err(e) }),
            Ok(Some(rx)) => Box::pin(async move {
                match tokio::time::timeout(Duration::from_secs(5), rx).await {
                    Ok(Ok(result)) => result,
                    Ok(Err(_)) => Err(RoomError::SubscribeTimeout),
                    Err(_) => Err(RoomError::SubscribeTimeout),
                }
            }),
        }
    }
}

/// `{track_ready, track_id, rid?, encoding, depayloading_filter}`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct TrackReady {
    pub track_id: TrackId,
    pub rid: Option<String>,
    pub encoding: String,
    pub depayloading_filter: String,
}

impl Handler<TrackReady> for Room {
    type Result = ();

    fn handle(&mut self, msg: TrackReady, _: &mut Self::Context) {
        self.handle_track_ready(msg);
    }
}

/// A newly published track descriptor, prior to it becoming ready.
///
/// `simulcast_encodings` declares the full set of layer identifiers the
/// publisher intends to send, if any; it is fixed here and is not replaced
/// by later per-layer `track_ready` reports (§4.4, §4.5).
#[derive(Clone, Debug)]
pub struct NewTrackDescriptor {
    pub id: TrackId,
    pub media_type: MediaType,
    pub formats: Vec<TrackFormat>,
    pub simulcast_encodings: Option<Vec<String>>,
    pub metadata: Json,
}

/// `{publish, {new_tracks | removed_tracks, [Track]}}`.
pub enum Publish {
    NewTracks {
        endpoint_id: EndpointId,
        tracks: Vec<NewTrackDescriptor>,
    },
    RemovedTracks {
        endpoint_id: EndpointId,
        track_ids: Vec<TrackId>,
    },
}

impl Message for Publish {
    type Result = ();
}

impl Handler<Publish> for Room {
    type Result = ();

    fn handle(&mut self, msg: Publish, _: &mut Self::Context) {
        match msg {
            Publish::NewTracks { endpoint_id, tracks } => {
                self.handle_publish_new_tracks(endpoint_id, tracks);
            }
            Publish::RemovedTracks {
                endpoint_id,
                track_ids,
            } => self.handle_publish_removed_tracks(endpoint_id, track_ids),
        }
    }
}

/// `{select_encoding, peer_id, track_id, encoding}`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SelectEncoding {
    pub subscriber_id: EndpointId,
    pub peer_id: PeerId,
    pub track_id: TrackId,
    pub encoding: String,
}

impl Handler<SelectEncoding> for Room {
    type Result = ();

    fn handle(&mut self, msg: SelectEncoding, _: &mut Self::Context) {
        self.handle_select_encoding(msg);
    }
}

/// `{encoding_switched, receiver_id, encoding}` reported by a Simulcast Tee.
#[derive(Message)]
#[rtype(result = "()")]
pub struct EncodingSwitched {
    pub track_id: TrackId,
    pub receiver_id: EndpointId,
    pub encoding: String,
}

impl Handler<EncodingSwitched> for Room {
    type Result = ();

    fn handle(&mut self, msg: EncodingSwitched, _: &mut Self::Context) {
        let owner = self
            .store
            .track(&msg.track_id)
            .map(|t| t.owner().clone());
        let Some(owner_peer) = owner.and_then(|o| self.peer_id_of(&o)) else {
            warn!("EncodingSwitched for unknown track [id = {}]", msg.track_id);
            return;
        };
        self.emit(OutgoingEvent::to(
            PeerId::from(&msg.receiver_id),
            Event::EncodingSwitched {
                peer_id: owner_peer,
                track_id: msg.track_id,
                encoding: msg.encoding,
            },
        ));
    }
}

impl Room {
    /// Looks up the `PeerId` that an endpoint is attached to, if it is a
    /// Peer Endpoint.
    pub(crate) fn peer_id_of(&self, endpoint_id: &EndpointId) -> Option<PeerId> {
        self.store
            .endpoint(endpoint_id)
            .and_then(|e| e.peer_id())
            .cloned()
    }

    fn validate_and_fulfill_or_pend(
        &mut self,
        endpoint_id: EndpointId,
        track_id: TrackId,
        format: TrackFormat,
        opts: SubscriptionOpts,
    ) -> Result<Option<oneshot::Receiver<Result<(), RoomError>>>, RoomError>
    {
        let track = self
            .store
            .track(&track_id)
            .ok_or_else(|| RoomError::InvalidTrackId(track_id.clone()))?;

        if !track.accepts_format(&format) {
            return Err(RoomError::InvalidFormat(track_id));
        }

        if let Some(enc) = &opts.default_simulcast_encoding {
            if track.is_simulcast()
                && !track
                    .simulcast_encodings()
                    .unwrap_or_default()
                    .iter()
                    .any(|e| e == enc)
            {
                return Err(RoomError::InvalidDefaultSimulcastEncoding(
                    track_id,
                    enc.clone(),
                ));
            }
        }

        if track.is_active() && self.graph.tee(&track_id).is_some() {
            self.fulfill_subscription(
                endpoint_id,
                track_id,
                format,
                opts,
            );
            return Ok(None);
        }

        let (tx, rx) = oneshot::channel();
        self.pending_subscriptions.push(PendingSubscription {
            endpoint_id,
            track_id,
            format,
            opts,
            notify: tx,
        });
        Ok(Some(rx))
    }

    fn fulfill_subscription(
        &mut self,
        endpoint_id: EndpointId,
        track_id: TrackId,
        format: TrackFormat,
        opts: SubscriptionOpts,
    ) {
        let display_manager = self.opts.display_manager;
        let is_simulcast = self
            .store
            .track(&track_id)
            .map_or(false, Track::is_simulcast);
        let tee = self.graph.get_or_create_tee(
            track_id.clone(),
            is_simulcast,
            display_manager,
        );
        tee.link(endpoint_id.clone(), format.is_raw());

        let mut sub = Subscription::new_pending(
            endpoint_id.clone(),
            track_id,
            format,
            opts,
        );
        sub.activate();
        if let Some(ep) = self.store.endpoint_mut(&endpoint_id) {
            ep.add_subscription(sub);
        }
    }

    fn handle_track_ready(&mut self, msg: TrackReady) {
        let Some(track) = self.store.track_mut(&msg.track_id) else {
            warn!("track_ready for unknown track [id = {}]", msg.track_id);
            return;
        };
        if let Some(rid) = &msg.rid {
            let declared = track
                .simulcast_encodings()
                .map_or(false, |encs| encs.iter().any(|e| e == rid));
            if !declared {
                warn!(
                    "track_ready: rid {} for track [id = {}] is not among \
                     its declared simulcast encodings",
                    rid, msg.track_id,
                );
            }
        }
        track.mark_ready(msg.encoding, msg.depayloading_filter);
        let is_simulcast = track.is_simulcast();
        let owner = track.owner().clone();
        let track_metadata = track.metadata().clone();

        let display_manager = self.opts.display_manager;
        let _ = self.graph.get_or_create_tee(
            msg.track_id.clone(),
            is_simulcast,
            display_manager,
        );

        let (matching, rest): (Vec<_>, Vec<_>) = self
            .pending_subscriptions
            .drain(..)
            .partition(|p| p.track_id == msg.track_id);
        self.pending_subscriptions = rest;

        for pending in matching {
            let PendingSubscription {
                endpoint_id,
                track_id,
                format,
                opts,
                notify,
            } = pending;

            let tee = self
                .graph
                .get_or_create_tee(track_id.clone(), is_simulcast, display_manager);
            tee.link(endpoint_id.clone(), format.is_raw());

            let mut sub = Subscription::new_pending(
                endpoint_id.clone(),
                track_id,
                format,
                opts,
            );
            sub.activate();
            if let Some(ep) = self.store.endpoint_mut(&endpoint_id) {
                ep.add_subscription(sub);
            }
            let _ = notify.send(Ok(()));
        }

        if let Some(peer_id) = self.peer_id_of(&owner) {
            let mut track_id_to_metadata = std::collections::HashMap::new();
            track_id_to_metadata.insert(msg.track_id, track_metadata);
            self.emit(OutgoingEvent::broadcast(Event::TracksAdded {
                peer_id,
                track_id_to_metadata,
            }));
        }
    }

    fn handle_publish_new_tracks(
        &mut self,
        endpoint_id: EndpointId,
        tracks: Vec<NewTrackDescriptor>,
    ) {
        let ids: Vec<TrackId> = tracks.iter().map(|t| t.id.clone()).collect();
        for t in tracks {
            let track = Track::new_inactive(
                t.id,
                endpoint_id.clone(),
                t.media_type,
                t.formats,
                t.simulcast_encodings,
                t.metadata,
            );
            if let Some(ep) = self.store.endpoint_mut(&endpoint_id) {
                ep.add_inbound_track(track);
            }
        }

        self.notify_other_endpoints_new_tracks(&endpoint_id, &ids);
    }

    fn handle_publish_removed_tracks(
        &mut self,
        endpoint_id: EndpointId,
        track_ids: Vec<TrackId>,
    ) {
        for id in &track_ids {
            if let Some(ep) = self.store.endpoint_mut(&endpoint_id) {
                ep.remove_inbound_track(id);
            }
            self.graph.remove_tee(id);
        }

        self.notify_subscribers_remove_tracks(&endpoint_id, &track_ids);

        if let Some(peer_id) = self.peer_id_of(&endpoint_id) {
            self.emit(OutgoingEvent::broadcast(Event::TracksRemoved {
                peer_id,
                track_ids,
            }));
        }
    }

    fn notify_other_endpoints_new_tracks(
        &self,
        publisher: &EndpointId,
        track_ids: &[TrackId],
    ) {
        let tracks: Vec<_> = track_ids
            .iter()
            .filter_map(|id| self.store.track(id))
            .map(Track::to_wire)
            .collect();
        if tracks.is_empty() {
            return;
        }
        for id in self.store.endpoint_ids() {
            if id == publisher {
                continue;
            }
            if let Some(chan) = self.endpoint_channels.get(id) {
                let _ = chan
                    .do_send(EndpointControl::NewTracks(tracks.clone()));
            }
        }
    }

    fn notify_subscribers_remove_tracks(
        &self,
        publisher: &EndpointId,
        track_ids: &[TrackId],
    ) {
        for endpoint in self.store.endpoints() {
            if endpoint.id() == publisher {
                continue;
            }
            let has_sub = track_ids
                .iter()
                .any(|t| endpoint.has_active_subscription(t));
            if !has_sub {
                continue;
            }
            if let Some(chan) = self.endpoint_channels.get(endpoint.id()) {
                let _ = chan.do_send(EndpointControl::RemoveTracks(
                    track_ids.to_vec(),
                ));
            }
        }
    }

    pub(crate) fn handle_select_encoding(&mut self, msg: SelectEncoding) {
        let owner_endpoint: EndpointId = msg.peer_id.clone().into();
        let owns_track = self
            .store
            .track(&msg.track_id)
            .map_or(false, |t| t.owner() == &owner_endpoint);
        if !owns_track {
            warn!(
                "SelectEncoding: peer [id = {}] does not own track [id = {}]",
                msg.peer_id, msg.track_id,
            );
            return;
        }
        let has_sub = self
            .store
            .endpoint(&msg.subscriber_id)
            .map_or(false, |e| e.has_active_subscription(&msg.track_id));
        if !has_sub {
            warn!(
                "SelectEncoding: subscriber [id = {}] has no active \
                 subscription to track [id = {}]",
                msg.subscriber_id, msg.track_id,
            );
            return;
        }
        let offers_encoding = self
            .store
            .track(&msg.track_id)
            .and_then(Track::simulcast_encodings)
            .map_or(false, |encs| encs.iter().any(|e| *e == msg.encoding));
        if !offers_encoding {
            warn!(
                "SelectEncoding: track [id = {}] does not offer encoding {}",
                msg.track_id, msg.encoding,
            );
            return;
        }

        let owner: EndpointId = msg.peer_id.into();
        if let Some(chan) = self.endpoint_channels.get(&owner) {
            let _ = chan.do_send(EndpointControl::SelectEncoding {
                receiver_id: msg.subscriber_id,
                track_id: msg.track_id,
                encoding: msg.encoding,
            });
        }
    }
}
