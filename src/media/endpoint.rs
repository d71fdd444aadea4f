//! [`Endpoint`] definition.

use std::collections::HashMap;

use rtc_engine_proto::{EndpointId, PeerId, TrackId};

use crate::media::{Subscription, Track};

/// A deployment locality hint carried by `AddEndpoint` options. Opaque to
/// the Engine; forwarded verbatim to whatever schedules endpoint workloads.
pub type Node = String;

/// A media processing unit that publishes and/or subscribes to tracks.
///
/// Two kinds exist, distinguished only by whether `peer_id` is set: a
/// **Peer Endpoint** is attached 1:1 to a [`Peer`](crate::media::Peer) (its
/// id equals that peer's id); a **Standalone Endpoint** is not attached to
/// any peer (e.g. a recorder or an HLS writer).
#[derive(Clone, Debug)]
pub struct Endpoint {
    id: EndpointId,
    peer_id: Option<PeerId>,
    node: Option<Node>,
    inbound_tracks: HashMap<TrackId, Track>,
    subscriptions: HashMap<TrackId, Subscription>,
}

impl Endpoint {
    #[must_use]
    pub fn new(
        id: EndpointId,
        peer_id: Option<PeerId>,
        node: Option<Node>,
    ) -> Self {
        Self {
            id,
            peer_id,
            node,
            inbound_tracks: HashMap::new(),
            subscriptions: HashMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &EndpointId {
        &self.id
    }

    #[must_use]
    pub fn peer_id(&self) -> Option<&PeerId> {
        self.peer_id.as_ref()
    }

    #[must_use]
    pub fn is_peer_endpoint(&self) -> bool {
        self.peer_id.is_some()
    }

    #[must_use]
    pub fn node(&self) -> Option<&str> {
        self.node.as_deref()
    }

    #[must_use]
    pub fn inbound_tracks(&self) -> impl Iterator<Item = &Track> {
        self.inbound_tracks.values()
    }

    #[must_use]
    pub fn active_inbound_tracks(&self) -> impl Iterator<Item = &Track> {
        self.inbound_tracks.values().filter(|t| t.is_active())
    }

    #[must_use]
    pub fn inbound_track(&self, id: &TrackId) -> Option<&Track> {
        self.inbound_tracks.get(id)
    }

    #[must_use]
    pub fn inbound_track_mut(&mut self, id: &TrackId) -> Option<&mut Track> {
        self.inbound_tracks.get_mut(id)
    }

    pub fn add_inbound_track(&mut self, track: Track) {
        self.inbound_tracks.insert(track.id().clone(), track);
    }

    pub fn remove_inbound_track(&mut self, id: &TrackId) -> Option<Track> {
        self.inbound_tracks.remove(id)
    }

    #[must_use]
    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.subscriptions.values()
    }

    #[must_use]
    pub fn subscription(&self, track_id: &TrackId) -> Option<&Subscription> {
        self.subscriptions.get(track_id)
    }

    #[must_use]
    pub fn subscription_mut(
        &mut self,
        track_id: &TrackId,
    ) -> Option<&mut Subscription> {
        self.subscriptions.get_mut(track_id)
    }

    #[must_use]
    pub fn has_active_subscription(&self, track_id: &TrackId) -> bool {
        self.subscriptions
            .get(track_id)
            .map_or(false, Subscription::is_active)
    }

    pub fn add_subscription(&mut self, sub: Subscription) {
        self.subscriptions.insert(sub.track_id().clone(), sub);
    }

    pub fn remove_subscription(
        &mut self,
        track_id: &TrackId,
    ) -> Option<Subscription> {
        self.subscriptions.remove(track_id)
    }
}
