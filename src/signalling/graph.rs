//! Routing Graph Builder: per-track fan-out nodes ("Tees") and their
//! subscriber branches.
//!
//! This module only tracks *which* nodes exist and how they are wired; it
//! does not move media itself (the data plane is out of scope, §1). Each
//! mutation here is meant to be applied atomically alongside the state-store
//! mutation that triggered it — callers stage the `Track` update and the
//! graph update together and only then notify observers, satisfying the
//! "graph edits as specs" design note.

use std::collections::{HashMap, HashSet};

use rtc_engine_proto::{EndpointId, TrackId};

use crate::log::prelude::*;

/// Kind of fan-out node created for an active track.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TeeKind {
    /// Selects a simulcast layer per subscriber.
    Simulcast,
    /// Throttles output under subscriber feedback (Display Manager mode).
    Filter,
    /// Plain broadcast fan-out.
    Push,
}

impl TeeKind {
    /// Chooses a node kind per §4.5's table.
    #[must_use]
    pub fn select(is_simulcast: bool, display_manager: bool) -> Self {
        if is_simulcast {
            Self::Simulcast
        } else if display_manager {
            Self::Filter
        } else {
            Self::Push
        }
    }
}

/// A per-track fan-out node plus its subscriber branches.
///
/// A raw-format branch (`Tee → depayloading filter → raw Push Tee`) is
/// constructed at most once per track, lazily on first `raw`-format
/// subscriber.
#[derive(Clone, Debug)]
pub struct Tee {
    kind: TeeKind,
    /// Subscribers attached directly to this Tee (non-`raw` branches).
    direct_subscribers: HashSet<EndpointId>,
    /// Subscribers attached to the lazily-created raw Push Tee.
    raw_subscribers: HashSet<EndpointId>,
    raw_branch_created: bool,
}

impl Tee {
    #[must_use]
    fn new(kind: TeeKind) -> Self {
        Self {
            kind,
            direct_subscribers: HashSet::new(),
            raw_subscribers: HashSet::new(),
            raw_branch_created: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> TeeKind {
        self.kind
    }

    #[must_use]
    pub fn has_raw_branch(&self) -> bool {
        self.raw_branch_created
    }

    /// Links `subscriber` to this Tee, materializing the raw-format branch
    /// first if `raw` is requested and it does not exist yet.
    pub fn link(&mut self, subscriber: EndpointId, raw: bool) {
        if raw {
            self.raw_branch_created = true;
            self.raw_subscribers.insert(subscriber);
        } else {
            self.direct_subscribers.insert(subscriber);
        }
    }

    pub fn unlink(&mut self, subscriber: &EndpointId) {
        self.direct_subscribers.remove(subscriber);
        self.raw_subscribers.remove(subscriber);
    }

    #[must_use]
    pub fn has_subscriber(&self, subscriber: &EndpointId) -> bool {
        self.direct_subscribers.contains(subscriber)
            || self.raw_subscribers.contains(subscriber)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.direct_subscribers.len() + self.raw_subscribers.len()
    }
}

/// Owns every [`Tee`] of a session, keyed by the track it fans out.
#[derive(Clone, Debug, Default)]
pub struct RoutingGraph {
    tees: HashMap<TrackId, Tee>,
}

impl RoutingGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tee(&self, track_id: &TrackId) -> Option<&Tee> {
        self.tees.get(track_id)
    }

    /// Creates the Tee for `track_id` if one does not already exist.
    pub fn get_or_create_tee(
        &mut self,
        track_id: TrackId,
        is_simulcast: bool,
        display_manager: bool,
    ) -> &mut Tee {
        self.tees.entry(track_id.clone()).or_insert_with(|| {
            let kind = TeeKind::select(is_simulcast, display_manager);
            debug!("Created {:?} Tee for track [id = {}]", kind, track_id);
            Tee::new(kind)
        })
    }

    /// Removes the Tee (and any raw branch) for a track that was removed.
    pub fn remove_tee(&mut self, track_id: &TrackId) -> Option<Tee> {
        self.tees.remove(track_id)
    }

    /// Removes `subscriber` from every Tee it is linked to, e.g. when its
    /// endpoint is removed or crashes.
    pub fn unlink_subscriber_everywhere(&mut self, subscriber: &EndpointId) {
        for tee in self.tees.values_mut() {
            tee.unlink(subscriber);
        }
    }
}
