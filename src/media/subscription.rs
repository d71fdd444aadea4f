//! [`Subscription`] definition.

use rtc_engine_proto::{EndpointId, TrackFormat, TrackId};

/// Status of a [`Subscription`] relative to its target track's readiness.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubscriptionStatus {
    /// The target track is not yet ready; held in the pending set.
    Pending,
    /// The target track is ready and a subscriber branch exists on its Tee.
    Active,
}

/// Options accompanying a `Subscribe` call.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionOpts {
    pub default_simulcast_encoding: Option<String>,
}

/// A subscriber's request for a specific track in a specific format.
///
/// At most one active `Subscription` exists per `(endpoint_id, track_id)`
/// pair; this is enforced by the Resolver, not by this type itself.
#[derive(Clone, Debug)]
pub struct Subscription {
    endpoint_id: EndpointId,
    track_id: TrackId,
    format: TrackFormat,
    opts: SubscriptionOpts,
    status: SubscriptionStatus,
}

impl Subscription {
    #[must_use]
    pub fn new_pending(
        endpoint_id: EndpointId,
        track_id: TrackId,
        format: TrackFormat,
        opts: SubscriptionOpts,
    ) -> Self {
        Self {
            endpoint_id,
            track_id,
            format,
            opts,
            status: SubscriptionStatus::Pending,
        }
    }

    #[must_use]
    pub fn endpoint_id(&self) -> &EndpointId {
        &self.endpoint_id
    }

    #[must_use]
    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }

    #[must_use]
    pub fn format(&self) -> &TrackFormat {
        &self.format
    }

    #[must_use]
    pub fn opts(&self) -> &SubscriptionOpts {
        &self.opts
    }

    #[must_use]
    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    pub fn activate(&mut self) {
        self.status = SubscriptionStatus::Active;
    }
}
