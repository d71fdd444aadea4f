//! Registry: an in-process pub/sub of [`EngineEvent`]s to external
//! observers.
//!
//! Dispatch is fire-and-forget (`do_send`): a slow or dead observer must
//! never back-pressure the Engine actor, so failures to deliver are logged
//! and otherwise ignored rather than retried.

use actix::Recipient;
use rtc_engine_proto::{EndpointId, OutgoingEvent, PeerId};

use crate::log::prelude::*;

/// A notification delivered to every registered observer of a [`Room`].
///
/// [`Room`]: crate::signalling::Room
#[derive(Clone, Debug, actix::Message)]
#[rtype(result = "()")]
pub enum EngineEvent {
    /// A peer requested admission; the application must reply with
    /// `AcceptPeer`/`DenyPeer`.
    NewPeer { peer_id: PeerId },
    /// A peer left the session (voluntarily, removed, or via endpoint
    /// crash).
    PeerLeft { peer_id: PeerId },
    /// An endpoint's failure domain terminated abnormally.
    EndpointCrashed { endpoint_id: EndpointId },
    /// An outbound Media Event, already targeted and ready for the
    /// dispatcher to hand to the transport.
    MediaEvent(OutgoingEvent),
}

/// Process-level observer table of a single [`Room`].
///
/// Registration is idempotent per `(Room, observer)`: registering the same
/// [`Recipient`] address twice does not duplicate deliveries (§8 invariant
/// 6), since [`Recipient`] addresses compare equal when they target the
/// same actor.
#[derive(Default)]
pub struct Registry {
    observers: Vec<Recipient<EngineEvent>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Recipient<EngineEvent>) {
        if self.observers.contains(&observer) {
            return;
        }
        self.observers.push(observer);
    }

    pub fn unregister(&mut self, observer: &Recipient<EngineEvent>) {
        self.observers.retain(|o| o != observer);
    }

    /// Fans `event` out to every registered observer, fire-and-forget.
    pub fn dispatch(&self, event: EngineEvent) {
        for observer in &self.observers {
            if observer.do_send(event.clone()).is_err() {
                warn!("Observer mailbox closed, dropping event");
            }
        }
    }
}
