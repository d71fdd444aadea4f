//! Shared test scaffolding: a recording [`Observer`] and a recording
//! [`Endpoint`] that capture every [`EngineEvent`] / [`EndpointControl`]
//! they are sent, per this codebase's pattern (§10.4) of driving a [`Room`]
//! directly inside an `#[actix_rt::test]` rather than through a live
//! transport.

use std::sync::{Arc, Mutex};

use actix::{Actor, Addr, Context, Handler, Recipient};
use rtc_engine::signalling::{
    registry::EngineEvent,
    room::{EndpointControl, Room},
    SessionOpts,
};

/// Spins up a fresh [`Room`] with the given `id` and default options.
pub fn start_room(id: &str) -> Addr<Room> {
    Room::new(SessionOpts {
        id: id.to_owned(),
        ..SessionOpts::default()
    })
    .start()
}

/// Spins up a [`Room`] with a `display_manager` flag, as needed by Filter
/// Tee selection tests.
pub fn start_room_with(opts: SessionOpts) -> Addr<Room> {
    Room::new(opts).start()
}

/// Records every [`EngineEvent`] it receives, in order, behind a shared
/// handle so the driving test can assert on it after the fact.
#[derive(Default)]
pub struct Observer {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl Actor for Observer {
    type Context = Context<Self>;
}

impl Handler<EngineEvent> for Observer {
    type Result = ();

    fn handle(&mut self, msg: EngineEvent, _: &mut Self::Context) {
        self.events.lock().unwrap().push(msg);
    }
}

/// Starts a recording [`Observer`], returning its address (to
/// `Register`/`Unregister` with a [`Room`]) and a handle to its recorded
/// events.
pub fn spawn_observer() -> (Recipient<EngineEvent>, Arc<Mutex<Vec<EngineEvent>>>)
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let observer = Observer {
        events: Arc::clone(&events),
    };
    (observer.start().recipient(), events)
}

/// Records every [`EndpointControl`] it receives, standing in for a media
/// processing unit's control channel.
#[derive(Default)]
pub struct Endpoint {
    received: Arc<Mutex<Vec<EndpointControl>>>,
}

impl Actor for Endpoint {
    type Context = Context<Self>;
}

impl Handler<EndpointControl> for Endpoint {
    type Result = ();

    fn handle(&mut self, msg: EndpointControl, _: &mut Self::Context) {
        self.received.lock().unwrap().push(msg);
    }
}

/// Starts a recording [`Endpoint`], returning its address (to pass as
/// `AddEndpoint`'s `control` field) and a handle to its recorded controls.
pub fn spawn_endpoint(
) -> (Recipient<EndpointControl>, Arc<Mutex<Vec<EndpointControl>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let endpoint = Endpoint {
        received: Arc::clone(&received),
    };
    (endpoint.start().recipient(), received)
}

/// Extracts every [`rtc_engine_proto::OutgoingEvent`] recorded by an
/// [`Observer`], in order.
pub fn media_events(
    events: &Arc<Mutex<Vec<EngineEvent>>>,
) -> Vec<rtc_engine_proto::OutgoingEvent> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            EngineEvent::MediaEvent(oe) => Some(oe.clone()),
            _ => None,
        })
        .collect()
}
