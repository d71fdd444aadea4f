//! Transport demonstration (ambient, §10.5): a thin [`actix-web`] /
//! [`actix-web-actors`] binding over the [`Room`] actor's message API.
//!
//! Nothing in the signalling layer depends on this module; it exists only so
//! the Engine is runnable as an actual service instead of only a library. A
//! host embedding `rtc-engine` as a dependency is free to ignore this module
//! and drive [`Room`]'s message API directly from its own transport.
//!
//! [`Room`]: crate::signalling::Room

pub mod control;
pub mod ws;

use std::{collections::HashMap, sync::Mutex};

use actix::Addr;
use actix_web::{middleware, web, App, HttpServer};

use crate::{
    conf::Conf,
    log::prelude::*,
    signalling::{room::Room, SessionOpts},
};

/// Shared state of the demonstration [`actix-web`] server: the process-level
/// [`Conf`] plus a lazily-populated table of running [`Room`]s keyed by
/// session id.
///
/// This is a convenience of the demonstration binding, not an Engine
/// concept: §1 scopes "any specific transport" out, and the Engine itself
/// has no notion of a cross-session registry.
pub struct AppState {
    conf: Conf,
    rooms: Mutex<HashMap<String, Addr<Room>>>,
}

impl AppState {
    #[must_use]
    pub fn new(conf: Conf) -> Self {
        Self {
            conf,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the [`Room`] for `room_id`, spinning up a fresh one with
    /// default [`SessionOpts`] if this is the first reference to that id.
    ///
    /// A host with real admission policy would instead expose an explicit
    /// `Start(opts)` administration call; this lazily-created default is a
    /// demonstration convenience only.
    pub fn get_or_create_room(&self, room_id: &str) -> Addr<Room> {
        let mut rooms = self.rooms.lock().unwrap();
        rooms
            .entry(room_id.to_owned())
            .or_insert_with(|| {
                info!("Starting Room [id = {}]", room_id);
                Room::new(SessionOpts {
                    id: room_id.to_owned(),
                    ..SessionOpts::default()
                })
                .start()
            })
            .clone()
    }
}

/// Runs the demonstration HTTP/WebSocket server described by §10.5.
///
/// # Errors
///
/// Errors if the configured bind address cannot be bound.
pub async fn run(conf: Conf) -> std::io::Result<()> {
    let bind_addr = (conf.server.bind_ip, conf.server.bind_port);
    let state = web::Data::new(AppState::new(conf));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .service(
                web::resource("/ws/{room_id}/{peer_id}")
                    .route(web::get().to(ws::create_ws)),
            )
            .service(
                web::resource("/control/{room_id}/peer/{peer_id}/accept")
                    .route(web::post().to(control::accept_peer)),
            )
            .service(
                web::resource("/control/{room_id}/peer/{peer_id}/deny")
                    .route(web::post().to(control::deny_peer)),
            )
            .service(
                web::resource("/control/{room_id}/endpoint/{endpoint_id}")
                    .route(web::post().to(control::add_endpoint))
                    .route(web::delete().to(control::remove_endpoint)),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
