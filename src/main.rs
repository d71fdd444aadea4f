//! `rtc-engine` process entry point: loads [`Conf`](rtc_engine::conf::Conf)
//! and runs the transport demonstration server (§10.5).
//!
//! This binary is illustrative: an embedding application would instead
//! depend on the `rtc-engine` library and drive
//! [`Room`](rtc_engine::signalling::Room) directly from its own transport.

use rtc_engine::{api, conf::Conf, log};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _log_guard = log::new();

    let conf = match Conf::parse(std::env::args().nth(1).as_deref()) {
        Ok(conf) => conf,
        Err(e) => {
            eprintln!("Failed to parse configuration: {}", e);
            std::process::exit(1);
        }
    };

    api::run(conf).await
}
