//! Integration tests driving [`Room`](rtc_engine::signalling::Room)
//! actors directly, per the testing pattern in §10.4: no transport is
//! involved, only the message API the transport demonstration itself uses.

mod common;

mod admission;
mod encoding_selection;
mod publish_subscribe;
