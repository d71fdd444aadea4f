//! [`Peer`] definition.

use rtc_engine_proto::{EndpointId, PeerId};
use serde_json::Value as Json;

/// A connected human participant.
///
/// Created on a successful `join`, destroyed on `leave`, explicit removal,
/// or its attached endpoint crashing. At most one [`Endpoint`] is attached
/// to a `Peer` — its Peer Endpoint — identified by the same id.
///
/// [`Endpoint`]: crate::media::Endpoint
#[derive(Clone, Debug)]
pub struct Peer {
    id: PeerId,
    metadata: Json,
    endpoint_id: Option<EndpointId>,
}

impl Peer {
    /// Creates a new `Peer` with no attached endpoint yet.
    #[must_use]
    pub fn new(id: PeerId, metadata: Json) -> Self {
        Self {
            id,
            metadata,
            endpoint_id: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &PeerId {
        &self.id
    }

    #[must_use]
    pub fn metadata(&self) -> &Json {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Json) {
        self.metadata = metadata;
    }

    #[must_use]
    pub fn endpoint_id(&self) -> Option<&EndpointId> {
        self.endpoint_id.as_ref()
    }

    pub fn attach_endpoint(&mut self, endpoint_id: EndpointId) {
        self.endpoint_id = Some(endpoint_id);
    }
}
