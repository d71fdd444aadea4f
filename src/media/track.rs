//! [`Track`] definition.

use rtc_engine_proto::{EndpointId, MediaType, TrackFormat, TrackId};
use serde_json::Value as Json;

/// A published media track, as tracked by the Session State Store.
///
/// Referenceable by subscribers only once [`Track::mark_ready`] has been
/// called; before that, it exists only as an inactive placeholder created by
/// `publish(new_tracks)` and subscriptions against it are held pending.
#[derive(Clone, Debug)]
pub struct Track {
    id: TrackId,
    owner: EndpointId,
    media_type: MediaType,
    encoding: String,
    formats: Vec<TrackFormat>,
    simulcast_encodings: Option<Vec<String>>,
    active: bool,
    metadata: Json,
    depayloading_filter: Option<String>,
}

impl Track {
    /// Creates a new inactive track placeholder, as merged by `publish`.
    ///
    /// `simulcast_encodings`, if given, is the full set of layer identifiers
    /// the publisher declares up front; it does not change as individual
    /// layers later report ready (see [`Track::mark_ready`]).
    #[must_use]
    pub fn new_inactive(
        id: TrackId,
        owner: EndpointId,
        media_type: MediaType,
        formats: Vec<TrackFormat>,
        simulcast_encodings: Option<Vec<String>>,
        metadata: Json,
    ) -> Self {
        Self {
            id,
            owner,
            media_type,
            encoding: String::new(),
            formats,
            simulcast_encodings,
            active: false,
            metadata,
            depayloading_filter: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TrackId {
        &self.id
    }

    #[must_use]
    pub fn owner(&self) -> &EndpointId {
        &self.owner
    }

    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    #[must_use]
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    #[must_use]
    pub fn formats(&self) -> &[TrackFormat] {
        &self.formats
    }

    #[must_use]
    pub fn accepts_format(&self, format: &TrackFormat) -> bool {
        self.formats.contains(format)
    }

    #[must_use]
    pub fn simulcast_encodings(&self) -> Option<&[String]> {
        self.simulcast_encodings.as_deref()
    }

    #[must_use]
    pub fn is_simulcast(&self) -> bool {
        self.simulcast_encodings.is_some()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn metadata(&self) -> &Json {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: Json) {
        self.metadata = metadata;
    }

    #[must_use]
    pub fn depayloading_filter(&self) -> Option<&str> {
        self.depayloading_filter.as_deref()
    }

    /// Records the result of the owning endpoint's `track_ready`
    /// notification: the negotiated encoding and the depayloading filter
    /// descriptor. The track's simulcast layer set was already fixed at
    /// publish time (see [`Track::new_inactive`]) and is left untouched, so
    /// repeated `track_ready` calls for different layers of the same
    /// simulcast track never shrink the offered encoding set.
    pub fn mark_ready(&mut self, encoding: String, depayloading_filter: String) {
        self.encoding = encoding;
        self.depayloading_filter = Some(depayloading_filter);
        self.active = true;
    }

    /// Converts this track to its wire-level snapshot representation.
    #[must_use]
    pub fn to_wire(&self) -> rtc_engine_proto::Track {
        rtc_engine_proto::Track {
            id: self.id.clone(),
            owner: self.owner.clone(),
            media_type: self.media_type,
            encoding: self.encoding.clone(),
            formats: self.formats.clone(),
            simulcast_encodings: self.simulcast_encodings.clone(),
            active: self.active,
            metadata: self.metadata.clone(),
        }
    }
}
