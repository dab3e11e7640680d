//! Event dispatch for the skill.
//!
//! Every turn is handled on its own: nothing is carried between turns and
//! session attributes always go back empty. The only turn that touches the
//! network is `GetBirdsWithPlace`, which geocodes then fetches sightings.

use crate::config::BirdFetcherConfig;
use crate::error::{MissingSlot, SkillError, UpstreamError};
use crate::geocode::{GeocodeClient, PlaceQuery};
use crate::response::{
    goodbye_response, retry_response, sightings_response, welcome_response, SkillResponse,
};
use crate::sightings::{place_label, summarize_sightings, ObservationClient};
use crate::skill::{Event, Intent, SkillRequest};
use anyhow::Result;
use tracing::{debug, info, warn};


pub const GET_BIRDS_INTENT: &str = "GetBirdsWithPlace";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";

pub const CITY_SLOT: &str = "City";
/// Slot name used by older interaction models for the same value
pub const LOCATION_SLOT: &str = "Location";
pub const STATE_SLOT: &str = "State";

pub struct IntentRouter {
    application_id: String,
    geocoder: GeocodeClient,
    observations: ObservationClient,
    max_results: u32,
}

impl IntentRouter {
    pub fn new(
        application_id: String,
        geocoder: GeocodeClient,
        observations: ObservationClient,
        max_results: u32,
    ) -> Self {
        Self {
            application_id,
            geocoder,
            observations,
            max_results,
        }
    }

    pub fn from_config(config: &BirdFetcherConfig) -> Result<Self> {
        Ok(Self::new(
            config.skill.application_id.clone(),
            GeocodeClient::new(&config.geocoding)?,
            ObservationClient::new(&config.observations)?,
            config.observations.max_results,
        ))
    }

    /// Handle one inbound request.
    ///
    /// `Ok(None)` means the event needs no reply (session ended). Errors are
    /// fatal for the turn: no response is produced.
    pub async fn handle(&self, request: &SkillRequest) -> Result<Option<SkillResponse>, SkillError> {
        request.verify_application(&self.application_id)?;

        let session_id = request.session.session_id.as_str();
        if request.session.new {
            info!(
                request_id = request.request.request_id().unwrap_or("-"),
                session_id,
                "Session started"
            );
        }

        match &request.request {
            Event::Launch { request_id } => {
                info!(request_id = %request_id, session_id, "Launch");
                Ok(Some(welcome_response()))
            }
            Event::Intent { request_id, intent } => {
                info!(request_id = %request_id, session_id, intent = %intent.name, "Intent");
                self.on_intent(intent).await.map(Some)
            }
            Event::SessionEnded { request_id, reason } => {
                info!(
                    request_id = %request_id,
                    session_id,
                    reason = reason.as_deref().unwrap_or("-"),
                    "Session ended"
                );
                Ok(None)
            }
            Event::Unsupported => Err(SkillError::UnsupportedRequest),
        }
    }

    async fn on_intent(&self, intent: &Intent) -> Result<SkillResponse, SkillError> {
        match intent.name.as_str() {
            GET_BIRDS_INTENT => Ok(self.get_bird_data(intent).await),
            HELP_INTENT => Ok(welcome_response()),
            CANCEL_INTENT | STOP_INTENT => Ok(goodbye_response()),
            other => Err(SkillError::UnrecognizedIntent(other.to_string())),
        }
    }

    async fn get_bird_data(&self, intent: &Intent) -> SkillResponse {
        let query = match place_query_from_intent(intent) {
            Ok(query) => query,
            Err(e) => {
                debug!(error = %e, "Location slot missing");
                return retry_response(&intent.name);
            }
        };

        match self.lookup_sightings(&query).await {
            Ok(speech) => sightings_response(&intent.name, &speech),
            Err(e) => {
                warn!(address = %query.address(), error = %e, "Sightings lookup failed");
                retry_response(&intent.name)
            }
        }
    }

    /// Geocode, fetch, and summarize. The two calls run strictly in order.
    async fn lookup_sightings(&self, query: &PlaceQuery) -> Result<String, UpstreamError> {
        let location = self.geocoder.resolve_place(query).await?;
        let records = self
            .observations
            .fetch_recent_sightings(location.latitude, location.longitude, self.max_results)
            .await?;

        info!(
            address = %query.address(),
            latitude = location.latitude,
            longitude = location.longitude,
            sightings = records.len(),
            "Sightings fetched"
        );

        let state = location.state.as_deref().or(query.state.as_deref());
        let place = place_label(&query.city, state);
        Ok(summarize_sightings(&records, &place))
    }
}

/// Build a [`PlaceQuery`] from the intent's slots. The city is required.
pub fn place_query_from_intent(intent: &Intent) -> Result<PlaceQuery, MissingSlot> {
    let city = intent
        .slot_value(CITY_SLOT)
        .or_else(|| intent.slot_value(LOCATION_SLOT))
        .ok_or(MissingSlot(CITY_SLOT))?;
    Ok(PlaceQuery::new(city, intent.slot_value(STATE_SLOT)))
}
