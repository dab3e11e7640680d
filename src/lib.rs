// Configuration loading and environment overrides
pub mod config;

// Error taxonomy
pub mod error;

// Inbound request envelope
pub mod skill;

// Outbound response builder
pub mod response;

// Place resolution via the geocoding service
pub mod geocode;

// Recent sightings: client and spoken summary
pub mod sightings;

// Event and intent dispatch
pub mod intent;

// HTTP API
pub mod api;
