//! Free-text place resolution for destination search.
//!
//! Wraps the external geocoding collaborator behind the [`GeocodeClient`]
//! trait. The production implementation is [`NominatimClient`], which
//! queries an OSM Nominatim-compatible endpoint. The session takes the
//! first candidate as authoritative and owns empty-input rejection and
//! "not found" classification.

mod client;
mod error;

pub use client::{GeocodeClient, NominatimClient, PlaceCandidate, DEFAULT_NOMINATIM_URL};
pub use error::GeocodeError;
