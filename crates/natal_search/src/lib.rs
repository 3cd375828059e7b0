//! Event search over an ephemeris provider.
//!
//! Every solver here follows the same shape: a coarse scan over the
//! requested range at a per-body cadence, then bisection refinement of
//! each bracketed crossing down to the configured precision. Solvers
//! take the provider as `&dyn EphemerisProvider`, so any source of
//! positions works, and the batch entry points fan bodies out across
//! scoped worker threads.

pub mod calendar;
pub mod config;
pub mod error;
pub mod ingress;
pub mod ingress_types;
pub mod solve;
pub mod station;
pub mod station_types;
pub mod transit;
pub mod transit_types;

pub use calendar::{YearCalendar, search_natal_transits, search_year_calendar, year_span};
pub use config::ScanConfig;
pub use error::SearchError;
pub use ingress::{next_ingress, search_ingresses, search_seasons, seasons_from_ingresses};
pub use ingress_types::{IngressEvent, Season, SeasonEvent};
pub use solve::bracket_and_solve;
pub use station::{next_station, search_stations};
pub use station_types::{StationDirection, StationEvent};
pub use transit::{search_transit_aspect, search_transit_aspects};
pub use transit_types::TransitAspectEvent;
