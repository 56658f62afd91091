//! Service layer - request/response facades over the repositories
//!
//! These mirror the shape of the racing and sports RPC services: a request
//! carries an optional filter and an optional order-by string, and the
//! response wraps the listed resources. Transport is left to the caller.

pub mod racing;
pub mod sports;

pub use racing::{ListRacesRequest, ListRacesResponse, Racing, RacingService};
pub use sports::{GetEventRequest, ListEventsRequest, ListEventsResponse, Sports, SportsService};
