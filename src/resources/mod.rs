//! Resource definitions
//!
//! - [`Race`] - horse and greyhound races grouped by meeting
//! - [`Event`] - sports fixtures between a home and an away side

pub mod event;
pub mod race;

pub use event::{Event, EventFilter};
pub use race::{Race, RaceFilter};
