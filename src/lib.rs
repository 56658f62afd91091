//! Trackside: race and sports event listings
//!
//! Read-only listing services over a single-table-per-resource SQLite
//! store. A structured filter and a comma-separated order-by string are
//! compiled into one parameterized query; rows come back as typed records
//! with a status derived at read time.

pub mod cli;
pub mod core;
pub mod resources;
pub mod service;
