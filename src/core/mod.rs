//! Core module - query engine, repository and configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod materialize;
pub mod order;
pub mod repository;
pub mod resource;

pub use catalog::QueryName;
pub use config::Config;
pub use error::RepoError;
pub use filter::{compile_filter, ListFilter, Predicate};
pub use materialize::{materialize, parse_timestamp};
pub use order::{compile_order, SortField};
pub use repository::{Database, Repository};
pub use resource::{Resource, Status};
