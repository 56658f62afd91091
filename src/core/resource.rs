//! Resource trait - the per-resource descriptor driving the query engine

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::Serialize;

use crate::core::catalog::QueryName;
use crate::core::filter::ListFilter;
use crate::core::order::SortField;

/// Common trait for every listable resource (races, events)
///
/// One implementation per table: it names the table and its DDL, lists the
/// sortable fields, supplies the base queries and knows how to turn a result
/// row into the domain object.
pub trait Resource: Serialize + Sized {
    /// Singular display name (e.g., "race")
    const NAME: &'static str;

    /// Backing table
    const TABLE: &'static str;

    /// `CREATE TABLE IF NOT EXISTS` statement for the backing table
    const SCHEMA: &'static str;

    /// Order-by allow-list: logical field name to column
    const SORTABLE: &'static [SortField];

    /// Per-request filter type
    type Filter: ListFilter;

    /// Base SQL for a catalogued query
    fn query(name: QueryName) -> &'static str;

    /// Build the domain object from a row selected by [`QueryName::List`]
    fn from_row(row: &Row<'_>, now: DateTime<Utc>) -> rusqlite::Result<Self>;

    /// Primary key
    fn id(&self) -> i64;

    /// Derived status at the time of the read
    fn status(&self) -> Status;
}

/// Derived open/closed state of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    /// Closed once the advertised start is strictly before `now`
    pub fn at(advertised_start: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if advertised_start < now {
            Status::Closed
        } else {
            Status::Open
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
