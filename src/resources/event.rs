//! Sports event resource

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::catalog::QueryName;
use crate::core::error::RepoError;
use crate::core::filter::{ListFilter, Predicate};
use crate::core::materialize::timestamp_column;
use crate::core::order::SortField;
use crate::core::repository::{single, Repository};
use crate::core::resource::{Resource, Status};

const LIST_QUERY: &str = "SELECT id, sport, league, home_side_name, away_side_name, visible, advertised_start_time FROM events";

/// Side columns a `sides` filter is matched against
const SIDE_COLUMNS: &[&str] = &["home_side_name", "away_side_name"];

/// A sports event as listed to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: i64,
    pub sport: String,
    pub league: i64,
    pub home_side_name: String,
    pub away_side_name: String,
    /// "<home> vs <away>"
    pub name: String,
    pub visible: bool,
    pub advertised_start_time: DateTime<Utc>,
    pub status: Status,
}

/// Optional constraints for listing events
///
/// `sides` matches either the home or the away side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub sports: Vec<String>,
    pub leagues: Vec<i64>,
    pub sides: Vec<String>,
    pub ids: Vec<i64>,
    pub visible: Option<bool>,
}

impl EventFilter {
    /// Filter matching a single id
    pub fn by_id(id: i64) -> Self {
        Self {
            ids: vec![id],
            ..Default::default()
        }
    }
}

impl ListFilter for EventFilter {
    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![
            Predicate::membership("sport", &self.sports),
            Predicate::membership("league", &self.leagues),
            Predicate::any_membership(SIDE_COLUMNS, &self.sides),
            Predicate::membership("id", &self.ids),
        ];

        if let Some(visible) = self.visible {
            predicates.push(Predicate::equals("visible", visible));
        }

        predicates
    }
}

impl Resource for Event {
    const NAME: &'static str = "event";
    const TABLE: &'static str = "events";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS events (id INTEGER PRIMARY KEY, sport TEXT, league INTEGER, home_side_name TEXT, away_side_name TEXT, visible INTEGER, advertised_start_time DATETIME)";
    const SORTABLE: &'static [SortField] = &[
        ("home_side_name", "home_side_name"),
        ("away_side_name", "away_side_name"),
        ("league", "league"),
        ("sport", "sport"),
        ("advertised_start_time", "advertised_start_time"),
    ];

    type Filter = EventFilter;

    fn query(name: QueryName) -> &'static str {
        match name {
            QueryName::List => LIST_QUERY,
        }
    }

    fn from_row(row: &Row<'_>, now: DateTime<Utc>) -> rusqlite::Result<Self> {
        let home_side_name: String = row.get(3)?;
        let away_side_name: String = row.get(4)?;
        let advertised_start_time = timestamp_column(row, 6)?;

        Ok(Event {
            id: row.get(0)?,
            sport: row.get(1)?,
            league: row.get(2)?,
            name: format!("{} vs {}", home_side_name, away_side_name),
            home_side_name,
            away_side_name,
            visible: row.get(5)?,
            advertised_start_time,
            status: Status::at(advertised_start_time, now),
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn status(&self) -> Status {
        self.status
    }
}

impl Repository<Event> {
    /// Fetch one event by id
    ///
    /// Goes through the normal list path with a single-id filter.
    pub fn get(&self, id: i64) -> Result<Event, RepoError> {
        debug!(id, "getting event");
        let events = self.list(Some(&EventFilter::by_id(id)), None)?;
        single(events, id)
    }
}
