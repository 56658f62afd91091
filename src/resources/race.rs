//! Race resource

use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::catalog::QueryName;
use crate::core::filter::{ListFilter, Predicate};
use crate::core::materialize::timestamp_column;
use crate::core::order::SortField;
use crate::core::resource::{Resource, Status};

const LIST_QUERY: &str =
    "SELECT id, meeting_id, name, number, visible, advertised_start_time FROM races";

/// A race as listed to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Race {
    pub id: i64,
    pub meeting_id: i64,
    pub name: String,
    pub number: i64,
    pub visible: bool,
    pub advertised_start_time: DateTime<Utc>,
    /// Derived on read from `advertised_start_time`
    pub status: Status,
}

/// Optional constraints for listing races
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceFilter {
    pub meeting_ids: Vec<i64>,
    pub visible: Option<bool>,
}

impl ListFilter for RaceFilter {
    fn predicates(&self) -> Vec<Predicate> {
        let mut predicates = vec![Predicate::membership("meeting_id", &self.meeting_ids)];

        if let Some(visible) = self.visible {
            predicates.push(Predicate::equals("visible", visible));
        }

        predicates
    }
}

impl Resource for Race {
    const NAME: &'static str = "race";
    const TABLE: &'static str = "races";
    const SCHEMA: &'static str = "CREATE TABLE IF NOT EXISTS races (id INTEGER PRIMARY KEY, meeting_id INTEGER, name TEXT, number INTEGER, visible INTEGER, advertised_start_time DATETIME)";
    const SORTABLE: &'static [SortField] = &[
        ("name", "name"),
        ("number", "number"),
        ("advertised_start_time", "advertised_start_time"),
    ];

    type Filter = RaceFilter;

    fn query(name: QueryName) -> &'static str {
        match name {
            QueryName::List => LIST_QUERY,
        }
    }

    fn from_row(row: &Row<'_>, now: DateTime<Utc>) -> rusqlite::Result<Self> {
        let advertised_start_time = timestamp_column(row, 5)?;

        Ok(Race {
            id: row.get(0)?,
            meeting_id: row.get(1)?,
            name: row.get(2)?,
            number: row.get(3)?,
            visible: row.get(4)?,
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
