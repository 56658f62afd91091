//! Repository - composes catalog, filter, order and materialization
//!
//! A [`Database`] owns the one connection shared by every repository in the
//! process. A [`Repository`] is cheap: it holds an `Arc` to the database and
//! a one-time initialisation gate for its own table.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use rusqlite::Connection;
use tracing::{debug, info, instrument};

use crate::core::catalog::QueryName;
use crate::core::error::RepoError;
use crate::core::filter::compile_filter;
use crate::core::materialize::materialize;
use crate::core::order::compile_order;
use crate::core::resource::Resource;

/// The shared SQLite connection
///
/// SQLite does its own locking; the mutex only serialises use of the single
/// `Connection` handle between threads.
pub struct Database {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open (or create) a database file
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self, RepoError> {
        let conn = Connection::open(path).map_err(RepoError::Open)?;
        conn.busy_timeout(busy_timeout).map_err(RepoError::Open)?;

        // WAL lets concurrent readers proceed while another process writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(RepoError::Open)?;

        debug!(path = %path.display(), ?busy_timeout, "opened database");

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, RepoError> {
        let conn = Connection::open_in_memory().map_err(RepoError::Open)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` with exclusive use of the connection
    pub fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let conn = self.conn.lock().map_err(|_| RepoError::Poisoned)?;
        f(&conn)
    }
}

/// Read-only access to one resource table
pub struct Repository<R: Resource> {
    db: Arc<Database>,
    init: OnceLock<Result<(), String>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            init: OnceLock::new(),
            _resource: PhantomData,
        }
    }

    pub fn database(&self) -> &Arc<Database> {
        &self.db
    }

    /// Create the backing table
    ///
    /// Only the first call does any work. Later calls return the first
    /// call's outcome, including its error.
    pub fn init(&self) -> Result<(), RepoError> {
        let outcome = self.init.get_or_init(|| {
            info!(resource = R::NAME, table = R::TABLE, "initialising repository");
            self.db
                .with_connection(|conn| conn.execute_batch(R::SCHEMA).map_err(RepoError::Query))
                .map_err(|e| e.to_string())
        });

        outcome.clone().map_err(|message| RepoError::Init {
            resource: R::NAME,
            message,
        })
    }

    /// List rows matching `filter`, ordered by `order_by`
    #[instrument(level = "debug", skip_all, fields(resource = R::NAME))]
    pub fn list(&self, filter: Option<&R::Filter>, order_by: Option<&str>) -> Result<Vec<R>, RepoError> {
        let name = QueryName::List;
        let (query, args) = compile_filter(R::query(name), filter);
        let query = compile_order(&query, order_by, R::SORTABLE);

        debug!(query = %name, sql = %query, args = args.len(), "compiled list query");

        let items = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&query).map_err(RepoError::Query)?;
            materialize::<R>(&mut stmt, &args)
        })?;

        debug!(rows = items.len(), "listed");
        Ok(items)
    }
}

/// Exactly one result or the matching error
pub(crate) fn single<R: Resource>(mut items: Vec<R>, id: i64) -> Result<R, RepoError> {
    match items.len() {
        0 => Err(RepoError::NotFound {
            resource: R::NAME,
            id,
        }),
        1 => Ok(items.remove(0)),
        count => Err(RepoError::Ambiguous {
            resource: R::NAME,
            id,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::Status;
    use crate::resources::{Event, EventFilter, Race, RaceFilter};
    use chrono::{Duration, Utc};
    use rusqlite::params;

    fn memory_db() -> Arc<Database> {
        Arc::new(Database::open_in_memory().unwrap())
    }

    fn insert_race(db: &Database, id: i64, meeting_id: i64, name: &str, number: i64, visible: bool, start_offset_hours: i64) {
        let start = (Utc::now() + Duration::hours(start_offset_hours)).to_rfc3339();
        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO races (id, meeting_id, name, number, visible, advertised_start_time) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, meeting_id, name, number, visible, start],
            )
            .map_err(RepoError::Query)
        })
        .unwrap();
    }

    fn insert_event(db: &Database, id: i64, sport: &str, league: i64, home: &str, away: &str) {
        let start = (Utc::now() + Duration::hours(2)).to_rfc3339();
        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO events (id, sport, league, home_side_name, away_side_name, visible, advertised_start_time) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
                params![id, sport, league, home, away, start],
            )
            .map_err(RepoError::Query)
        })
        .unwrap();
    }

    fn race_repo() -> Repository<Race> {
        let repo = Repository::<Race>::new(memory_db());
        repo.init().unwrap();
        insert_race(repo.database(), 1, 10, "Bravo", 2, true, -1);
        insert_race(repo.database(), 2, 10, "Alpha", 1, false, 1);
        insert_race(repo.database(), 3, 20, "Charlie", 3, true, 3);
        repo
    }

    fn event_repo() -> Repository<Event> {
        let repo = Repository::<Event>::new(memory_db());
        repo.init().unwrap();
        insert_event(repo.database(), 1, "football", 3, "Ash", "Birch");
        insert_event(repo.database(), 2, "tennis", 12, "Cedar", "Ash");
        insert_event(repo.database(), 3, "hockey", 25, "Dogwood", "Elm");
        repo
    }

    fn ids<R: Resource>(items: &[R]) -> Vec<i64> {
        items.iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_init_is_idempotent() {
        let repo = Repository::<Race>::new(memory_db());
        repo.init().unwrap();
        insert_race(repo.database(), 1, 1, "Only", 1, true, 1);

        // A second init must not recreate or clear the table
        repo.init().unwrap();
        assert_eq!(repo.list(None, None).unwrap().len(), 1);
    }

    #[test]
    fn test_init_error_is_sticky() {
        let db = memory_db();
        let set_query_only = |on: bool| {
            db.with_connection(|conn| {
                conn.pragma_update(None, "query_only", on)
                    .map_err(RepoError::Query)
            })
            .unwrap();
        };

        let repo = Repository::<Race>::new(Arc::clone(&db));
        set_query_only(true);
        let first = repo.init();
        assert!(matches!(first, Err(RepoError::Init { resource: "race", .. })));

        // The store is writable again, but the gate has already closed
        set_query_only(false);
        let second = repo.init();
        assert_eq!(
            first.unwrap_err().to_string(),
            second.unwrap_err().to_string()
        );
        assert!(matches!(repo.list(None, None), Err(RepoError::Query(_))));
    }

    #[test]
    fn test_list_unfiltered_returns_all() {
        let repo = race_repo();
        let mut races = repo.list(None, None).unwrap();
        races.sort_by_key(|r| r.id);
        assert_eq!(ids(&races), vec![1, 2, 3]);
    }

    #[test]
    fn test_list_filter_and_order() {
        let repo = race_repo();
        let filter = RaceFilter {
            meeting_ids: vec![10],
            visible: None,
        };
        let races = repo.list(Some(&filter), Some("name")).unwrap();
        assert_eq!(ids(&races), vec![2, 1]);

        let races = repo.list(Some(&filter), Some("number desc")).unwrap();
        assert_eq!(ids(&races), vec![1, 2]);
    }

    #[test]
    fn test_list_visible_filter() {
        let repo = race_repo();
        let filter = RaceFilter {
            visible: Some(true),
            ..Default::default()
        };
        let races = repo.list(Some(&filter), Some("advertised_start_time")).unwrap();
        assert_eq!(ids(&races), vec![1, 3]);
        assert!(races.iter().all(|r| r.visible));
    }

    #[test]
    fn test_list_derives_status() {
        let repo = race_repo();
        let races = repo.list(None, Some("advertised_start_time")).unwrap();
        let statuses: Vec<Status> = races.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![Status::Closed, Status::Open, Status::Open]);
    }

    #[test]
    fn test_list_empty_result_is_ok() {
        let repo = race_repo();
        let filter = RaceFilter {
            meeting_ids: vec![999],
            visible: None,
        };
        assert!(repo.list(Some(&filter), None).unwrap().is_empty());
    }

    #[test]
    fn test_list_unknown_order_is_ignored() {
        let repo = race_repo();
        let races = repo.list(None, Some("id; DROP TABLE races")).unwrap();
        assert_eq!(races.len(), 3);
    }

    #[test]
    fn test_list_side_matches_home_or_away() {
        let repo = event_repo();
        let filter = EventFilter {
            sides: vec!["Ash".into()],
            ..Default::default()
        };
        let events = repo.list(Some(&filter), Some("sport")).unwrap();
        assert_eq!(ids(&events), vec![1, 2]);
        assert_eq!(events[0].name, "Ash vs Birch");
    }

    #[test]
    fn test_list_events_combined_filters() {
        let repo = event_repo();
        let filter = EventFilter {
            sports: vec!["football".into(), "hockey".into()],
            leagues: vec![25],
            ..Default::default()
        };
        assert_eq!(ids(&repo.list(Some(&filter), None).unwrap()), vec![3]);
    }

    #[test]
    fn test_get_found() {
        let repo = event_repo();
        let event = repo.get(2).unwrap();
        assert_eq!(event.sport, "tennis");
        assert_eq!(event.name, "Cedar vs Ash");
    }

    #[test]
    fn test_get_not_found() {
        let repo = event_repo();
        assert!(matches!(
            repo.get(404),
            Err(RepoError::NotFound { resource: "event", id: 404 })
        ));
    }

    #[test]
    fn test_single_rejects_multiple() {
        let repo = event_repo();
        let events = repo.list(None, None).unwrap();
        assert!(matches!(
            single(events, 1),
            Err(RepoError::Ambiguous { count: 3, .. })
        ));
    }

    #[test]
    fn test_list_without_table_is_query_error() {
        let repo = Repository::<Race>::new(memory_db());
        assert!(matches!(repo.list(None, None), Err(RepoError::Query(_))));
    }

    #[test]
    fn test_bad_row_discards_batch() {
        let repo = race_repo();
        repo.database()
            .with_connection(|conn| {
                conn.execute(
                    "INSERT INTO races (id, meeting_id, name, number, visible, advertised_start_time) VALUES (4, 10, 'Delta', 4, 1, 'whenever')",
                    [],
                )
                .map_err(RepoError::Query)
            })
            .unwrap();

        let result = repo.list(None, Some("number"));
        assert!(matches!(
            result,
            Err(RepoError::Materialize { resource: "race", .. })
        ));
    }

    #[test]
    fn test_store_error_while_stepping_is_query_error() {
        let db = memory_db();
        db.with_connection(|conn| {
            conn.execute_batch(
                "CREATE VIEW races AS SELECT 1 AS id, 1 AS meeting_id, 'Echo' AS name,
                     abs(-9223372036854775807 - 1) AS number, 1 AS visible,
                     '2099-01-01T00:00:00Z' AS advertised_start_time",
            )
            .map_err(RepoError::Query)
        })
        .unwrap();

        let repo = Repository::<Race>::new(db);
        let err = repo.list(None, None).unwrap_err();
        assert!(matches!(err, RepoError::Query(_)), "{err:?}");
        assert!(err.to_string().contains("integer overflow"));
    }

    #[test]
    fn test_date_only_start_time_lists() {
        let repo = race_repo();
        repo.database()
            .with_connection(|conn| {
                conn.execute(
                    "INSERT INTO races (id, meeting_id, name, number, visible, advertised_start_time) VALUES (4, 10, 'Delta', 4, 1, date('2021-03-02'))",
                    [],
                )
                .map_err(RepoError::Query)
            })
            .unwrap();

        let races = repo.list(None, Some("number")).unwrap();
        let delta = races.iter().find(|r| r.id == 4).unwrap();
        assert_eq!(delta.advertised_start_time.to_rfc3339(), "2021-03-02T00:00:00+00:00");
        assert_eq!(delta.status, Status::Closed);
    }

    #[test]
    fn test_concurrent_lists() {
        let repo = Arc::new(event_repo());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || repo.list(None, Some("league desc")).unwrap().len())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 3);
        }
    }
}
