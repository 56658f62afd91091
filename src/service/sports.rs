//! Sports service

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::RepoError;
use crate::core::repository::Repository;
use crate::resources::{Event, EventFilter};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListEventsRequest {
    pub filter: Option<EventFilter>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListEventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GetEventRequest {
    pub id: i64,
}

pub trait Sports {
    /// Return the events matching the request
    fn list_events(&self, request: ListEventsRequest) -> Result<ListEventsResponse, RepoError>;

    /// Return the single event with the requested id
    fn get_event(&self, request: GetEventRequest) -> Result<Event, RepoError>;
}

/// [`Sports`] backed by the events repository
pub struct SportsService {
    events: Repository<Event>,
}

impl SportsService {
    pub fn new(events: Repository<Event>) -> Self {
        Self { events }
    }
}

impl Sports for SportsService {
    fn list_events(&self, request: ListEventsRequest) -> Result<ListEventsResponse, RepoError> {
        let events = self
            .events
            .list(request.filter.as_ref(), request.order_by.as_deref())?;

        info!(count = events.len(), "listed events");
        Ok(ListEventsResponse { events })
    }

    fn get_event(&self, request: GetEventRequest) -> Result<Event, RepoError> {
        self.events.get(request.id)
    }
}
