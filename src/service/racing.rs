//! Racing service

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::RepoError;
use crate::core::repository::Repository;
use crate::resources::{Race, RaceFilter};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListRacesRequest {
    pub filter: Option<RaceFilter>,
    pub order_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRacesResponse {
    pub races: Vec<Race>,
}

pub trait Racing {
    /// Return the races matching the request
    fn list_races(&self, request: ListRacesRequest) -> Result<ListRacesResponse, RepoError>;
}

/// [`Racing`] backed by the races repository
pub struct RacingService {
    races: Repository<Race>,
}

impl RacingService {
    pub fn new(races: Repository<Race>) -> Self {
        Self { races }
    }
}

impl Racing for RacingService {
    fn list_races(&self, request: ListRacesRequest) -> Result<ListRacesResponse, RepoError> {
        let races = self
            .races
            .list(request.filter.as_ref(), request.order_by.as_deref())?;

        info!(count = races.len(), "listed races");
        Ok(ListRacesResponse { races })
    }
}
