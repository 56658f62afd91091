//! `trackside events` command - Sports event listings

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{open_database, repository};
use crate::cli::output::{render_list, render_one};
use crate::cli::GlobalOpts;
use crate::resources::EventFilter;
use crate::service::{GetEventRequest, ListEventsRequest, Sports, SportsService};

#[derive(Subcommand, Debug)]
pub enum EventsCommands {
    /// List events, optionally filtered and ordered
    List(EventListArgs),

    /// Show a single event by id
    Get {
        /// Event id
        id: i64,
    },
}

#[derive(clap::Args, Debug)]
pub struct EventListArgs {
    /// Only this sport (repeatable)
    #[arg(long = "sport", value_name = "SPORT")]
    pub sports: Vec<String>,

    /// Only this league (repeatable)
    #[arg(long = "league", value_name = "ID")]
    pub leagues: Vec<i64>,

    /// Only events where this side plays home or away (repeatable)
    #[arg(long = "side", value_name = "NAME")]
    pub sides: Vec<String>,

    /// Only this event id (repeatable)
    #[arg(long = "id", value_name = "ID")]
    pub ids: Vec<i64>,

    /// Only visible (true) or hidden (false) events
    #[arg(long)]
    pub visible: Option<bool>,

    /// Sort order, e.g. "league, advertised_start_time desc"
    /// (fields: home_side_name, away_side_name, league, sport, advertised_start_time)
    #[arg(long, short = 'o', value_name = "SPEC")]
    pub order_by: Option<String>,
}

impl EventListArgs {
    pub fn filter(&self) -> EventFilter {
        EventFilter {
            sports: self.sports.clone(),
            leagues: self.leagues.clone(),
            sides: self.sides.clone(),
            ids: self.ids.clone(),
            visible: self.visible,
        }
    }
}

pub fn run(cmd: EventsCommands, global: &GlobalOpts) -> Result<()> {
    let db = open_database(global)?;
    let service = SportsService::new(repository(&db)?);

    match cmd {
        EventsCommands::List(args) => {
            let response = service.list_events(ListEventsRequest {
                filter: Some(args.filter()),
                order_by: args.order_by,
            })?;
            render_list(&response.events, global.format, global.quiet)
        }
        EventsCommands::Get { id } => {
            let event = service.get_event(GetEventRequest { id })?;
            render_one(&event, global.format)
        }
    }
}
