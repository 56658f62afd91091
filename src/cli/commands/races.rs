//! `trackside races` command - Race listings

use clap::Subcommand;
use miette::Result;

use crate::cli::helpers::{open_database, repository};
use crate::cli::output::render_list;
use crate::cli::GlobalOpts;
use crate::resources::RaceFilter;
use crate::service::{ListRacesRequest, Racing, RacingService};

#[derive(Subcommand, Debug)]
pub enum RacesCommands {
    /// List races, optionally filtered and ordered
    List(RaceListArgs),
}

#[derive(clap::Args, Debug)]
pub struct RaceListArgs {
    /// Only races at this meeting (repeatable)
    #[arg(long = "meeting-id", value_name = "ID")]
    pub meeting_ids: Vec<i64>,

    /// Only visible (true) or hidden (false) races
    #[arg(long)]
    pub visible: Option<bool>,

    /// Sort order, e.g. "advertised_start_time, name desc"
    /// (fields: name, number, advertised_start_time)
    #[arg(long, short = 'o', value_name = "SPEC")]
    pub order_by: Option<String>,
}

impl RaceListArgs {
    pub fn filter(&self) -> RaceFilter {
        RaceFilter {
            meeting_ids: self.meeting_ids.clone(),
            visible: self.visible,
        }
    }
}

pub fn run(cmd: RacesCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        RacesCommands::List(args) => run_list(args, global),
    }
}

fn run_list(args: RaceListArgs, global: &GlobalOpts) -> Result<()> {
    let db = open_database(global)?;
    let service = RacingService::new(repository(&db)?);

    let response = service.list_races(ListRacesRequest {
        filter: Some(args.filter()),
        order_by: args.order_by,
    })?;

    render_list(&response.races, global.format, global.quiet)
}
