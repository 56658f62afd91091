//! Output rendering for list and get commands
//!
//! Every format writes to stdout. `auto` renders a table for lists and YAML
//! for a single record.

use std::io::{self, Write};

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{escape_tsv, format_local, truncate_str};
use crate::cli::OutputFormat;
use crate::core::resource::{Resource, Status};
use crate::resources::{Event, Race};

/// Maximum width of free-text columns in tables
const TEXT_WIDTH: usize = 32;

/// A resource that can be shown as a table row
pub trait Tabular: Resource {
    /// Column headers, in the same order as [`Tabular::cells`]
    const HEADERS: &'static [&'static str];

    /// Serialized field names, in serialization order; the CSV header
    const FIELDS: &'static [&'static str];

    /// Plural used in summaries (e.g., "races")
    const PLURAL: &'static str;

    fn cells(&self) -> Vec<String>;
}

impl Tabular for Race {
    const HEADERS: &'static [&'static str] =
        &["ID", "MEETING", "NAME", "NUMBER", "VISIBLE", "START", "STATUS"];
    const FIELDS: &'static [&'static str] = &[
        "id",
        "meeting_id",
        "name",
        "number",
        "visible",
        "advertised_start_time",
        "status",
    ];
    const PLURAL: &'static str = "races";

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.meeting_id.to_string(),
            self.name.clone(),
            self.number.to_string(),
            yes_no(self.visible),
            format_local(&self.advertised_start_time),
            self.status.to_string(),
        ]
    }
}

impl Tabular for Event {
    const HEADERS: &'static [&'static str] =
        &["ID", "SPORT", "LEAGUE", "NAME", "VISIBLE", "START", "STATUS"];
    const FIELDS: &'static [&'static str] = &[
        "id",
        "sport",
        "league",
        "home_side_name",
        "away_side_name",
        "name",
        "visible",
        "advertised_start_time",
        "status",
    ];
    const PLURAL: &'static str = "events";

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.sport.clone(),
            self.league.to_string(),
            self.name.clone(),
            yes_no(self.visible),
            format_local(&self.advertised_start_time),
            self.status.to_string(),
        ]
    }
}

fn yes_no(b: bool) -> String {
    let text = if b { "yes" } else { "no" };
    text.to_string()
}

/// Render a list of resources in the requested format
pub fn render_list<T: Tabular>(items: &[T], format: OutputFormat, quiet: bool) -> Result<()> {
    let mut out = io::stdout().lock();

    match format {
        OutputFormat::Auto => {
            if items.is_empty() {
                if !quiet {
                    writeln!(out, "No {} found", T::PLURAL).into_diagnostic()?;
                }
                return Ok(());
            }
            writeln!(out, "{}", table(items).with(Style::sharp())).into_diagnostic()?;
            if !quiet {
                writeln!(out, "{}", summary(items)).into_diagnostic()?;
            }
        }
        OutputFormat::Md => {
            writeln!(out, "{}", table(items).with(Style::markdown())).into_diagnostic()?;
        }
        OutputFormat::Tsv => {
            writeln!(out, "{}", T::HEADERS.join("\t")).into_diagnostic()?;
            for item in items {
                let cells: Vec<String> = item.cells().iter().map(|c| escape_tsv(c)).collect();
                writeln!(out, "{}", cells.join("\t")).into_diagnostic()?;
            }
        }
        OutputFormat::Id => {
            for item in items {
                writeln!(out, "{}", item.id()).into_diagnostic()?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, items).into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
        OutputFormat::Yaml => {
            write!(out, "{}", serde_yml::to_string(&items).into_diagnostic()?).into_diagnostic()?;
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            // serialize() only emits the header alongside the first record
            if items.is_empty() {
                writer.write_record(T::FIELDS).into_diagnostic()?;
            }
            for item in items {
                writer.serialize(item).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}

/// Render a single resource; `auto` means YAML
pub fn render_one<T: Tabular>(item: &T, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Auto | OutputFormat::Yaml => print_serialized(item, false),
        OutputFormat::Json => print_serialized(item, true),
        other => render_list(std::slice::from_ref(item), other, true),
    }
}

fn print_serialized<T: Serialize>(item: &T, json: bool) -> Result<()> {
    let text = if json {
        serde_json::to_string_pretty(item).into_diagnostic()? + "\n"
    } else {
        serde_yml::to_string(item).into_diagnostic()?
    };
    print!("{}", text);
    Ok(())
}

fn table<T: Tabular>(items: &[T]) -> tabled::Table {
    let mut builder = Builder::default();
    builder.push_record(T::HEADERS.iter().copied());
    for item in items {
        builder.push_record(item.cells().iter().map(|c| truncate_str(c, TEXT_WIDTH)));
    }
    builder.build()
}

fn summary<T: Tabular>(items: &[T]) -> String {
    let open = items.iter().filter(|i| i.status() == Status::Open).count();
    format!(
        "{} {} found ({} open, {} closed)",
        style(items.len()).cyan(),
        T::PLURAL,
        style(open).green(),
        style(items.len() - open).dim()
    )
}
