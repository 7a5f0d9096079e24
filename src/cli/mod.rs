//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the workiz binary.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};

/// Workiz API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "workiz", about = "Workiz API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// JSON file with `token` and `secret`; the environment is used otherwise.
    #[arg(long, global = true, env = "WORKIZ_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List team members.
    Team,

    /// Get a single entity by id.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The job or lead UUID, or the customer id.
        id: String,
    },

    /// List jobs or leads, optionally within a date range.
    List {
        /// The type of entity to list.
        entity: Schedulable,

        /// Keep records scheduled after this time (`YYYY-MM-DD` or `YYYY-MM-DD HH:MM:SS`, UTC).
        #[arg(long, value_parser = parse_when)]
        start: Option<DateTime<Utc>>,

        /// Keep records scheduled before this time.
        #[arg(long, value_parser = parse_when, requires = "start")]
        end: Option<DateTime<Utc>>,

        /// Only these statuses (repeatable). Open records when omitted.
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Jobs only: drop records the server also lists as unscheduled.
        #[arg(long)]
        scheduled: bool,
    },

    /// Set the crew of a job or lead to exactly the given names.
    Crew {
        /// The type of entity whose crew changes.
        entity: Schedulable,

        /// The job or lead UUID.
        id: String,

        /// Team member display names. None clears the crew.
        names: Vec<String>,
    },
}

/// Entity types that can be fetched by id.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A scheduled job.
    #[value(alias = "jobs")]
    Job,
    /// A lead (estimate).
    #[value(alias = "leads")]
    Lead,
    /// A customer (client).
    #[value(alias = "customers", alias = "client")]
    Customer,
}

/// Entity types that carry a schedule and a crew.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Schedulable {
    /// A scheduled job.
    #[value(alias = "jobs")]
    Job,
    /// A lead (estimate).
    #[value(alias = "leads")]
    Lead,
}

/// Parse `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (midnight) as UTC.
pub fn parse_when(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS, got '{raw}'"))
}
