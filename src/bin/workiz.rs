//! Workiz API CLI binary.
//!
//! A command-line interface for interacting with the Workiz API.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tabled::{Table, Tabled};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, EnvFilter};

use workiz::cli::{Cli, Command, Entity, Schedulable};
use workiz::output::PrettyPrint;
use workiz::{
    list_team, Config, Customer, DateRange, Get, Job, JobStatus, Lead, List, ListQuery, Member,
    WorkizClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workiz=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match connect(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set WORKIZ_API_TOKEN and WORKIZ_API_SECRET, or pass --config");
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted, cancelling");
            on_interrupt.cancel();
        }
    });

    match run(&client, &cancel, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn connect(config: Option<&Path>) -> workiz::Result<WorkizClient> {
    let Some(path) = config else {
        return WorkizClient::from_env();
    };

    let config = Config::from_file(path)?;
    if !config.is_valid() {
        tracing::warn!(path = %path.display(), "credentials look too short to be real");
    }
    WorkizClient::from_config(&config)
}

async fn run(client: &WorkizClient, cancel: &CancellationToken, cli: Cli) -> workiz::Result<()> {
    match cli.command {
        Command::Team => {
            let members = list_team(client, cancel).await?;
            output_list(&members, cli.json, |m| MemberRow::from(m))
        }
        Command::Get { entity, id } => handle_get(client, cancel, entity, id, cli.json).await,
        Command::List {
            entity,
            start,
            end,
            statuses,
            scheduled,
        } => {
            let range = DateRange { start, end };
            let statuses = statuses.into_iter().map(JobStatus::from).collect();
            handle_list(client, cancel, entity, range, statuses, scheduled, cli.json).await
        }
        Command::Crew { entity, id, names } => {
            let changes = match entity {
                Schedulable::Job => Job::set_crew(client, cancel, &id, &names).await?,
                Schedulable::Lead => Lead::set_crew(client, cancel, &id, &names).await?,
            };
            output_single(&changes, cli.json)
        }
    }
}

async fn handle_get(
    client: &WorkizClient,
    cancel: &CancellationToken,
    entity: Entity,
    id: String,
    json: bool,
) -> workiz::Result<()> {
    match entity {
        Entity::Job => {
            let job = Job::get(client, cancel, id).await?;
            output_single(&job, json)
        }
        Entity::Lead => {
            let lead = Lead::get(client, cancel, id).await?;
            output_single(&lead, json)
        }
        Entity::Customer => {
            let customer = Customer::get(client, cancel, id).await?;
            output_single(&customer, json)
        }
    }
}

async fn handle_list(
    client: &WorkizClient,
    cancel: &CancellationToken,
    entity: Schedulable,
    range: DateRange,
    statuses: Vec<JobStatus>,
    scheduled: bool,
    json: bool,
) -> workiz::Result<()> {
    match entity {
        Schedulable::Job if scheduled => {
            let jobs = Job::list_scheduled(client, cancel, statuses, range).await?;
            output_list(&jobs, json, |j| JobRow::from(j))
        }
        Schedulable::Job => {
            let query = ListQuery {
                statuses,
                start_date: None,
            }
            .within(&range);
            let jobs = Job::list_all(client, cancel, &query, range).await?;
            output_list(&jobs, json, |j| JobRow::from(j))
        }
        Schedulable::Lead => {
            if scheduled {
                tracing::warn!("--scheduled only applies to jobs, ignoring");
            }
            let query = ListQuery {
                statuses,
                start_date: None,
            }
            .within(&range);
            let leads = Lead::list_all(client, cancel, &query, range).await?;
            output_list(&leads, json, |l| LeadRow::from(l))
        }
    }
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> workiz::Result<()> {
    if json {
        println!("{}", to_json(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> workiz::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", to_json(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} records", items.len());
    }
    Ok(())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> workiz::Result<String> {
    serde_json::to_string_pretty(value).map_err(workiz::WorkizError::EncodeError)
}

fn scheduled_at(at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn crew_names(team: &[workiz::AssignmentRecord]) -> String {
    team.iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct JobRow {
    id: String,
    status: String,
    scheduled: String,
    customer: String,
    crew: String,
}

impl From<&Job> for JobRow {
    fn from(j: &Job) -> Self {
        Self {
            id: j.uuid.clone(),
            status: j.status.to_string(),
            scheduled: scheduled_at(j.job_date_time),
            customer: format!("{} {}", j.first_name, j.last_name).trim().to_string(),
            crew: crew_names(&j.team),
        }
    }
}

#[derive(Tabled)]
struct LeadRow {
    id: String,
    status: String,
    scheduled: String,
    #[tabled(rename = "type")]
    job_type: String,
    crew: String,
}

impl From<&Lead> for LeadRow {
    fn from(l: &Lead) -> Self {
        Self {
            id: l.uuid.clone(),
            status: l.status.to_string(),
            scheduled: scheduled_at(l.lead_date_time),
            job_type: l.job_type.clone(),
            crew: crew_names(&l.team),
        }
    }
}

#[derive(Tabled)]
struct MemberRow {
    id: String,
    name: String,
    role: String,
    active: bool,
}

impl From<&Member> for MemberRow {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            role: m.role.clone(),
            active: m.active,
        }
    }
}
