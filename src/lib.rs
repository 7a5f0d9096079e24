//! Workiz API client library.
//!
//! A Rust library for the Workiz field-service REST API, built around a
//! trait-based architecture where each operation (Get, List, Update,
//! Create) is a trait that entity types implement.
//!
//! # Quick Start
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use workiz::{DateRange, Get, Job, List, ListQuery, WorkizClient};
//!
//! #[tokio::main]
//! async fn main() -> workiz::Result<()> {
//!     // Create client from environment variables
//!     let client = WorkizClient::from_env()?;
//!     let cancel = CancellationToken::new();
//!
//!     // Get a job by id
//!     let job = Job::get(&client, &cancel, "XZDO9T".to_string()).await?;
//!     println!("Job: {} ({})", job.uuid, job.status);
//!
//!     // List every open job
//!     let jobs = Job::list_all(&client, &cancel, &ListQuery::default(), DateRange::all()).await?;
//!     println!("Found {} jobs", jobs.len());
//!
//!     // Make the crew exactly these two people
//!     let names = vec!["Nathan Thomas".to_string(), "Alissa Thomas".to_string()];
//!     let changes = Job::set_crew(&client, &cancel, "XZDO9T", &names).await?;
//!     println!("added {:?}, removed {:?}", changes.added, changes.removed);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Every request runs through the same pipeline:
//!
//! - [`WorkizClient`] builds `<base>/<token>/<path>` and sends the request
//! - [`send_with_retry`] re-sends on quota exhaustion with exponential backoff
//! - [`classify`] turns status and body into a [`Verdict`], absorbing the
//!   "already assigned" no-op the crew endpoints report as a 400
//!
//! On top of that sit the [`Get`], [`List`], [`Update`] and [`Create`]
//! traits, the [`Roster`] of team members and [`reconcile_crew`], which
//! moves a crew to a desired set of names with the fewest calls.
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `WORKIZ_API_TOKEN` (required) - The account API token
//! - `WORKIZ_API_SECRET` (required) - The account auth secret
//! - `WORKIZ_API_URL` (optional) - Base URL (defaults to `https://api.workiz.com/api/v1`)
//!
//! or from a JSON file via [`Config::from_file`].

mod classify;
mod client;
mod config;
mod crew;
mod envelope;
mod error;
mod models;
mod pagination;
mod retry;
mod traits;

pub mod cli;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use classify::{classify, Verdict, NOOP_DETAILS};
pub use client::WorkizClient;
pub use config::{Config, MIN_CREDENTIAL_LEN};
pub use envelope::{DataEnvelope, Details, ErrorDetail, ResponseEnvelope};
pub use error::{ErrorKind, Result, WorkizError};
pub use pagination::{exclude_listed, DateRange, Page, PageCursor, MAX_PAGES, PAGE_SIZE};
pub use retry::{send_with_retry, RetryPolicy, MAX_RETRIES};

// Re-export traits
pub use traits::{Create, Get, List, Scheduled, Update};

// Re-export crew reconciliation
pub use crew::{
    reconcile_crew, AssignmentRecord, Assigner, CrewChanges, CrewEntity, CrewTarget, Unassigner,
};

// Re-export models
pub use models::{
    // Job types
    CreateJob,
    Job,
    JobSchedule,
    // Lead types
    CreateLead,
    Lead,
    LeadSchedule,
    // Customer types
    Customer,
    // Team types
    list_team,
    Member,
    Roster,
    // Listing filters
    JobStatus,
    ListQuery,
};
