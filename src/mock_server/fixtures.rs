//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{DateTime, NaiveDateTime, Utc};

use super::state::MockState;
use crate::{AssignmentRecord, Customer, Job, JobStatus, Lead, Member};

/// Collection of fixture factories for test data.
pub struct Fixtures;

/// The data set the default server starts with.
pub struct DefaultScenario {
    pub members: Vec<Member>,
    pub jobs: Vec<Job>,
    pub leads: Vec<Lead>,
    pub customers: Vec<Customer>,
}

impl From<DefaultScenario> for MockState {
    fn from(scenario: DefaultScenario) -> Self {
        let state = scenario
            .members
            .into_iter()
            .fold(MockState::new(), MockState::with_member);
        let state = scenario.jobs.into_iter().fold(state, MockState::with_job);
        let state = scenario.leads.into_iter().fold(state, MockState::with_lead);
        scenario
            .customers
            .into_iter()
            .fold(state, MockState::with_customer)
    }
}

fn at(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|t| t.and_utc())
}

fn crew(team: &[(&str, &str)]) -> Vec<AssignmentRecord> {
    team.iter()
        .map(|(id, name)| AssignmentRecord {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

impl Fixtures {
    // =========================================================================
    // Team Fixtures
    // =========================================================================

    /// An active field tech.
    pub fn member(id: &str, name: &str) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            role: "tech".to_string(),
            active: true,
            field_tech: true,
            ..Default::default()
        }
    }

    // =========================================================================
    // Job / Lead Fixtures
    // =========================================================================

    /// A submitted, unscheduled job for customer 1002 with the given crew.
    pub fn job(uuid: &str, team: &[(&str, &str)]) -> Job {
        Job {
            uuid: uuid.to_string(),
            client_id: 1002,
            status: JobStatus::Submitted,
            first_name: "Nathan".to_string(),
            last_name: "Thomas".to_string(),
            job_type: "Growler Fill".to_string(),
            team: crew(team),
            ..Default::default()
        }
    }

    /// A pending job scheduled at `start` (`YYYY-MM-DD HH:MM:SS`).
    pub fn scheduled_job(uuid: &str, start: &str) -> Job {
        Job {
            status: JobStatus::Pending,
            job_date_time: at(start),
            ..Self::job(uuid, &[])
        }
    }

    /// A new one-hour lead starting at `start`.
    pub fn lead(uuid: &str, start: &str, team: &[(&str, &str)]) -> Lead {
        let start = at(start);
        Lead {
            uuid: uuid.to_string(),
            client_id: 1002,
            status: JobStatus::New,
            lead_date_time: start,
            lead_end_date_time: start.map(|s| s + chrono::Duration::hours(1)),
            first_name: "Nathan".to_string(),
            last_name: "Thomas".to_string(),
            job_type: "Full Case".to_string(),
            timezone: "UTC".to_string(),
            team: crew(team),
            ..Default::default()
        }
    }

    // =========================================================================
    // Customer Fixtures
    // =========================================================================

    pub fn customer(id: &str, first_name: &str, last_name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            address: "23 Potter pl".to_string(),
            city: "Shelburne".to_string(),
            state: "VT".to_string(),
            zip: "05482".to_string(),
            allow_billing: true,
            ..Default::default()
        }
    }

    // =========================================================================
    // Scenarios
    // =========================================================================

    /// Three members, one job and one lead crewed by two of them, one customer.
    pub fn default_scenario() -> DefaultScenario {
        let crewed = [("228777", "Nathan Thomas"), ("246389", "Brooklyn Thomas")];

        DefaultScenario {
            members: vec![
                Self::member("228777", "Nathan Thomas"),
                Self::member("246389", "Brooklyn Thomas"),
                Self::member("251010", "Alissa Thomas"),
            ],
            jobs: vec![
                Self::job("XZDO9T", &crewed),
                Self::scheduled_job("QK2M7P", "2023-03-01 09:00:00"),
            ],
            leads: vec![Self::lead("SRUYUI", "2023-02-28 12:00:00", &crewed)],
            customers: vec![Self::customer("1002", "Nathan", "Thomas")],
        }
    }
}
