//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::{AssignmentRecord, CrewChanges, Customer, Job, Lead, Member};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn when(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "unscheduled".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn crew(team: &[AssignmentRecord]) -> String {
    if team.is_empty() {
        return "-".to_string();
    }
    team.iter()
        .map(|r| r.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

impl PrettyPrint for Job {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Job: {}", self.uuid));
        lines.push(format!("Status:         {}", self.status));
        lines.push(format!("Scheduled:      {}", when(self.job_date_time)));

        if self.job_end_date_time.is_some() {
            lines.push(format!("Ends:           {}", when(self.job_end_date_time)));
        }

        if !self.job_type.is_empty() {
            lines.push(format!("Type:           {}", self.job_type));
        }

        lines.push(format!(
            "Customer:       {} {} (#{})",
            self.first_name, self.last_name, self.client_id
        ));

        if !self.address.is_empty() {
            lines.push(format!("Address:        {}, {}", self.address, self.city));
        }

        lines.push(format!("Crew:           {}", crew(&self.team)));

        lines.join("\n")
    }
}

impl PrettyPrint for Lead {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Lead: {}", self.uuid));
        lines.push(format!("Status:         {}", self.status));
        lines.push(format!("Scheduled:      {}", when(self.lead_date_time)));

        if let Some(duration) = self.duration() {
            lines.push(format!("Duration:       {} min", duration.num_minutes()));
        }

        if !self.job_type.is_empty() {
            lines.push(format!("Type:           {}", self.job_type));
        }

        lines.push(format!(
            "Customer:       {} {} (#{})",
            self.first_name, self.last_name, self.client_id
        ));
        lines.push(format!("Crew:           {}", crew(&self.team)));

        lines.join("\n")
    }
}

impl PrettyPrint for Customer {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Customer: {}", self.full_name()));

        if !self.id.is_empty() {
            lines.push(format!("Id:             {}", self.id));
        }

        if !self.email.is_empty() {
            lines.push(format!("Email:          {}", self.email));
        }

        lines.push(format!(
            "Address:        {}, {} {} {}",
            self.address, self.city, self.state, self.zip
        ));
        lines.push(format!(
            "Billing:        {}",
            if self.allow_billing { "allowed" } else { "not allowed" }
        ));

        lines.join("\n")
    }
}

impl PrettyPrint for Member {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Member: {}", self.name));
        lines.push(format!("Id:             {}", self.id));
        lines.push(format!("Role:           {}", self.role));
        lines.push(format!(
            "Active:         {}",
            if self.active { "yes" } else { "no" }
        ));
        lines.join("\n")
    }
}

impl PrettyPrint for CrewChanges {
    fn pretty_print(&self) -> String {
        if self.is_noop() && self.unresolved_names.is_empty() && self.unresolved_ids.is_empty() {
            return "Crew already up to date".to_string();
        }

        let mut lines = Vec::new();
        for name in &self.added {
            lines.push(format!("+ {name}"));
        }
        for name in &self.removed {
            lines.push(format!("- {name}"));
        }
        if !self.unresolved_names.is_empty() {
            lines.push(format!(
                "Not on team:    {}",
                self.unresolved_names.join(", ")
            ));
        }
        if !self.unresolved_ids.is_empty() {
            lines.push(format!(
                "Unknown ids:    {}",
                self.unresolved_ids.join(", ")
            ));
        }
        lines.join("\n")
    }
}
