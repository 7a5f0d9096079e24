//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Workiz API server.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::{AssignmentRecord, Customer, Job, JobStatus, Lead, Member, Scheduled};

/// Which collection a crew call touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewKind {
    Job,
    Lead,
}

/// One assign or unassign request as the server received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewCall {
    pub kind: CrewKind,
    /// `"assign"` or `"unassign"`.
    pub action: &'static str,
    pub uuid: String,
    pub user: String,
}

/// Why a crew change was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrewReject {
    /// No job or lead with that UUID.
    UnknownEntity,
    /// No member currently carries that name.
    UnknownUser,
    /// Assign of a member who is already on the crew.
    AlreadyAssigned,
    /// Unassign of a member who is not on the crew.
    NotAssigned,
}

/// Server-side listing filters, as parsed from the query string.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub statuses: Vec<JobStatus>,
    pub only_open: bool,
    pub start_date: Option<NaiveDate>,
}

impl ListFilter {
    fn keeps(&self, status: &JobStatus, scheduled_at: Option<DateTime<Utc>>) -> bool {
        if !self.statuses.is_empty() {
            if !self.statuses.contains(status) {
                return false;
            }
        } else if self.only_open && status.is_closed() {
            return false;
        }

        match self.start_date {
            Some(date) => scheduled_at.is_some_and(|at| at.date_naive() >= date),
            None => true,
        }
    }
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Team members in listing order.
    pub members: Vec<Member>,

    /// Jobs indexed by UUID.
    pub jobs: BTreeMap<String, Job>,

    /// Leads indexed by UUID.
    pub leads: BTreeMap<String, Lead>,

    /// Customers indexed by id.
    pub customers: BTreeMap<String, Customer>,

    /// Optional API token. If set, the first path segment must match it.
    pub required_token: Option<String>,

    /// How many upcoming requests are answered with 429.
    pub quota_failures: u32,

    /// Every crew call received, accepted or not.
    pub crew_calls: Vec<CrewCall>,

    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            next_id: 2000,
            ..Self::default()
        }
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a team member.
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Add a job.
    pub fn with_job(mut self, job: Job) -> Self {
        self.jobs.insert(job.uuid.clone(), job);
        self
    }

    /// Add a lead.
    pub fn with_lead(mut self, lead: Lead) -> Self {
        self.leads.insert(lead.uuid.clone(), lead);
        self
    }

    /// Add a customer.
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.insert(customer.id.clone(), customer);
        self
    }

    /// Set the required API token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Answer the next `count` requests with 429.
    pub fn with_quota_failures(mut self, count: u32) -> Self {
        self.quota_failures = count;
        self
    }

    /// Whether `token` opens the API.
    pub fn accepts_token(&self, token: &str) -> bool {
        self.required_token.as_deref().map_or(true, |t| t == token)
    }

    /// Consume one pending quota failure, if any.
    pub fn take_quota_failure(&mut self) -> bool {
        if self.quota_failures == 0 {
            return false;
        }
        self.quota_failures -= 1;
        true
    }

    /// Change a member's display name.
    ///
    /// Assignment records already on jobs and leads keep the old name,
    /// the same way the live service behaves.
    pub fn rename_member(&mut self, id: &str, name: &str) -> bool {
        match self.members.iter_mut().find(|m| m.id == id) {
            Some(member) => {
                member.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// The member currently called `name`.
    pub fn member_by_name(&self, name: &str) -> Option<&Member> {
        self.members
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Jobs passing `filter`, in UUID order.
    pub fn list_jobs(&self, filter: &ListFilter) -> Vec<&Job> {
        self.jobs
            .values()
            .filter(|j| filter.keeps(&j.status, j.scheduled_at()))
            .collect()
    }

    /// Leads passing `filter`, in UUID order.
    pub fn list_leads(&self, filter: &ListFilter) -> Vec<&Lead> {
        self.leads
            .values()
            .filter(|l| filter.keeps(&l.status, l.scheduled_at()))
            .collect()
    }

    /// Store a new job and return its UUID.
    pub fn create_job(&mut self, mut job: Job) -> String {
        job.uuid = self.fresh_id("J");
        let uuid = job.uuid.clone();
        self.jobs.insert(uuid.clone(), job);
        uuid
    }

    /// Store a new lead and return its UUID.
    pub fn create_lead(&mut self, mut lead: Lead) -> String {
        lead.uuid = self.fresh_id("L");
        let uuid = lead.uuid.clone();
        self.leads.insert(uuid.clone(), lead);
        uuid
    }

    /// Store a new customer and return its id.
    pub fn create_customer(&mut self, mut customer: Customer) -> String {
        customer.id = self.fresh_id("");
        let id = customer.id.clone();
        self.customers.insert(id.clone(), customer);
        id
    }

    /// Apply an assign or unassign and record the call.
    pub fn change_crew(
        &mut self,
        kind: CrewKind,
        action: &'static str,
        uuid: &str,
        user: &str,
    ) -> Result<(), CrewReject> {
        self.crew_calls.push(CrewCall {
            kind,
            action,
            uuid: uuid.to_string(),
            user: user.to_string(),
        });

        let member = self
            .member_by_name(user)
            .map(|m| AssignmentRecord {
                id: m.id.clone(),
                name: m.name.clone(),
            })
            .ok_or(CrewReject::UnknownUser)?;

        let team = match kind {
            CrewKind::Job => self.jobs.get_mut(uuid).map(|j| &mut j.team),
            CrewKind::Lead => self.leads.get_mut(uuid).map(|l| &mut l.team),
        }
        .ok_or(CrewReject::UnknownEntity)?;

        let position = team.iter().position(|r| r.id == member.id);
        match (action, position) {
            ("assign", Some(_)) => Err(CrewReject::AlreadyAssigned),
            ("assign", None) => {
                team.push(member);
                Ok(())
            }
            (_, Some(i)) => {
                team.remove(i);
                Ok(())
            }
            (_, None) => Err(CrewReject::NotAssigned),
        }
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_rename_keeps_assignment_records() {
        let mut state = MockState::new()
            .with_member(Fixtures::member("246389", "Brooklyn Thomas"))
            .with_job(Fixtures::job("XZDO9T", &[("246389", "Brooklyn Thomas")]));

        assert!(state.rename_member("246389", "Brooklyn Smith"));

        assert_eq!(state.jobs["XZDO9T"].team[0].name, "Brooklyn Thomas");
        assert!(state.member_by_name("Brooklyn Smith").is_some());
        assert!(state.member_by_name("Brooklyn Thomas").is_none());
    }

    #[test]
    fn test_change_crew_rejects_repeats() {
        let mut state = MockState::new()
            .with_member(Fixtures::member("1", "Alissa Thomas"))
            .with_job(Fixtures::job("XZDO9T", &[]));

        assert_eq!(state.change_crew(CrewKind::Job, "assign", "XZDO9T", "Alissa Thomas"), Ok(()));
        assert_eq!(
            state.change_crew(CrewKind::Job, "assign", "XZDO9T", "Alissa Thomas"),
            Err(CrewReject::AlreadyAssigned)
        );
        assert_eq!(state.change_crew(CrewKind::Job, "unassign", "XZDO9T", "Alissa Thomas"), Ok(()));
        assert_eq!(
            state.change_crew(CrewKind::Job, "unassign", "XZDO9T", "Alissa Thomas"),
            Err(CrewReject::NotAssigned)
        );
        assert_eq!(state.crew_calls.len(), 4);
    }

    #[test]
    fn test_list_filter() {
        let mut done = Fixtures::job("DONE01", &[]);
        done.status = JobStatus::Done;
        let state = MockState::new()
            .with_job(Fixtures::job("OPEN01", &[]))
            .with_job(done);

        let open = ListFilter {
            only_open: true,
            ..Default::default()
        };
        assert_eq!(state.list_jobs(&open).len(), 1);

        let closed = ListFilter {
            statuses: vec![JobStatus::Done],
            ..Default::default()
        };
        assert_eq!(state.list_jobs(&closed)[0].uuid, "DONE01");
    }
}
