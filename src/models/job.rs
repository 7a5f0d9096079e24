//! Job model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst};
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::crew::{reconcile_crew, AssignmentRecord, CrewChanges, CrewEntity, CrewTarget};
use crate::envelope::DataEnvelope;
use crate::error::Result;
use crate::models::query::{JobStatus, ListQuery};
use crate::models::team::Roster;
use crate::models::{wire, Authed};
use crate::pagination::{exclude_listed, DateRange, Page, PAGE_SIZE};
use crate::traits::{exactly_one, Create, Get, List, Scheduled, Update};

/// A Workiz job.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Job {
    /// The job id (e.g., "XZDO9T").
    #[serde(rename = "UUID")]
    #[serde_as(as = "DefaultOnNull")]
    pub uuid: String,

    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    pub serial_id: u64,

    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    pub client_id: u64,

    /// Scheduled start.
    #[serde(with = "wire::timestamp")]
    pub job_date_time: Option<DateTime<Utc>>,

    /// Scheduled end.
    #[serde(with = "wire::timestamp")]
    pub job_end_date_time: Option<DateTime<Utc>>,

    #[serde(with = "wire::timestamp")]
    pub created_date: Option<DateTime<Utc>>,

    #[serde(with = "wire::timestamp")]
    pub payment_due_date: Option<DateTime<Utc>>,

    #[serde(with = "wire::timestamp")]
    pub last_status_update: Option<DateTime<Utc>>,

    #[serde_as(as = "DefaultOnNull")]
    pub status: JobStatus,
    #[serde_as(as = "DefaultOnNull")]
    pub sub_status: String,
    #[serde_as(as = "DefaultOnNull")]
    pub job_type: String,
    #[serde_as(as = "DefaultOnNull")]
    pub job_total_price: String,
    #[serde_as(as = "DefaultOnNull")]
    pub job_amount_due: String,
    #[serde_as(as = "DefaultOnNull")]
    pub sub_total: String,
    #[serde_as(as = "DefaultOnNull")]
    pub referral_company: String,
    #[serde_as(as = "DefaultOnNull")]
    pub timezone: String,
    #[serde_as(as = "DefaultOnNull")]
    pub service_area: String,

    #[serde_as(as = "DefaultOnNull")]
    pub phone: String,
    #[serde_as(as = "DefaultOnNull")]
    pub phone_ext: String,
    #[serde_as(as = "DefaultOnNull")]
    pub email: String,
    #[serde_as(as = "DefaultOnNull")]
    pub first_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub last_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub company: String,
    #[serde_as(as = "DefaultOnNull")]
    pub job_notes: String,
    #[serde_as(as = "DefaultOnNull")]
    pub job_source: String,
    #[serde_as(as = "DefaultOnNull")]
    pub created_by: String,

    #[serde(with = "wire::comments")]
    pub comments: Vec<String>,

    #[serde_as(as = "DefaultOnNull")]
    pub address: String,
    #[serde_as(as = "DefaultOnNull")]
    pub city: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub postal_code: String,
    #[serde_as(as = "DefaultOnNull")]
    pub country: String,
    #[serde_as(as = "DefaultOnNull")]
    pub unit: String,
    #[serde_as(as = "DefaultOnNull")]
    pub latitude: String,
    #[serde_as(as = "DefaultOnNull")]
    pub longitude: String,

    #[serde(rename = "item_cost")]
    #[serde_as(as = "DefaultOnNull")]
    pub item_cost: String,

    #[serde(rename = "tech_cost")]
    #[serde_as(as = "DefaultOnNull")]
    pub tech_cost: String,

    /// Assigned crew as recorded on the job.
    #[serde_as(as = "DefaultOnNull")]
    pub team: Vec<AssignmentRecord>,
}

impl Scheduled for Job {
    fn record_id(&self) -> &str {
        &self.uuid
    }

    fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.job_date_time
    }
}

impl Job {
    /// List jobs scheduled in `range`, minus any that also show up as
    /// unscheduled.
    ///
    /// The dated listing can include records the server also reports as
    /// unscheduled; those are removed so each job is counted once.
    #[tracing::instrument(skip(client, cancel))]
    pub async fn list_scheduled(
        client: &WorkizClient,
        cancel: &CancellationToken,
        statuses: Vec<JobStatus>,
        range: DateRange,
    ) -> Result<Vec<Job>> {
        let query = ListQuery {
            statuses,
            start_date: None,
        }
        .within(&range);

        let dated = Self::list_all(client, cancel, &query, range).await?;
        let unscheduled =
            Self::list_all(client, cancel, &ListQuery::unscheduled(), DateRange::all()).await?;

        Ok(exclude_listed(dated, &unscheduled, Job::record_id))
    }

    /// Set the job's crew to exactly `names`.
    ///
    /// Fetches the job and the team roster fresh, then reconciles.
    #[tracing::instrument(skip(client, cancel))]
    pub async fn set_crew(
        client: &WorkizClient,
        cancel: &CancellationToken,
        job_id: &str,
        names: &[String],
    ) -> Result<CrewChanges> {
        let job = Self::get(client, cancel, job_id.to_string()).await?;
        let roster = Roster::fetch(client, cancel).await?;
        let target = CrewTarget::new(client, CrewEntity::Job, job_id);

        reconcile_crew(cancel, &target, &roster, &job.team, names).await
    }
}

/// Reschedule a job.
#[derive(Debug, Clone, Copy)]
pub struct JobSchedule {
    pub start: DateTime<Utc>,
}

/// Parameters for creating a job.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateJob {
    pub job_date_time: Option<DateTime<Utc>>,
    pub client_id: u64,
    pub phone: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub job_type: String,
    pub referral_company: String,
    pub timezone: String,
    pub job_source: String,
    pub job_notes: String,
    pub created_by: String,
    pub service_area: String,
}

#[async_trait]
impl Get for Job {
    type Id = String;

    #[tracing::instrument(skip(client, cancel))]
    async fn get(client: &WorkizClient, cancel: &CancellationToken, id: String) -> Result<Self> {
        let path = format!("jobs/get/{}/", urlencoding::encode(&id));
        let envelope: DataEnvelope<Vec<Job>> = client.get(cancel, &path).await?;
        let jobs = if envelope.flag { envelope.data } else { Vec::new() };
        exactly_one("job", &id, jobs).map_err(|e| e.with_request(&path, None))
    }
}

#[async_trait]
impl List for Job {
    type Query = ListQuery;

    #[tracing::instrument(skip(client, cancel))]
    async fn list_page(
        client: &WorkizClient,
        cancel: &CancellationToken,
        query: &Self::Query,
        offset: u32,
    ) -> Result<Page<Self>> {
        let path = query.to_path("jobs/all/", offset);
        let envelope: DataEnvelope<Vec<Job>> = client.get(cancel, &path).await?;
        Ok(Page::new(envelope.data, offset, PAGE_SIZE, envelope.has_more))
    }
}

#[async_trait]
impl Update for Job {
    type Id = String;
    type Params = JobSchedule;

    #[tracing::instrument(skip(client, cancel))]
    async fn update(
        client: &WorkizClient,
        cancel: &CancellationToken,
        id: String,
        params: JobSchedule,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct Body<'a> {
            auth_secret: &'a str,
            #[serde(rename = "UUID")]
            uuid: &'a str,
            #[serde(rename = "JobDateTime")]
            job_date_time: DateTime<Utc>,
        }

        let body = Body {
            auth_secret: client.secret(),
            uuid: &id,
            job_date_time: params.start,
        };
        client.post(cancel, "jobs/update/", &body).await?;
        Ok(())
    }
}

#[async_trait]
impl Create for Job {
    type Params = CreateJob;
    type Output = ();

    #[tracing::instrument(skip_all)]
    async fn create(
        client: &WorkizClient,
        cancel: &CancellationToken,
        params: CreateJob,
    ) -> Result<()> {
        let body = Authed {
            auth_secret: client.secret(),
            inner: params,
        };
        client.post(cancel, "jobs/create/", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_wire_shape() {
        let job: Job = serde_json::from_value(serde_json::json!({
            "UUID": "XZDO9T",
            "SerialId": "12",
            "ClientId": 1002,
            "JobDateTime": "2023-02-28 12:00:00",
            "JobEndDateTime": null,
            "Status": "Submitted",
            "Comments": [{"Comment": "this is a note, not a comment"}],
            "item_cost": "10.00",
            "Team": [{"id": "228777", "name": "Nathan Thomas"}],
            "SomethingNew": true
        }))
        .unwrap();

        assert_eq!(job.uuid, "XZDO9T");
        assert_eq!(job.serial_id, 12);
        assert_eq!(job.client_id, 1002);
        assert!(job.job_date_time.is_some());
        assert!(job.job_end_date_time.is_none());
        assert_eq!(job.status, JobStatus::Submitted);
        assert_eq!(job.comments.len(), 1);
        assert_eq!(job.item_cost, "10.00");
        assert_eq!(job.team[0].name, "Nathan Thomas");
    }

    #[test]
    fn test_job_null_fields_read_as_defaults() {
        let job: Job = serde_json::from_str(
            r#"{"UUID":"XZDO9T","SerialId":null,"Status":null,"Company":null,"Comments":null,"Team":null}"#,
        )
        .unwrap();

        assert_eq!(job.uuid, "XZDO9T");
        assert_eq!(job.serial_id, 0);
        assert_eq!(job.status, JobStatus::default());
        assert_eq!(job.company, "");
        assert!(job.comments.is_empty());
        assert!(job.team.is_empty());
    }

    #[test]
    fn test_page_with_one_null_heavy_record_still_parses() {
        let envelope: DataEnvelope<Vec<Job>> = serde_json::from_str(
            r#"{"flag":true,"has_more":false,"data":[
                {"UUID":"A1","Team":[{"id":"228777","name":null}]},
                {"UUID":"B2","Company":null,"Email":null,"Team":null}
            ]}"#,
        )
        .unwrap();

        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[0].team[0].id, "228777");
        assert_eq!(envelope.data[0].team[0].name, "");
        assert!(envelope.data[1].team.is_empty());
    }

    #[test]
    fn test_create_body_carries_secret() {
        let body = Authed {
            auth_secret: "sec",
            inner: CreateJob {
                client_id: 1002,
                job_type: "Growler Fill".to_string(),
                ..Default::default()
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["auth_secret"], "sec");
        assert_eq!(json["ClientId"], 1002);
        assert_eq!(json["JobType"], "Growler Fill");
    }
}
