//! Lead (estimate) model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
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
use crate::pagination::{Page, PAGE_SIZE};
use crate::traits::{exactly_one, Create, Get, List, Scheduled, Update};

/// Leads are always scheduled in UTC by this client.
const LEAD_TIMEZONE: &str = "UTC";

/// A Workiz lead.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Lead {
    /// The lead id (e.g., "SRUYUI").
    #[serde(rename = "UUID")]
    #[serde_as(as = "DefaultOnNull")]
    pub uuid: String,

    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    pub serial_id: u64,

    #[serde_as(as = "DefaultOnNull<PickFirst<(_, DisplayFromStr)>>")]
    pub client_id: u64,

    #[serde(with = "wire::timestamp")]
    pub lead_date_time: Option<DateTime<Utc>>,

    #[serde(with = "wire::timestamp")]
    pub lead_end_date_time: Option<DateTime<Utc>>,

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
    pub lead_total_price: String,
    #[serde_as(as = "DefaultOnNull")]
    pub lead_amount_due: String,
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
    pub lead_notes: String,
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

    /// Assigned crew as recorded on the lead.
    #[serde_as(as = "DefaultOnNull")]
    pub team: Vec<AssignmentRecord>,
}

impl Scheduled for Lead {
    fn record_id(&self) -> &str {
        &self.uuid
    }

    fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        self.lead_date_time
    }
}

impl Lead {
    /// How long the lead is booked for, when both ends are set.
    pub fn duration(&self) -> Option<Duration> {
        Some(self.lead_end_date_time? - self.lead_date_time?)
    }

    /// Set the lead's crew to exactly `names`.
    ///
    /// Fetches the lead and the team roster fresh, then reconciles.
    #[tracing::instrument(skip(client, cancel))]
    pub async fn set_crew(
        client: &WorkizClient,
        cancel: &CancellationToken,
        lead_id: &str,
        names: &[String],
    ) -> Result<CrewChanges> {
        let lead = Self::get(client, cancel, lead_id.to_string()).await?;
        let roster = Roster::fetch(client, cancel).await?;
        let target = CrewTarget::new(client, CrewEntity::Lead, lead_id);

        reconcile_crew(cancel, &target, &roster, &lead.team, names).await
    }
}

/// Reschedule a lead.
#[derive(Debug, Clone, Copy)]
pub struct LeadSchedule {
    pub start: DateTime<Utc>,
    pub duration: Duration,
}

/// Parameters for creating a lead.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateLead {
    pub lead_date_time: Option<DateTime<Utc>>,
    pub lead_end_date_time: Option<DateTime<Utc>>,
    pub client_id: u64,
    pub phone: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub comments: String,
    pub job_type: String,
    pub job_source: String,
    pub lead_notes: String,
    /// Overwritten with UTC on create.
    pub timezone: String,
}

#[async_trait]
impl Get for Lead {
    type Id = String;

    #[tracing::instrument(skip(client, cancel))]
    async fn get(client: &WorkizClient, cancel: &CancellationToken, id: String) -> Result<Self> {
        let path = format!("lead/get/{}/", urlencoding::encode(&id));
        let envelope: DataEnvelope<Vec<Lead>> = client.get(cancel, &path).await?;
        let leads = if envelope.flag { envelope.data } else { Vec::new() };
        exactly_one("lead", &id, leads).map_err(|e| e.with_request(&path, None))
    }
}

#[async_trait]
impl List for Lead {
    type Query = ListQuery;

    #[tracing::instrument(skip(client, cancel))]
    async fn list_page(
        client: &WorkizClient,
        cancel: &CancellationToken,
        query: &Self::Query,
        offset: u32,
    ) -> Result<Page<Self>> {
        let path = query.to_path("lead/all/", offset);
        let envelope: DataEnvelope<Vec<Lead>> = client.get(cancel, &path).await?;
        Ok(Page::new(envelope.data, offset, PAGE_SIZE, envelope.has_more))
    }
}

#[async_trait]
impl Update for Lead {
    type Id = String;
    type Params = LeadSchedule;

    #[tracing::instrument(skip(client, cancel))]
    async fn update(
        client: &WorkizClient,
        cancel: &CancellationToken,
        id: String,
        params: LeadSchedule,
    ) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Body<'a> {
            #[serde(rename = "auth_secret")]
            auth_secret: &'a str,
            #[serde(rename = "UUID")]
            uuid: &'a str,
            timezone: &'a str,
            lead_date_time: DateTime<Utc>,
            lead_end_date_time: DateTime<Utc>,
        }

        let body = Body {
            auth_secret: client.secret(),
            uuid: &id,
            timezone: LEAD_TIMEZONE,
            lead_date_time: params.start,
            lead_end_date_time: params.start + params.duration,
        };
        client.post(cancel, "lead/update/", &body).await?;
        Ok(())
    }
}

#[async_trait]
impl Create for Lead {
    type Params = CreateLead;
    type Output = ();

    #[tracing::instrument(skip_all)]
    async fn create(
        client: &WorkizClient,
        cancel: &CancellationToken,
        mut params: CreateLead,
    ) -> Result<()> {
        params.timezone = LEAD_TIMEZONE.to_string();
        let body = Authed {
            auth_secret: client.secret(),
            inner: params,
        };
        client.post(cancel, "lead/create/", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_listing_shape() {
        let body = r#"{"flag":true,"data":[{"UUID":"SRUYUI","SerialId":"3","LeadDateTime":"2023-02-28 12:00:00","LeadEndDateTime":"2023-02-28 13:00:00","CreatedDate":"2022-12-19 09:44:07","ClientId":"1002","Status":"new","SubStatus":"","PaymentDueDate":"2023-01-18 00:00:00","Phone":"","Email":"nathan+1@beelineroutes.com","Comments":"","FirstName":"Nathan","LastName":"Thomas","Company":"","Address":"23 Potter pl","City":"Shelburne","State":"VT","PostalCode":"05482","Country":"US","Unit":"","Latitude":"44.3998458","Longitude":"-73.2037722","LeadNotes":"","JobSource":"","CreatedBy":"Nathan Thomas","Team":[],"JobType":"Growler Fill"},{"UUID":"ET38H9","SerialId":"4","LeadDateTime":"2023-02-27 14:00:00","LeadEndDateTime":"2023-02-27 14:15:00","ClientId":"1002","Status":"new","Comments":"","Team":[{"id":"228777","name":"Nathan Thomas"},{"id":"246389","name":"Brooklyn Thomas"}],"JobType":"Full Case"},{"UUID":"Z7X968","SerialId":"2","LeadDateTime":"2022-10-02 15:00:00","LeadEndDateTime":"2022-10-02 16:00:00","ClientId":"1002","Status":"new","Team":[],"JobType":"Growler Fill"},{"UUID":"9T3O0W","SerialId":"1","LeadDateTime":"2022-10-01 15:00:00","LeadEndDateTime":"2022-10-01 16:00:00","ClientId":"1002","Status":"new","Team":[],"JobType":"Growler Fill"}],"has_more":false,"found":4,"code":200}"#;

        let envelope: DataEnvelope<Vec<Lead>> = serde_json::from_str(body).unwrap();

        assert_eq!(envelope.data.len(), 4);
        assert_eq!(envelope.has_more, Some(false));
        assert_eq!(envelope.data[0].status, JobStatus::New);
        assert_eq!(envelope.data[0].duration(), Some(Duration::hours(1)));
        assert_eq!(envelope.data[1].team.len(), 2);
        assert_eq!(envelope.data[1].duration(), Some(Duration::minutes(15)));
    }

    #[test]
    fn test_lead_null_fields_read_as_defaults() {
        let lead: Lead = serde_json::from_str(
            r#"{"UUID":"SRUYUI","ClientId":null,"LeadNotes":null,"JobSource":null,"Team":null}"#,
        )
        .unwrap();

        assert_eq!(lead.client_id, 0);
        assert_eq!(lead.lead_notes, "");
        assert!(lead.team.is_empty());
        assert_eq!(lead.duration(), None);
    }
}
