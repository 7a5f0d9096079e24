//! Crew reconciliation.
//!
//! Jobs and leads list their assigned crew as `{id, name}` records, but the
//! name on the record is whatever the member was called when assigned; a
//! later rename does not reach it. The assign and unassign endpoints only
//! accept a display name. So the diff is computed by id and the calls are
//! made with each member's current roster name.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::error::{Result, WorkizError};
use crate::models::Roster;

/// One crew member as recorded on a job or lead.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Member id.
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    /// Member name at the time of assignment (may be stale).
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,
}

/// Adds one member, by display name, to an entity's crew.
#[async_trait]
pub trait Assigner {
    async fn assign(&self, cancel: &CancellationToken, name: &str) -> Result<()>;
}

/// Removes one member, by display name, from an entity's crew.
#[async_trait]
pub trait Unassigner {
    async fn unassign(&self, cancel: &CancellationToken, name: &str) -> Result<()>;
}

/// What a reconciliation did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrewChanges {
    /// Names passed to `assign`.
    pub added: Vec<String>,
    /// Current names passed to `unassign`.
    pub removed: Vec<String>,
    /// Desired names that matched no single roster member.
    pub unresolved_names: Vec<String>,
    /// Assigned ids that are no longer on the roster.
    pub unresolved_ids: Vec<String>,
}

impl CrewChanges {
    /// True if no assign or unassign call was made.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Move an entity's crew from `current` to `desired`.
///
/// Adds every desired member whose id is not yet assigned, then removes
/// every assigned member whose current name is not desired. Members that
/// cannot be resolved through the roster are skipped and reported in the
/// returned [`CrewChanges`]. The first failing call aborts the rest;
/// changes already made are kept.
#[tracing::instrument(skip_all, fields(current = current.len(), desired = desired.len()))]
pub async fn reconcile_crew<C>(
    cancel: &CancellationToken,
    crew: &C,
    roster: &Roster,
    current: &[AssignmentRecord],
    desired: &[String],
) -> Result<CrewChanges>
where
    C: Assigner + Unassigner + Sync + ?Sized,
{
    let mut changes = CrewChanges::default();
    let assigned: HashSet<&str> = current.iter().map(|r| r.id.as_str()).collect();
    let mut queued: HashSet<&str> = HashSet::new();

    for name in desired {
        let Some(id) = roster.find_id(name) else {
            tracing::warn!(name = %name, "crew name not on roster, skipping");
            changes.unresolved_names.push(name.clone());
            continue;
        };
        if assigned.contains(id) || !queued.insert(id) {
            continue;
        }

        if cancel.is_cancelled() {
            return Err(WorkizError::Cancelled);
        }
        crew.assign(cancel, name).await?;
        changes.added.push(name.clone());
    }

    for record in current {
        let Some(name) = roster.find_name(&record.id) else {
            tracing::warn!(id = %record.id, stale_name = %record.name, "assigned member not on roster, skipping");
            changes.unresolved_ids.push(record.id.clone());
            continue;
        };
        if desired.iter().any(|d| same_name(d, name)) {
            continue;
        }

        if cancel.is_cancelled() {
            return Err(WorkizError::Cancelled);
        }
        crew.unassign(cancel, name).await?;
        changes.removed.push(name.to_string());
    }

    tracing::debug!(
        added = changes.added.len(),
        removed = changes.removed.len(),
        "crew reconciled"
    );
    Ok(changes)
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Which crew endpoints to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrewEntity {
    Job,
    Lead,
}

impl CrewEntity {
    fn prefix(self) -> &'static str {
        match self {
            Self::Job => "jobs",
            Self::Lead => "lead",
        }
    }
}

/// The crew of one job or lead, reached through the API.
#[derive(Debug, Clone, Copy)]
pub struct CrewTarget<'a> {
    client: &'a WorkizClient,
    entity: CrewEntity,
    id: &'a str,
}

impl<'a> CrewTarget<'a> {
    pub fn new(client: &'a WorkizClient, entity: CrewEntity, id: &'a str) -> Self {
        Self { client, entity, id }
    }

    async fn call(&self, cancel: &CancellationToken, action: &str, name: &str) -> Result<()> {
        #[derive(Serialize)]
        struct CrewChange<'b> {
            auth_secret: &'b str,
            #[serde(rename = "UUID")]
            uuid: &'b str,
            #[serde(rename = "User")]
            user: &'b str,
        }

        let body = CrewChange {
            auth_secret: self.client.secret(),
            uuid: self.id,
            user: name,
        };
        let path = format!("{}/{}/", self.entity.prefix(), action);
        self.client
            .send(cancel, Method::POST, &path, Some(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<'a> Assigner for CrewTarget<'a> {
    async fn assign(&self, cancel: &CancellationToken, name: &str) -> Result<()> {
        self.call(cancel, "assign", name).await
    }
}

#[async_trait]
impl<'a> Unassigner for CrewTarget<'a> {
    async fn unassign(&self, cancel: &CancellationToken, name: &str) -> Result<()> {
        self.call(cancel, "unassign", name).await
    }
}
