//! Team members and the name/id roster.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::envelope::DataEnvelope;
use crate::error::Result;

/// A Workiz team member.
///
/// The id is the member's identity; the display name can be changed at any
/// time and is not a stable key.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Stable member id.
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,

    /// Current display name.
    #[serde_as(as = "DefaultOnNull")]
    pub name: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub role: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub email: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub active: bool,

    /// Whether the member works in the field.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub field_tech: bool,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub service_areas: Vec<String>,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub skills: Vec<String>,
}

/// `team/all/` replies either with the usual envelope or with a bare
/// array of member groups.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TeamListing {
    Envelope(DataEnvelope<Vec<Member>>),
    Grouped(Vec<Vec<Member>>),
}

impl TeamListing {
    fn into_members(self) -> Vec<Member> {
        match self {
            Self::Envelope(envelope) => envelope.data,
            Self::Grouped(groups) => groups.into_iter().flatten().collect(),
        }
    }
}

/// List every team member.
#[tracing::instrument(skip(client, cancel))]
pub async fn list_team(client: &WorkizClient, cancel: &CancellationToken) -> Result<Vec<Member>> {
    let listing: TeamListing = client.get(cancel, "team/all/").await?;
    Ok(listing.into_members())
}

/// The team indexed by name and by id.
///
/// Names resolve case-insensitively. A name carried by more than one
/// member does not resolve at all, so a lookup never picks one of two
/// people at random.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    by_id: HashMap<String, String>,
    by_name: HashMap<String, Option<String>>,
}

impl Roster {
    /// Index a member listing.
    pub fn new(members: impl IntoIterator<Item = Member>) -> Self {
        let mut roster = Self::default();
        for member in members {
            roster
                .by_name
                .entry(member.name.to_lowercase())
                .and_modify(|id| *id = None)
                .or_insert_with(|| Some(member.id.clone()));
            roster.by_id.insert(member.id, member.name);
        }
        roster
    }

    /// Fetch the current team and index it.
    pub async fn fetch(client: &WorkizClient, cancel: &CancellationToken) -> Result<Self> {
        Ok(Self::new(list_team(client, cancel).await?))
    }

    /// The id of the member currently called `name`.
    pub fn find_id(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|id| id.as_deref())
    }

    /// The current name of the member with `id`.
    pub fn find_name(&self, id: &str) -> Option<&str> {
        self.by_id.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
