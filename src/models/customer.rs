//! Customer model. Workiz calls these "clients".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::envelope::DataEnvelope;
use crate::error::{Result, WorkizError};
use crate::models::Authed;
use crate::traits::{Create, Get};

/// A Workiz customer.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Customer {
    #[serde(skip_serializing_if = "String::is_empty")]
    #[serde_as(as = "DefaultOnNull")]
    pub id: String,
    #[serde_as(as = "DefaultOnNull")]
    pub first_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub last_name: String,
    #[serde_as(as = "DefaultOnNull")]
    pub address: String,
    #[serde_as(as = "DefaultOnNull")]
    pub city: String,
    #[serde_as(as = "DefaultOnNull")]
    pub state: String,
    #[serde_as(as = "DefaultOnNull")]
    pub zip: String,
    #[serde_as(as = "DefaultOnNull")]
    pub source: String,
    #[serde_as(as = "DefaultOnNull")]
    pub email: String,
    #[serde_as(as = "DefaultOnNull")]
    pub allow_billing: bool,
}

impl Customer {
    /// "First Last", trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
struct CreatedId {
    client_id: String,
}

#[async_trait]
impl Get for Customer {
    type Id = String;

    #[tracing::instrument(skip(client, cancel))]
    async fn get(client: &WorkizClient, cancel: &CancellationToken, id: String) -> Result<Self> {
        let path = format!("Client/get/{}/", urlencoding::encode(&id));
        let envelope: DataEnvelope<Customer> = client.get(cancel, &path).await?;
        if !envelope.flag {
            return Err(WorkizError::ApiError {
                status: 200,
                message: format!("response flag was not true for client '{id}'"),
            }
            .with_request(&path, None));
        }
        Ok(envelope.data)
    }
}

#[async_trait]
impl Create for Customer {
    type Params = Customer;
    /// The new customer's id.
    type Output = String;

    #[tracing::instrument(skip_all)]
    async fn create(
        client: &WorkizClient,
        cancel: &CancellationToken,
        params: Customer,
    ) -> Result<String> {
        const PATH: &str = "Client/create/";

        let body = Authed {
            auth_secret: client.secret(),
            inner: params,
        };
        let envelope: DataEnvelope<Vec<CreatedId>> = client
            .dispatch(cancel, reqwest::Method::POST, PATH, Some(&body))
            .await?;

        match envelope.data.into_iter().next() {
            Some(created) if envelope.flag => Ok(created.client_id),
            _ => Err(WorkizError::ApiError {
                status: 200,
                message: "response flag was not true or no client id returned".to_string(),
            }
            .with_request(PATH, None)),
        }
    }
}
