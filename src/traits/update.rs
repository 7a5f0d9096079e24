//! Update trait for modifying entities.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::error::Result;

/// Update an existing entity.
///
/// Workiz acknowledges updates without echoing the entity back, so
/// implementations return nothing; fetch the entity again to observe the
/// change.
///
/// # Example
///
/// ```ignore
/// use workiz::{WorkizClient, Lead, LeadSchedule, Update};
///
/// Lead::update(
///     &client,
///     &cancel,
///     "SRUYUI".to_string(),
///     LeadSchedule { start, duration: chrono::Duration::hours(1) },
/// ).await?;
/// ```
#[async_trait]
pub trait Update {
    /// The ID type for this entity.
    type Id;

    /// Parameters for the update.
    type Params;

    /// Apply the update.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn update(
        client: &WorkizClient,
        cancel: &CancellationToken,
        id: Self::Id,
        params: Self::Params,
    ) -> Result<()>;
}
