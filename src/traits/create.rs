//! Create trait for adding entities.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::error::Result;

/// Create a new entity.
#[async_trait]
pub trait Create {
    /// The creation payload.
    type Params: Send;

    /// What the server hands back (an id, or nothing).
    type Output;

    /// Create the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    async fn create(
        client: &WorkizClient,
        cancel: &CancellationToken,
        params: Self::Params,
    ) -> Result<Self::Output>;
}
