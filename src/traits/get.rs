//! Get trait for fetching single entities.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::error::{Result, WorkizError};

/// Fetch a single entity by ID.
///
/// Lookup endpoints answer with a list; an empty list is
/// [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) and more than one
/// record is [`ErrorKind::AmbiguousResult`](crate::ErrorKind::AmbiguousResult).
///
/// # Example
///
/// ```ignore
/// use workiz::{WorkizClient, Job, Get};
///
/// let client = WorkizClient::from_env()?;
/// let job = Job::get(&client, &cancel, "XZDO9T".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &WorkizClient, cancel: &CancellationToken, id: Self::Id)
        -> Result<Self>;
}

/// Reduce a lookup reply to its single record.
pub(crate) fn exactly_one<T>(entity: &'static str, id: &str, mut records: Vec<T>) -> Result<T> {
    match records.len() {
        0 => Err(WorkizError::NotFound {
            entity,
            id: id.to_string(),
        }),
        1 => Ok(records.remove(0)),
        count => Err(WorkizError::AmbiguousResult {
            entity,
            id: id.to_string(),
            count,
        }),
    }
}
