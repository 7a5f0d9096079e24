//! List trait for fetching collections of entities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::client::WorkizClient;
use crate::error::{Result, WorkizError};
use crate::pagination::{DateRange, Page, PageCursor, MAX_PAGES};

/// Entities with a primary scheduled time.
pub trait Scheduled {
    /// The stable identifier of the record.
    fn record_id(&self) -> &str;

    /// When the record is scheduled to start, if it is scheduled at all.
    fn scheduled_at(&self) -> Option<DateTime<Utc>>;
}

/// List/filter entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use workiz::{WorkizClient, Job, ListQuery, DateRange, List};
///
/// // Fetch a single page
/// let page = Job::list_page(&client, &cancel, &ListQuery::default(), 0).await?;
///
/// // Fetch everything scheduled in a window
/// let jobs = Job::list_all(&client, &cancel, &ListQuery::default(), range).await?;
/// ```
#[async_trait]
pub trait List: Scheduled + Sized + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// Fetch one raw page (no client-side filtering).
    ///
    /// # Arguments
    ///
    /// * `client` - The Workiz API client
    /// * `cancel` - Cancellation token for the call
    /// * `query` - Server-side filters
    /// * `offset` - Page index (0-indexed)
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &WorkizClient,
        cancel: &CancellationToken,
        query: &Self::Query,
        offset: u32,
    ) -> Result<Page<Self>>;

    /// Collect every record in `range`, one page at a time.
    ///
    /// Stops on the first terminal page (see [`PageCursor::absorb`]). If
    /// [`MAX_PAGES`] pages go by without one, fails with
    /// [`ErrorKind::TooManyRecords`](crate::ErrorKind::TooManyRecords).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or the call is cancelled.
    async fn list_all(
        client: &WorkizClient,
        cancel: &CancellationToken,
        query: &Self::Query,
        range: DateRange,
    ) -> Result<Vec<Self>> {
        let mut cursor = PageCursor::new(range);

        while cursor.offset() < MAX_PAGES {
            if cancel.is_cancelled() {
                return Err(WorkizError::Cancelled);
            }

            let page = Self::list_page(client, cancel, query, cursor.offset()).await?;
            if !cursor.absorb(page, Self::scheduled_at) {
                return Ok(cursor.into_items());
            }
        }

        tracing::warn!(
            pages = MAX_PAGES,
            records = cursor.len(),
            "listing did not end within the page limit"
        );
        Err(WorkizError::TooManyRecords {
            count: cursor.len(),
            range: cursor.range().to_string(),
        })
    }
}
