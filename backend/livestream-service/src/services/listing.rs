//! Stream listing and the subscription feed

use super::parse_id;
use super::streamers::{StreamerDirectory, Viewer};
use crate::error::ServiceResult;
use crate::models::{SortKey, SortOrder, StreamDto, StreamFilters, StreamState};
use crate::repository::StreamStore;
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct StreamListingService {
    store: Arc<dyn StreamStore>,
}

impl StreamListingService {
    pub fn new(store: Arc<dyn StreamStore>) -> Self {
        Self { store }
    }

    /// Streams matching `filters`, each joined with its streamer.
    ///
    /// With a `viewer_id`, every streamer carries `isSubscribed` for that
    /// viewer; without one the flag is omitted.
    #[instrument(skip(self))]
    pub async fn get_list_of_streams(
        &self,
        filters: StreamFilters,
        viewer_id: Option<&str>,
    ) -> ServiceResult<Vec<StreamDto>> {
        let mut streams = self.store.list_streams(&filters).await?;
        // stores may collate differently; the final order is ours
        filters.sort(&mut streams);

        debug!(count = streams.len(), "Listed streams");

        StreamerDirectory::new(self.store.as_ref(), Viewer::from_raw(viewer_id))
            .assemble_all(streams)
            .await
    }

    /// Every stream (live or ended) owned by someone `subscriber_id` follows,
    /// newest first.
    #[instrument(skip(self))]
    pub async fn get_streams_from_subscriptions(
        &self,
        subscriber_id: &str,
    ) -> ServiceResult<Vec<StreamDto>> {
        let Some(subscriber_id) = parse_id(subscriber_id) else {
            return Ok(Vec::new());
        };

        let targets = self.store.list_subscription_targets(subscriber_id).await?;
        if targets.is_empty() {
            return Ok(Vec::new());
        }

        let owners: Vec<_> = targets.into_iter().collect();
        let mut streams = self.store.list_streams_by_owners(&owners).await?;
        StreamFilters::new(StreamState::All, SortKey::Time, SortOrder::Desc).sort(&mut streams);

        debug!(%subscriber_id, count = streams.len(), "Listed subscription feed");

        StreamerDirectory::new(self.store.as_ref(), Viewer::Subscriber)
            .assemble_all(streams)
            .await
    }
}
