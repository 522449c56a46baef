//! Stream lifecycle (business logic layer)
//!
//! create → update* → end → delete, with ownership checked on end and the
//! viewer total frozen when a stream ends.

use super::{find_stream, find_user, parse_id};
use super::streamers::{StreamerDirectory, Viewer};
use crate::error::{ServiceError, ServiceResult, NOT_AUTHORISED_TO_END};
use crate::metrics;
use crate::models::{
    NewStream, StreamDto, StreamPatch, StreamRecord, StreamUpdate, StreamerProfile, View,
};
use crate::repository::StreamStore;
use crate::validation;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Result of a successful `end_stream` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EndOutcome {
    Ended {
        #[serde(rename = "totalViewers")]
        total_viewers: i64,
    },
    /// The stream had already ended; nothing was changed
    AlreadyEnded,
}

#[derive(Clone)]
pub struct StreamLifecycleService {
    store: Arc<dyn StreamStore>,
}

impl StreamLifecycleService {
    pub fn new(store: Arc<dyn StreamStore>) -> Self {
        Self { store }
    }

    /// Create a new stream owned by `owner_id`
    #[instrument(skip(self, fields))]
    pub async fn create_stream(&self, owner_id: &str, fields: NewStream) -> ServiceResult<StreamDto> {
        validation::validate_new_stream(&fields)?;

        let owner = find_user(self.store.as_ref(), owner_id).await?;

        // presence of both was checked by validate_new_stream
        let title = fields.title.unwrap_or_default();
        let app_instance = fields.app_instance.unwrap_or_default();

        validation::ensure_unique_app_instance(self.store.as_ref(), &app_instance).await?;

        let stream = self
            .store
            .create_stream(StreamRecord {
                owner_id: owner.id,
                title,
                description: fields.description,
                app_instance,
                created_at: fields.created_at.unwrap_or_else(Utc::now),
                ended_at: fields.ended_at,
            })
            .await?;

        metrics::record_stream_created();
        info!(stream_id = %stream.id, owner_id = %owner.id, live = stream.live, "Stream created");

        Ok(StreamDto::new(stream, StreamerProfile::from(&owner)))
    }

    /// Fetch a stream joined with its streamer's profile.
    /// Empty and malformed ids are reported exactly like unknown ids.
    #[instrument(skip(self))]
    pub async fn get_stream_by_id(&self, stream_id: &str) -> ServiceResult<StreamDto> {
        let stream = find_stream(self.store.as_ref(), stream_id).await?;
        StreamerDirectory::new(self.store.as_ref(), Viewer::Anonymous)
            .assemble(stream)
            .await
    }

    /// Partial update of title and/or description. Returns the same joined
    /// shape as `get_stream_by_id`, live viewer count included.
    #[instrument(skip(self, fields))]
    pub async fn update_stream(
        &self,
        stream_id: &str,
        fields: StreamPatch,
    ) -> ServiceResult<StreamDto> {
        let stream = find_stream(self.store.as_ref(), stream_id).await?;
        validation::validate_stream_patch(&fields)?;

        let updated = self
            .store
            .update_stream(stream.id, StreamUpdate::from(fields))
            .await?
            .ok_or_else(ServiceError::stream_not_found)?;

        info!(stream_id = %updated.id, "Stream updated");
        StreamerDirectory::new(self.store.as_ref(), Viewer::Anonymous)
            .assemble(updated)
            .await
    }

    /// End a live stream. Only the owner may end it.
    ///
    /// Existence is checked before ownership so an unknown stream is always
    /// reported as not found, whoever asks.
    #[instrument(skip(self))]
    pub async fn end_stream(&self, caller_id: &str, stream_id: &str) -> ServiceResult<EndOutcome> {
        let stream = find_stream(self.store.as_ref(), stream_id).await?;

        if parse_id(caller_id) != Some(stream.owner_id) {
            return Err(ServiceError::NotAuthorised(NOT_AUTHORISED_TO_END.to_string()));
        }

        if !stream.live {
            info!(stream_id = %stream.id, "Stream already ended");
            return Ok(EndOutcome::AlreadyEnded);
        }

        let total_viewers = self.store.count_views(stream.id).await?;
        self.store
            .update_stream(
                stream.id,
                StreamUpdate {
                    ended_at: Some(Utc::now()),
                    total_viewers: Some(total_viewers),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(ServiceError::stream_not_found)?;

        metrics::record_stream_ended();
        info!(stream_id = %stream.id, total_viewers, "Stream ended");

        Ok(EndOutcome::Ended { total_viewers })
    }

    /// Delete a stream with its views and comments
    #[instrument(skip(self))]
    pub async fn delete_stream(&self, stream_id: &str) -> ServiceResult<()> {
        let Some(id) = parse_id(stream_id) else {
            return Err(ServiceError::stream_not_found());
        };

        if !self.store.delete_stream(id).await? {
            return Err(ServiceError::stream_not_found());
        }

        info!(stream_id = %id, "Stream deleted");
        Ok(())
    }

    /// Record that `user_id` is watching. Repeated calls record repeated views.
    #[instrument(skip(self))]
    pub async fn create_view(&self, user_id: &str, stream_id: &str) -> ServiceResult<View> {
        let stream = find_stream(self.store.as_ref(), stream_id).await?;
        let user = find_user(self.store.as_ref(), user_id).await?;

        self.store.create_view(user.id, stream.id).await
    }
}
