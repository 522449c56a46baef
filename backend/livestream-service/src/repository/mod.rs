//! Storage gateway for streams, views, subscriptions and comments
//!
//! The services only talk to storage through `StreamStore`. Two backends
//! implement it: PostgreSQL (production) and an in-memory store used for
//! local development and tests.

mod memory;
mod postgres;

pub use memory::InMemoryStreamStore;
pub use postgres::PgStreamStore;

use crate::error::ServiceResult;
use crate::models::{
    Comment, CommentRecord, Stream, StreamFilters, StreamRecord, StreamUpdate, User, View,
};
use std::collections::HashSet;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait StreamStore: Send + Sync {
    /// Look up a user by id
    async fn find_user(&self, user_id: Uuid) -> ServiceResult<Option<User>>;

    /// Insert a stream. `live` is derived from `ended_at`; `total_viewers` starts at 0.
    async fn create_stream(&self, record: StreamRecord) -> ServiceResult<Stream>;

    async fn find_stream_by_id(&self, stream_id: Uuid) -> ServiceResult<Option<Stream>>;

    async fn find_stream_by_app_instance(&self, app_instance: &str)
        -> ServiceResult<Option<Stream>>;

    /// Apply a patch. Returns `None` if the stream no longer exists.
    async fn update_stream(
        &self,
        stream_id: Uuid,
        update: StreamUpdate,
    ) -> ServiceResult<Option<Stream>>;

    /// Delete a stream together with its views and comments.
    /// Returns true if a stream row was removed.
    async fn delete_stream(&self, stream_id: Uuid) -> ServiceResult<bool>;

    /// Streams matching `filters.state`, ordered by `filters.sort` / `filters.order`,
    /// ties in insertion order
    async fn list_streams(&self, filters: &StreamFilters) -> ServiceResult<Vec<Stream>>;

    /// All streams owned by any of `owner_ids`, in insertion order
    async fn list_streams_by_owners(&self, owner_ids: &[Uuid]) -> ServiceResult<Vec<Stream>>;

    async fn create_view(&self, user_id: Uuid, stream_id: Uuid) -> ServiceResult<View>;

    async fn count_views(&self, stream_id: Uuid) -> ServiceResult<i64>;

    /// Does `subscriber_id` follow `target_id`?
    async fn find_subscription(&self, subscriber_id: Uuid, target_id: Uuid)
        -> ServiceResult<bool>;

    async fn list_subscription_targets(&self, subscriber_id: Uuid)
        -> ServiceResult<HashSet<Uuid>>;

    async fn create_comment(&self, record: CommentRecord) -> ServiceResult<Comment>;

    /// Exact-match lookup used for comment de-duplication
    async fn find_comment(
        &self,
        user_id: Uuid,
        stream_id: Uuid,
        content: &str,
    ) -> ServiceResult<Option<Comment>>;

    /// Comments of a stream, oldest first
    async fn list_comments(&self, stream_id: Uuid) -> ServiceResult<Vec<Comment>>;

    /// Health check (optional)
    async fn health_check(&self) -> ServiceResult<()> {
        Ok(())
    }
}
