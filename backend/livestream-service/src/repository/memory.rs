use super::StreamStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Comment, CommentRecord, Stream, StreamFilters, StreamRecord, StreamUpdate, Subscription, User,
    View,
};
use crate::validation::APP_INSTANCE_NOT_UNIQUE;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct State {
    users: HashMap<Uuid, User>,
    /// Insertion order is the tie-breaker for listings
    streams: Vec<Stream>,
    views: Vec<View>,
    subscriptions: Vec<Subscription>,
    comments: Vec<Comment>,
}

/// Process-local store used when no database is configured, and by tests.
///
/// Mirrors the PostgreSQL schema constraints: unique `app_instance` and
/// cascading deletes of views and comments.
#[derive(Clone, Default)]
pub struct InMemoryStreamStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user. Accounts are owned by the identity service.
    pub async fn insert_user(&self, username: &str, alias: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            alias: alias.to_string(),
            created_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .users
            .insert(user.id, user.clone());
        user
    }

    /// Idempotent follow edge; returns true if a new edge was inserted.
    pub async fn insert_subscription(&self, subscriber_id: Uuid, target_id: Uuid) -> bool {
        let mut state = self.state.write().await;
        let exists = state
            .subscriptions
            .iter()
            .any(|s| s.subscriber_id == subscriber_id && s.target_id == target_id);
        if exists {
            return false;
        }
        state.subscriptions.push(Subscription {
            subscriber_id,
            target_id,
            created_at: Utc::now(),
        });
        true
    }
}

#[async_trait::async_trait]
impl StreamStore for InMemoryStreamStore {
    async fn find_user(&self, user_id: Uuid) -> ServiceResult<Option<User>> {
        Ok(self.state.read().await.users.get(&user_id).cloned())
    }

    async fn create_stream(&self, record: StreamRecord) -> ServiceResult<Stream> {
        let mut state = self.state.write().await;
        if state
            .streams
            .iter()
            .any(|s| s.app_instance == record.app_instance)
        {
            return Err(ServiceError::invalid_field(
                "appInstance",
                APP_INSTANCE_NOT_UNIQUE,
            ));
        }

        let stream = Stream {
            id: Uuid::new_v4(),
            owner_id: record.owner_id,
            title: record.title,
            description: record.description,
            app_instance: record.app_instance,
            created_at: record.created_at,
            live: record.ended_at.is_none(),
            ended_at: record.ended_at,
            total_viewers: 0,
        };
        state.streams.push(stream.clone());
        debug!(stream_id = %stream.id, "Inserted stream");
        Ok(stream)
    }

    async fn find_stream_by_id(&self, stream_id: Uuid) -> ServiceResult<Option<Stream>> {
        let state = self.state.read().await;
        Ok(state.streams.iter().find(|s| s.id == stream_id).cloned())
    }

    async fn find_stream_by_app_instance(
        &self,
        app_instance: &str,
    ) -> ServiceResult<Option<Stream>> {
        let state = self.state.read().await;
        Ok(state
            .streams
            .iter()
            .find(|s| s.app_instance == app_instance)
            .cloned())
    }

    async fn update_stream(
        &self,
        stream_id: Uuid,
        update: StreamUpdate,
    ) -> ServiceResult<Option<Stream>> {
        let mut state = self.state.write().await;
        let Some(stream) = state.streams.iter_mut().find(|s| s.id == stream_id) else {
            return Ok(None);
        };

        if let Some(title) = update.title {
            stream.title = title;
        }
        if let Some(description) = update.description {
            stream.description = Some(description);
        }
        if let Some(ended_at) = update.ended_at {
            stream.ended_at = Some(ended_at);
            stream.live = false;
        }
        if let Some(total_viewers) = update.total_viewers {
            stream.total_viewers = total_viewers;
        }
        Ok(Some(stream.clone()))
    }

    async fn delete_stream(&self, stream_id: Uuid) -> ServiceResult<bool> {
        let mut state = self.state.write().await;
        let before = state.streams.len();
        state.streams.retain(|s| s.id != stream_id);
        if state.streams.len() == before {
            return Ok(false);
        }
        state.views.retain(|v| v.stream_id != stream_id);
        state.comments.retain(|c| c.stream_id != stream_id);
        Ok(true)
    }

    async fn list_streams(&self, filters: &StreamFilters) -> ServiceResult<Vec<Stream>> {
        let state = self.state.read().await;
        let mut streams: Vec<Stream> = state
            .streams
            .iter()
            .filter(|s| filters.state.matches(s))
            .cloned()
            .collect();
        filters.sort(&mut streams);
        Ok(streams)
    }

    async fn list_streams_by_owners(&self, owner_ids: &[Uuid]) -> ServiceResult<Vec<Stream>> {
        let state = self.state.read().await;
        Ok(state
            .streams
            .iter()
            .filter(|s| owner_ids.contains(&s.owner_id))
            .cloned()
            .collect())
    }

    async fn create_view(&self, user_id: Uuid, stream_id: Uuid) -> ServiceResult<View> {
        let view = View {
            id: Uuid::new_v4(),
            user_id,
            stream_id,
            created_at: Utc::now(),
        };
        self.state.write().await.views.push(view.clone());
        Ok(view)
    }

    async fn count_views(&self, stream_id: Uuid) -> ServiceResult<i64> {
        let state = self.state.read().await;
        Ok(state.views.iter().filter(|v| v.stream_id == stream_id).count() as i64)
    }

    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        target_id: Uuid,
    ) -> ServiceResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .iter()
            .any(|s| s.subscriber_id == subscriber_id && s.target_id == target_id))
    }

    async fn list_subscription_targets(
        &self,
        subscriber_id: Uuid,
    ) -> ServiceResult<HashSet<Uuid>> {
        let state = self.state.read().await;
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.subscriber_id == subscriber_id)
            .map(|s| s.target_id)
            .collect())
    }

    async fn create_comment(&self, record: CommentRecord) -> ServiceResult<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            stream_id: record.stream_id,
            content: record.content,
            alias: record.alias,
            created_at: record.created_at,
        };
        self.state.write().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_comment(
        &self,
        user_id: Uuid,
        stream_id: Uuid,
        content: &str,
    ) -> ServiceResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .find(|c| c.user_id == user_id && c.stream_id == stream_id && c.content == content)
            .cloned())
    }

    async fn list_comments(&self, stream_id: Uuid) -> ServiceResult<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.stream_id == stream_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }
}
