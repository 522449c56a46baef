//! Domain models for livestream-service
//!
//! Entities mirror the storage tables; request payloads carry their
//! validation rules; DTOs are the joined shapes returned by read operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Entities
//
// Timestamps cross the wire as epoch milliseconds, in both directions.
// ============================================================================

/// Platform user. Owned by the account service; read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "userId")]
    pub id: Uuid,
    pub username: String,
    pub alias: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A broadcast session. `live` is true exactly while `ended_at` is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    #[serde(rename = "streamId")]
    pub id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub app_instance: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub ended_at: Option<DateTime<Utc>>,
    pub live: bool,
    pub total_viewers: i64,
}

/// A recorded (user, stream) watching association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct View {
    #[serde(rename = "viewId")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub stream_id: Uuid,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Directed follow edge: `subscriber_id` follows `target_id`'s streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscriber_id: Uuid,
    pub target_id: Uuid,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "commentId")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub stream_id: Uuid,
    pub content: String,
    pub alias: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Request payloads
// ============================================================================

/// Fields accepted when creating a stream.
///
/// `created_at` and `ended_at` are optional so recorded broadcasts can be
/// imported; `live` is always derived from `ended_at`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStream {
    #[validate(required, length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(required, length(min = 1))]
    pub app_instance: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub ended_at: Option<DateTime<Utc>>,
}

/// Partial update of a stream. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StreamPatch {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::not_blank"))]
    pub content: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    pub alias: Option<String>,
}

// ============================================================================
// Storage records
// ============================================================================

/// Validated stream row handed to the store for insertion
#[derive(Debug, Clone)]
pub struct StreamRecord {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub app_instance: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Store-level patch. Setting `ended_at` also clears `live`.
#[derive(Debug, Clone, Default)]
pub struct StreamUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ended_at: Option<DateTime<Utc>>,
    pub total_viewers: Option<i64>,
}

impl From<StreamPatch> for StreamUpdate {
    fn from(patch: StreamPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub user_id: Uuid,
    pub stream_id: Uuid,
    pub content: String,
    pub alias: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Listing filters
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamState {
    #[default]
    All,
    Live,
    Done,
}

impl StreamState {
    pub fn matches(&self, stream: &Stream) -> bool {
        match self {
            StreamState::All => true,
            StreamState::Live => stream.live,
            StreamState::Done => !stream.live,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Title,
    #[default]
    Time,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// `state` / `sort` / `order` triple accepted by the listing endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamFilters {
    #[serde(default)]
    pub state: StreamState,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub order: SortOrder,
}

impl StreamFilters {
    pub fn new(state: StreamState, sort: SortKey, order: SortOrder) -> Self {
        Self { state, sort, order }
    }

    /// Comparison used for listing. Titles compare byte-wise (case-sensitive).
    pub fn compare(&self, a: &Stream, b: &Stream) -> Ordering {
        let ordering = match self.sort {
            SortKey::Title => a.title.as_bytes().cmp(b.title.as_bytes()),
            SortKey::Time => a.created_at.cmp(&b.created_at),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Stable sort: equal keys keep their incoming (insertion) order.
    pub fn sort(&self, streams: &mut [Stream]) {
        streams.sort_by(|a, b| self.compare(a, b));
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// Public profile of a stream's owner, embedded in stream DTOs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamerProfile {
    pub user_id: Uuid,
    pub username: String,
    pub alias: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Only present when the listing was requested on behalf of a viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_subscribed: Option<bool>,
}

impl From<&User> for StreamerProfile {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            alias: user.alias.clone(),
            created_at: user.created_at,
            is_subscribed: None,
        }
    }
}

/// Stream joined with its streamer's public profile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamDto {
    pub stream_id: Uuid,
    pub owner: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub app_instance: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub ended_at: Option<DateTime<Utc>>,
    pub live: bool,
    pub total_viewers: i64,
    pub streamer: StreamerProfile,
}

impl StreamDto {
    pub fn new(stream: Stream, streamer: StreamerProfile) -> Self {
        Self {
            stream_id: stream.id,
            owner: stream.owner_id,
            title: stream.title,
            description: stream.description,
            app_instance: stream.app_instance,
            created_at: stream.created_at,
            ended_at: stream.ended_at,
            live: stream.live,
            total_viewers: stream.total_viewers,
            streamer,
        }
    }
}
