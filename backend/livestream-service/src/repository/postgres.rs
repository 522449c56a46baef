use super::StreamStore;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    Comment, CommentRecord, SortKey, SortOrder, Stream, StreamFilters, StreamRecord, StreamState,
    StreamUpdate, User, View,
};
use crate::validation::APP_INSTANCE_NOT_UNIQUE;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

const STREAM_COLUMNS: &str = "id, owner_id, title, description, app_instance, created_at, ended_at, live, total_viewers";
const APP_INSTANCE_CONSTRAINT: &str = "streams_app_instance_key";

/// PostgreSQL-backed store (source of truth in production)
#[derive(Clone)]
pub struct PgStreamStore {
    pool: PgPool,
}

impl PgStreamStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// The unique constraint on `app_instance` is reported the same way the
/// service-level uniqueness check reports it.
fn map_stream_insert_error(err: sqlx::Error) -> ServiceError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(APP_INSTANCE_CONSTRAINT) {
            return ServiceError::invalid_field("appInstance", APP_INSTANCE_NOT_UNIQUE);
        }
    }
    ServiceError::Database(err)
}

fn list_streams_query(filters: &StreamFilters) -> String {
    let where_clause = match filters.state {
        StreamState::All => "",
        StreamState::Live => "WHERE live",
        StreamState::Done => "WHERE NOT live",
    };
    let sort_column = match filters.sort {
        SortKey::Title => r#"title COLLATE "C""#,
        SortKey::Time => "created_at",
    };
    let direction = match filters.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };

    format!(
        "SELECT {STREAM_COLUMNS} FROM streams {where_clause} ORDER BY {sort_column} {direction}, seq ASC"
    )
}

#[async_trait::async_trait]
impl StreamStore for PgStreamStore {
    async fn find_user(&self, user_id: Uuid) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, alias, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_stream(&self, record: StreamRecord) -> ServiceResult<Stream> {
        let query = format!(
            r#"
            INSERT INTO streams (id, owner_id, title, description, app_instance, created_at, ended_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STREAM_COLUMNS}
            "#
        );

        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(Uuid::new_v4())
            .bind(record.owner_id)
            .bind(record.title)
            .bind(record.description)
            .bind(record.app_instance)
            .bind(record.created_at)
            .bind(record.ended_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_stream_insert_error)?;

        debug!(stream_id = %stream.id, "Inserted stream");
        Ok(stream)
    }

    async fn find_stream_by_id(&self, stream_id: Uuid) -> ServiceResult<Option<Stream>> {
        let query = format!("SELECT {STREAM_COLUMNS} FROM streams WHERE id = $1");
        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(stream_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stream)
    }

    async fn find_stream_by_app_instance(
        &self,
        app_instance: &str,
    ) -> ServiceResult<Option<Stream>> {
        let query = format!("SELECT {STREAM_COLUMNS} FROM streams WHERE app_instance = $1");
        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(app_instance)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stream)
    }

    async fn update_stream(
        &self,
        stream_id: Uuid,
        update: StreamUpdate,
    ) -> ServiceResult<Option<Stream>> {
        let query = format!(
            r#"
            UPDATE streams
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                ended_at = COALESCE($4, ended_at),
                total_viewers = COALESCE($5, total_viewers)
            WHERE id = $1
            RETURNING {STREAM_COLUMNS}
            "#
        );

        let stream = sqlx::query_as::<_, Stream>(&query)
            .bind(stream_id)
            .bind(update.title)
            .bind(update.description)
            .bind(update.ended_at)
            .bind(update.total_viewers)
            .fetch_optional(&self.pool)
            .await?;

        Ok(stream)
    }

    async fn delete_stream(&self, stream_id: Uuid) -> ServiceResult<bool> {
        // views and comments go with it (ON DELETE CASCADE)
        let affected = sqlx::query("DELETE FROM streams WHERE id = $1")
            .bind(stream_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn list_streams(&self, filters: &StreamFilters) -> ServiceResult<Vec<Stream>> {
        let streams = sqlx::query_as::<_, Stream>(&list_streams_query(filters))
            .fetch_all(&self.pool)
            .await?;

        Ok(streams)
    }

    async fn list_streams_by_owners(&self, owner_ids: &[Uuid]) -> ServiceResult<Vec<Stream>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {STREAM_COLUMNS} FROM streams WHERE owner_id = ANY($1) ORDER BY seq ASC"
        );
        let streams = sqlx::query_as::<_, Stream>(&query)
            .bind(owner_ids.to_vec())
            .fetch_all(&self.pool)
            .await?;

        Ok(streams)
    }

    async fn create_view(&self, user_id: Uuid, stream_id: Uuid) -> ServiceResult<View> {
        let view = sqlx::query_as::<_, View>(
            r#"
            INSERT INTO views (id, user_id, stream_id)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, stream_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(stream_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(view)
    }

    async fn count_views(&self, stream_id: Uuid) -> ServiceResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM views WHERE stream_id = $1")
            .bind(stream_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn find_subscription(
        &self,
        subscriber_id: Uuid,
        target_id: Uuid,
    ) -> ServiceResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND target_id = $2
            )
            "#,
        )
        .bind(subscriber_id)
        .bind(target_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_subscription_targets(
        &self,
        subscriber_id: Uuid,
    ) -> ServiceResult<HashSet<Uuid>> {
        let targets: Vec<Uuid> =
            sqlx::query_scalar("SELECT target_id FROM subscriptions WHERE subscriber_id = $1")
                .bind(subscriber_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(targets.into_iter().collect())
    }

    async fn create_comment(&self, record: CommentRecord) -> ServiceResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, user_id, stream_id, content, alias, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, stream_id, content, alias, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(record.user_id)
        .bind(record.stream_id)
        .bind(record.content)
        .bind(record.alias)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_comment(
        &self,
        user_id: Uuid,
        stream_id: Uuid,
        content: &str,
    ) -> ServiceResult<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, stream_id, content, alias, created_at
            FROM comments
            WHERE user_id = $1 AND stream_id = $2 AND content = $3
            ORDER BY seq ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(stream_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn list_comments(&self, stream_id: Uuid) -> ServiceResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, user_id, stream_id, content, alias, created_at
            FROM comments
            WHERE stream_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(stream_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn health_check(&self) -> ServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
