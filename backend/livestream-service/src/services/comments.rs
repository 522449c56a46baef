//! Stream comments
//!
//! A comment with the same (user, stream, content) as an existing one is not
//! stored twice; the existing comment is returned instead.

use super::{find_stream, find_user};
use crate::error::ServiceResult;
use crate::metrics;
use crate::models::{Comment, CommentRecord, NewComment};
use crate::repository::StreamStore;
use crate::validation;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn StreamStore>,
}

impl CommentService {
    pub fn new(store: Arc<dyn StreamStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self, fields))]
    pub async fn create_comment(
        &self,
        user_id: &str,
        stream_id: &str,
        fields: NewComment,
    ) -> ServiceResult<Comment> {
        validation::validate_new_comment(&fields)?;

        let stream = find_stream(self.store.as_ref(), stream_id).await?;
        let user = find_user(self.store.as_ref(), user_id).await?;

        if let Some(existing) = self
            .store
            .find_comment(user.id, stream.id, &fields.content)
            .await?
        {
            metrics::record_comment_submitted(true);
            debug!(comment_id = %existing.id, "Duplicate comment folded into existing");
            return Ok(existing);
        }

        let alias = fields
            .alias
            .filter(|alias| !alias.trim().is_empty())
            .unwrap_or_else(|| user.alias.clone());

        let comment = self
            .store
            .create_comment(CommentRecord {
                user_id: user.id,
                stream_id: stream.id,
                content: fields.content,
                alias,
                created_at: fields.created_at.unwrap_or_else(Utc::now),
            })
            .await?;

        metrics::record_comment_submitted(false);
        info!(comment_id = %comment.id, stream_id = %stream.id, user_id = %user.id, "Comment created");

        Ok(comment)
    }

    /// Comments on a stream, oldest first
    #[instrument(skip(self))]
    pub async fn get_list_of_comments_for_stream(
        &self,
        stream_id: &str,
    ) -> ServiceResult<Vec<Comment>> {
        let stream = find_stream(self.store.as_ref(), stream_id).await?;
        self.store.list_comments(stream.id).await
    }
}
