//! Service layer for livestream-service
//!
//! - Stream lifecycle (create, update, end, delete, views)
//! - Stream listing and the subscription feed
//! - Stream comments

pub mod comments;
pub mod lifecycle;
pub mod listing;
pub mod streamers;

pub use comments::CommentService;
pub use lifecycle::{EndOutcome, StreamLifecycleService};
pub use listing::StreamListingService;
pub use streamers::{StreamerDirectory, Viewer};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{Stream, User};
use crate::repository::StreamStore;
use uuid::Uuid;

/// Ids arrive as strings from the transport. Anything that is not a UUID
/// cannot name a stored entity.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Uuid::parse_str(trimmed).ok()
}

pub(crate) async fn find_stream(store: &dyn StreamStore, stream_id: &str) -> ServiceResult<Stream> {
    let Some(id) = parse_id(stream_id) else {
        return Err(ServiceError::stream_not_found());
    };
    store
        .find_stream_by_id(id)
        .await?
        .ok_or_else(ServiceError::stream_not_found)
}

pub(crate) async fn find_user(store: &dyn StreamStore, user_id: &str) -> ServiceResult<User> {
    let Some(id) = parse_id(user_id) else {
        return Err(ServiceError::user_not_found());
    };
    store
        .find_user(id)
        .await?
        .ok_or_else(ServiceError::user_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id(&format!("  {id} ")), Some(id));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("   "), None);
        assert_eq!(parse_id("not-a-uuid"), None);
    }

    #[test]
    fn test_viewer_from_raw() {
        let id = Uuid::new_v4();
        assert_eq!(Viewer::from_raw(None), Viewer::Anonymous);
        assert_eq!(Viewer::from_raw(Some(&id.to_string())), Viewer::User(id));
        assert_eq!(Viewer::from_raw(Some("")), Viewer::Unknown);
    }
}
