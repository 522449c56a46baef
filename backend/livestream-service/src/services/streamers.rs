//! Joins streams with their streamer's public profile
//!
//! Every DTO is assembled from two explicit lookups (stream, then owner),
//! with owners and subscription flags resolved once per batch.

use crate::error::ServiceResult;
use crate::models::{Stream, StreamDto, StreamerProfile};
use crate::repository::StreamStore;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Who the streams are being assembled for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// No viewer: `is_subscribed` is omitted
    Anonymous,
    /// Annotate each streamer with whether this user follows them
    User(Uuid),
    /// An id that cannot belong to any user; follows nobody
    Unknown,
    /// Every streamer in the batch is already known to be followed
    Subscriber,
}

impl Viewer {
    pub fn from_raw(viewer_id: Option<&str>) -> Self {
        match viewer_id {
            None => Viewer::Anonymous,
            Some(raw) => match super::parse_id(raw) {
                Some(id) => Viewer::User(id),
                None => Viewer::Unknown,
            },
        }
    }
}

pub struct StreamerDirectory<'a> {
    store: &'a dyn StreamStore,
    viewer: Viewer,
    profiles: HashMap<Uuid, StreamerProfile>,
}

impl<'a> StreamerDirectory<'a> {
    pub fn new(store: &'a dyn StreamStore, viewer: Viewer) -> Self {
        Self {
            store,
            viewer,
            profiles: HashMap::new(),
        }
    }

    async fn profile(&mut self, owner_id: Uuid) -> ServiceResult<StreamerProfile> {
        if let Some(profile) = self.profiles.get(&owner_id) {
            return Ok(profile.clone());
        }

        let mut profile = match self.store.find_user(owner_id).await? {
            Some(user) => StreamerProfile::from(&user),
            None => {
                warn!(%owner_id, "Stream owner missing from users table");
                StreamerProfile {
                    user_id: owner_id,
                    username: "unknown".to_string(),
                    alias: String::new(),
                    created_at: Default::default(),
                    is_subscribed: None,
                }
            }
        };

        profile.is_subscribed = match self.viewer {
            Viewer::Anonymous => None,
            Viewer::User(viewer_id) => {
                Some(self.store.find_subscription(viewer_id, owner_id).await?)
            }
            Viewer::Unknown => Some(false),
            Viewer::Subscriber => Some(true),
        };

        self.profiles.insert(owner_id, profile.clone());
        Ok(profile)
    }

    /// Live streams report their viewer total recomputed from view records;
    /// ended streams keep the total frozen when they ended.
    pub async fn assemble(&mut self, mut stream: Stream) -> ServiceResult<StreamDto> {
        let streamer = self.profile(stream.owner_id).await?;
        if stream.live {
            stream.total_viewers = self.store.count_views(stream.id).await?;
        }
        Ok(StreamDto::new(stream, streamer))
    }

    pub async fn assemble_all(&mut self, streams: Vec<Stream>) -> ServiceResult<Vec<StreamDto>> {
        let mut dtos = Vec::with_capacity(streams.len());
        for stream in streams {
            dtos.push(self.assemble(stream).await?);
        }
        Ok(dtos)
    }
}
