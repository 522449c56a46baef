//! HTTP handlers for Livestream Service
//!
//! Thin transport over the service layer: one route per operation. The
//! caller's identity arrives in the `x-user-id` header set by the gateway.

pub mod comments;
pub mod streams;

use crate::error::ServiceError;
use crate::repository::StreamStore;
use crate::services::{CommentService, StreamLifecycleService, StreamListingService};
use actix_web::{error::ErrorUnauthorized, web, Error, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};
use std::sync::Arc;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StreamStore>,
    pub lifecycle: StreamLifecycleService,
    pub listing: StreamListingService,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(store: Arc<dyn StreamStore>) -> Self {
        Self {
            lifecycle: StreamLifecycleService::new(store.clone()),
            listing: StreamListingService::new(store.clone()),
            comments: CommentService::new(store.clone()),
            store,
        }
    }
}

/// Raw caller id from the `x-user-id` header.
///
/// Kept as a string: the service layer decides what an unknown or malformed
/// id means for each operation. Use `Option<CallerId>` where the caller is
/// optional.
#[derive(Debug, Clone)]
pub struct CallerId(pub String);

impl FromRequest for CallerId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            req.headers()
                .get(USER_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(|value| CallerId(value.to_string()))
                .ok_or_else(|| ErrorUnauthorized("User ID missing")),
        )
    }
}

async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    match state.store.health_check().await {
        Ok(()) => HttpResponse::Ok().body("OK"),
        Err(err) => {
            tracing::warn!(error = %err, "Health check failed");
            HttpResponse::ServiceUnavailable().body("UNAVAILABLE")
        }
    }
}

/// Malformed bodies and query strings are reported in the same shape as
/// validation errors
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::invalid_field("body", err.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        ServiceError::invalid_field("query", err.to_string()).into()
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/metrics", web::get().to(crate::metrics::serve_metrics));

    cfg.service(
        web::scope("/api/v1/streams")
            .app_data(json_config())
            .app_data(query_config())
            .route("", web::post().to(streams::create_stream))
            .route("", web::get().to(streams::list_streams))
            // registered before /{id} so it is not captured as an id
            .route("/subscriptions", web::get().to(streams::list_subscription_streams))
            .route("/{id}", web::get().to(streams::get_stream))
            .route("/{id}", web::patch().to(streams::update_stream))
            .route("/{id}", web::delete().to(streams::delete_stream))
            .route("/{id}/end", web::post().to(streams::end_stream))
            .route("/{id}/views", web::post().to(streams::create_view))
            .route("/{id}/comments", web::post().to(comments::create_comment))
            .route("/{id}/comments", web::get().to(comments::list_comments)),
    );
}
