/// Stream handlers - HTTP endpoints for stream lifecycle and listings
use super::{AppState, CallerId};
use crate::error::ServiceResult;
use crate::models::{NewStream, StreamFilters, StreamPatch};
use actix_web::{web, HttpResponse};

/// Create a stream owned by the caller
pub async fn create_stream(
    state: web::Data<AppState>,
    caller: CallerId,
    req: web::Json<NewStream>,
) -> ServiceResult<HttpResponse> {
    let stream = state
        .lifecycle
        .create_stream(&caller.0, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(stream))
}

/// List streams; `?state=all|live|done&sort=title|time&order=asc|desc`
pub async fn list_streams(
    state: web::Data<AppState>,
    caller: Option<CallerId>,
    filters: web::Query<StreamFilters>,
) -> ServiceResult<HttpResponse> {
    let viewer = caller.as_ref().map(|c| c.0.as_str());
    let streams = state
        .listing
        .get_list_of_streams(filters.into_inner(), viewer)
        .await?;
    Ok(HttpResponse::Ok().json(streams))
}

/// Streams from everyone the caller follows
pub async fn list_subscription_streams(
    state: web::Data<AppState>,
    caller: CallerId,
) -> ServiceResult<HttpResponse> {
    let streams = state
        .listing
        .get_streams_from_subscriptions(&caller.0)
        .await?;
    Ok(HttpResponse::Ok().json(streams))
}

pub async fn get_stream(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ServiceResult<HttpResponse> {
    let stream = state.lifecycle.get_stream_by_id(&path).await?;
    Ok(HttpResponse::Ok().json(stream))
}

pub async fn update_stream(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<StreamPatch>,
) -> ServiceResult<HttpResponse> {
    let stream = state
        .lifecycle
        .update_stream(&path, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(stream))
}

/// End a stream; only its owner may do so
pub async fn end_stream(
    state: web::Data<AppState>,
    caller: CallerId,
    path: web::Path<String>,
) -> ServiceResult<HttpResponse> {
    let outcome = state.lifecycle.end_stream(&caller.0, &path).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

pub async fn delete_stream(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ServiceResult<HttpResponse> {
    state.lifecycle.delete_stream(&path).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": true })))
}

/// Record that the caller is watching
pub async fn create_view(
    state: web::Data<AppState>,
    caller: CallerId,
    path: web::Path<String>,
) -> ServiceResult<HttpResponse> {
    let view = state.lifecycle.create_view(&caller.0, &path).await?;
    Ok(HttpResponse::Created().json(view))
}
