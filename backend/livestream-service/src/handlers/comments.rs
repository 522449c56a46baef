/// Comment handlers - HTTP endpoints for stream comments
use super::{AppState, CallerId};
use crate::error::ServiceResult;
use crate::models::NewComment;
use actix_web::{web, HttpResponse};

pub async fn create_comment(
    state: web::Data<AppState>,
    caller: CallerId,
    path: web::Path<String>,
    req: web::Json<NewComment>,
) -> ServiceResult<HttpResponse> {
    let comment = state
        .comments
        .create_comment(&caller.0, &path, req.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Comments on a stream, oldest first
pub async fn list_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> ServiceResult<HttpResponse> {
    let comments = state
        .comments
        .get_list_of_comments_for_stream(&path)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}
