//! Comments-related HTTP API, nested under posts.

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use application::context::AuthenticatedUser;
use domain::content::{Comment, CommentKind};
use serde::{Deserialize, Serialize};

use super::{JsonBody, RequestContext};
use crate::{AppState, ServerError};

/// Client-editable fields of a comment.
///
/// `type` stays a plain string so an unknown tag is reported as a
/// validation error rather than a parsing one.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub r#type: String,
    pub content: String,
    pub first_line: i32,
    pub last_line: i32,
    pub code: String,
}

impl Body {
    fn into_comment(
        self,
        post_id: i64,
        comment_id: i64,
    ) -> Result<Comment, ServerError> {
        let kind = CommentKind::from_str(&self.r#type)?;
        Ok(Comment {
            id: comment_id,
            content: self.content,
            first_line: self.first_line,
            last_line: self.last_line,
            code: self.code,
            ..Comment::new(kind, post_id)
        })
    }
}

pub fn public() -> Router<AppState> {
    Router::new()
        .route("/post/{post_id}/comment", get(list))
        .route("/post/{post_id}/comment/{comment_id}", get(get_comment))
}

pub fn protected() -> Router<AppState> {
    Router::new()
        // `POST /post/:ID/comment` goes to `create`. Authorization required.
        .route("/post/{post_id}/comment", post(create))
        .route(
            "/post/{post_id}/comment/{comment_id}",
            put(update).delete(delete),
        )
}

async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ServerError> {
    Ok(Json(state.comments.list_by_post(&ctx, post_id).await?))
}

async fn get_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Json<Comment>, ServerError> {
    Ok(Json(state.comments.get(&ctx, post_id, comment_id).await?))
}

async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(post_id): Path<i64>,
    JsonBody(body): JsonBody<Body>,
) -> Result<(StatusCode, Json<Comment>), ServerError> {
    let comment = body.into_comment(post_id, 0)?;
    let comment = state.comments.create(&ctx, &actor, comment).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    JsonBody(body): JsonBody<Body>,
) -> Result<Json<Comment>, ServerError> {
    let comment = body.into_comment(post_id, comment_id)?;
    Ok(Json(state.comments.update(&ctx, &actor, comment).await?))
}

async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ServerError> {
    state
        .comments
        .delete(&ctx, &actor, post_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
