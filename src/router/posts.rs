//! Posts-related HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router};
use application::context::AuthenticatedUser;
use domain::content::Post;
use serde::{Deserialize, Serialize};

use super::{JsonBody, RequestContext};
use crate::{AppState, ServerError};

/// Client-editable fields of a post.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub title: String,
    pub code: String,
    pub language: String,
    pub content: String,
    pub source: String,
}

impl Body {
    fn into_post(self, id: i64) -> Post {
        Post {
            id,
            title: self.title,
            code: self.code,
            language: self.language,
            content: self.content,
            source: self.source,
            ..Default::default()
        }
    }
}

pub fn public() -> Router<AppState> {
    Router::new()
        .route("/post", get(list))
        .route("/post/{post_id}", get(get_post))
}

pub fn protected() -> Router<AppState> {
    Router::new()
        // `POST /post` goes to `create`. Authorization required.
        .route("/post", post(create))
        // `PUT` and `DELETE /post/:ID`. Authorization required.
        .route("/post/{post_id}", put(update).delete(delete))
}

async fn list(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<Post>>, ServerError> {
    Ok(Json(state.posts.list(&ctx).await?))
}

async fn get_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(post_id): Path<i64>,
) -> Result<Json<Post>, ServerError> {
    Ok(Json(state.posts.get(&ctx, post_id).await?))
}

async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    JsonBody(body): JsonBody<Body>,
) -> Result<(StatusCode, Json<Post>), ServerError> {
    let post = state.posts.create(&ctx, &actor, body.into_post(0)).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(post_id): Path<i64>,
    JsonBody(body): JsonBody<Body>,
) -> Result<Json<Post>, ServerError> {
    let post = body.into_post(post_id);
    Ok(Json(state.posts.update(&ctx, &actor, post).await?))
}

async fn delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(post_id): Path<i64>,
) -> Result<StatusCode, ServerError> {
    state.posts.delete(&ctx, &actor, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
