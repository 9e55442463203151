//! Users-related HTTP API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use application::context::AuthenticatedUser;
use domain::content::{Comment, Post};
use domain::identity::User;
use serde::{Deserialize, Serialize};

use super::{JsonBody, RequestContext};
use crate::{AppState, ServerError};

/// Editable profile fields. The id always comes from the bearer token.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Body {
    pub name: String,
    pub profile: String,
    pub twitter_handle: String,
}

impl From<Body> for User {
    fn from(body: Body) -> Self {
        User {
            name: body.name,
            profile: body.profile,
            twitter_handle: body.twitter_handle,
            ..Default::default()
        }
    }
}

pub fn public() -> Router<AppState> {
    Router::new()
        // `GET /user/:ID` goes to `get`.
        .route("/user/{user_id}", get(get_user))
        .route("/user/{user_id}/post", get(list_posts))
        .route("/user/{user_id}/comment", get(list_comments))
}

pub fn protected() -> Router<AppState> {
    // `POST`, `PUT` and `DELETE /user` act on the authenticated user.
    Router::new().route(
        "/user",
        get(me).post(create).put(update).delete(delete_user),
    )
}

async fn get_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<String>,
) -> Result<Json<User>, ServerError> {
    Ok(Json(state.users.get(&ctx, &user_id).await?))
}

async fn me(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<User>, ServerError> {
    Ok(Json(state.users.get(&ctx, actor.id()).await?))
}

async fn list_posts(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Post>>, ServerError> {
    Ok(Json(state.users.posts(&ctx, &user_id).await?))
}

async fn list_comments(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ServerError> {
    Ok(Json(state.users.comments(&ctx, &user_id).await?))
}

async fn create(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    JsonBody(body): JsonBody<Body>,
) -> Result<(StatusCode, Json<User>), ServerError> {
    let user = state.users.create(&ctx, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
    JsonBody(body): JsonBody<Body>,
) -> Result<Json<User>, ServerError> {
    Ok(Json(state.users.update(&ctx, &actor, body.into()).await?))
}

async fn delete_user(
    State(state): State<AppState>,
    ctx: RequestContext,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<StatusCode, ServerError> {
    state.users.delete(&ctx, &actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use http_body_util::BodyExt;
    use serde_json::json;

    use super::*;
    use crate::testing::{TOKEN, state};
    use crate::{app, make_request};

    #[tokio::test]
    async fn test_create_requires_token() {
        let (state, _) = state();
        let response = make_request(
            None,
            app(state),
            Method::POST,
            "/api/v1/user",
            json!({ "name": "saboten" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_uses_token_subject() {
        let (state, _) = state();
        let response = make_request(
            Some(TOKEN),
            app(state),
            Method::POST,
            "/api/v1/user",
            json!({ "id": "someone-else", "name": "saboten", "twitter_handle": "@saboten" })
                .to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let user: User = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.name, "saboten");
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let (state, _) = state();
        let response = make_request(
            None,
            app(state),
            Method::GET,
            "/api/v1/user/ghost",
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (state, calls) = state();
        let response = make_request(
            Some(TOKEN),
            app(state),
            Method::DELETE,
            "/api/v1/user",
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(calls.take(), vec!["users.delete:user-1".to_owned()]);
    }
}
