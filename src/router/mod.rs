//! HTTP API under `/api/v1`.

pub mod comments;
pub mod posts;
pub mod status;
pub mod users;

use std::convert::Infallible;
use std::ops::Deref;

use application::context::Context;
use axum::extract::{FromRequest, FromRequestParts, Request, State};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::Response;
use axum::{Router, middleware};
use tokio::time::Instant;
use tokio_util::sync::DropGuard;

use crate::{AppState, REQUEST_TIMEOUT, ServerError};

const BEARER: &str = "Bearer";

/// JSON body whose rejection is reported as a [`ServerError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct JsonBody<T>(pub T);

/// Per-request [`Context`].
///
/// Cancelled as soon as the handler future is dropped, which happens when
/// the client goes away or the request times out.
pub struct RequestContext {
    ctx: Context,
    _guard: DropGuard,
}

impl RequestContext {
    pub fn new() -> Self {
        let ctx = Context::new().with_deadline(Instant::now() + REQUEST_TIMEOUT);
        let _guard = ctx.token().clone().drop_guard();
        Self { ctx, _guard }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for RequestContext {
    type Target = Context;

    fn deref(&self) -> &Context {
        &self.ctx
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::new())
    }
}

/// Extract the credentials of a `Bearer` authorization header. The scheme
/// is case-insensitive (RFC 7235).
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim_start().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case(BEARER) && !token.is_empty()).then_some(token)
}

/// Custom middleware for authentification.
///
/// Resolves the bearer token into an
/// [`AuthenticatedUser`](application::context::AuthenticatedUser) stored in
/// the request extensions.
async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: middleware::Next,
) -> Result<Response, ServerError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned)
        .ok_or(ServerError::Unauthorized)?;

    let ctx = RequestContext::new();
    let user = state.auth.authenticate(&ctx, &token).await?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .merge(users::public())
        .merge(posts::public())
        .merge(comments::public());

    let protected = Router::new()
        .merge(users::protected())
        .merge(posts::protected())
        .merge(comments::protected())
        .route_layer(middleware::from_fn_with_state(state, auth));

    public.merge(protected)
}
