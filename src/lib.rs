//! snipshare is a small API to publish code snippets and review them with
//! notes, highlights and commits.

#[forbid(unsafe_code)]
#[deny(missing_docs, unused_mut)]
mod database;
pub mod error;
mod router;
pub mod telemetry;
#[cfg(test)]
mod testing;

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use adapters::outbound::identity::{
    HttpIdentityGateway, IdentityConfig, ServiceAccountKey,
};
use adapters::outbound::persistence::postgres::{
    PgCommentRepository, PgPostRepository, PgTransactionCoordinator,
    PgUserRepository,
};
use adapters::outbound::telemetry::TracingTelemetry;
use application::ports::inbound::{
    Authenticate, ManageComments, ManagePosts, ManageUsers,
};
use application::usecases::{
    AuthUseCase, CommentUseCase, PostUseCase, UserUseCase,
};
use axum::body::Bytes;
use axum::http::{Method, StatusCode, header};
use axum::routing::get;
use axum::{Router, middleware as AxumMiddleware};
use error::ServerError;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};

/// Time allowed to a request before it is cancelled.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    token: Option<&str>,
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request =
            request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    app.oneshot(request.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub auth: Arc<dyn Authenticate>,
    pub users: Arc<dyn ManageUsers>,
    pub posts: Arc<dyn ManagePosts>,
    pub comments: Arc<dyn ManageComments>,
    pub metrics: Option<PrometheusHandle>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMEOUT))
        // Remove senstive headers from trace.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `GET /metrics` goes to Prometheus exporter.
        .route("/metrics", get(telemetry::metrics))
        .nest("/api/v1", router::router(state.clone()))
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Initialize the application state.
pub async fn initialize_state(
    config: Arc<config::Configuration>,
    metrics: Option<PrometheusHandle>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let Some(postgres) = &config.postgres else {
        return Err("missing `postgres` entry on `config.yaml` file".into());
    };
    let db = database::Database::new(postgres).await?;

    // execute migrations scripts on start.
    db.migrate().await?;

    let identity = HttpIdentityGateway::new(
        IdentityConfig {
            endpoint: url::Url::parse(&config.identity.endpoint)?,
            project_id: config.identity.project_id.clone(),
            api_key: config.identity.api_key.clone(),
            credentials: ServiceAccountKey::from_file(
                &config.identity.credentials_file,
            )?,
        },
        REQUEST_TIMEOUT,
    )?;
    let pool = &db.postgres;

    let auth = AuthUseCase::new(
        Box::new(identity.clone()),
        Box::new(TracingTelemetry::new()),
    );
    let users = UserUseCase::new(
        Box::new(PgUserRepository::new(pool.clone())),
        Box::new(PgPostRepository::new(pool.clone())),
        Box::new(PgCommentRepository::new(pool.clone())),
        Box::new(identity),
        Box::new(PgTransactionCoordinator::new(pool.clone())),
        Box::new(TracingTelemetry::new()),
    );
    let posts = PostUseCase::new(
        Box::new(PgPostRepository::new(pool.clone())),
        Box::new(TracingTelemetry::new()),
    );
    let comments = CommentUseCase::new(
        Box::new(PgCommentRepository::new(pool.clone())),
        Box::new(PgPostRepository::new(pool.clone())),
        Box::new(TracingTelemetry::new()),
    );

    Ok(AppState {
        config,
        auth: Arc::new(auth),
        users: Arc::new(users),
        posts: Arc::new(posts),
        comments: Arc::new(comments),
        metrics,
    })
}
