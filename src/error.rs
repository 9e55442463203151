//! Error handler for snipshare.

use application::error::ApplicationError;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use domain::error::DomainError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error("invalid 'Authorization' header")]
    Unauthorized,
}

impl From<DomainError> for ServerError {
    fn from(err: DomainError) -> Self {
        ServerError::Application(err.into())
    }
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Report the field that failed validation.
    pub fn field(mut self, field: &str, message: &str) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(
        self,
    ) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn domain_response(err: &DomainError) -> ResponseError {
    let response = ResponseError::default().details(&err.to_string());

    match err {
        DomainError::CannotCommit => response
            .title("Only the owner of the post can commit code to it.")
            .status(StatusCode::FORBIDDEN),
        DomainError::NotAuthorized(_) => response
            .title("You are not the owner of this resource.")
            .status(StatusCode::FORBIDDEN),
        err => {
            let response = response
                .title("There were validation errors with your request.")
                .status(StatusCode::BAD_REQUEST);
            match err.field() {
                Some(field) => response.field(field, &err.to_string()),
                None => response,
            }
        },
    }
}

fn application_response(err: &ApplicationError) -> ResponseError {
    let response = ResponseError::default().details(&err.to_string());

    match err {
        ApplicationError::Domain(err) => domain_response(err),
        ApplicationError::NotFound(_) => response
            .title("Resource not found.")
            .status(StatusCode::NOT_FOUND),
        ApplicationError::Duplicate { .. } => response
            .title("Resource already exists.")
            .status(StatusCode::CONFLICT),
        ApplicationError::Unauthorized => response
            .title("Missing or invalid 'Authorization' header.")
            .status(StatusCode::UNAUTHORIZED),
        ApplicationError::Cancelled => response
            .title("Request cancelled before completion.")
            .status(StatusCode::REQUEST_TIMEOUT),
        ApplicationError::PartialFailure { source, .. } => {
            tracing::error!(error = %source, "partial failure returned 502 status");
            response
                .title("Operation only partially completed.")
                .status(StatusCode::BAD_GATEWAY)
        },
        ApplicationError::StoreUnavailable(source) => {
            tracing::error!(error = %source, "server returned 503 status");
            ResponseError::default()
                .title("Service temporarily unavailable.")
                .status(StatusCode::SERVICE_UNAVAILABLE)
        },
        ApplicationError::CommitFailed(source)
        | ApplicationError::Internal(source) => {
            tracing::error!(error = %source, "server returned 500 status");
            ResponseError::default()
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = match &self {
            ServerError::Application(err) => application_response(err),

            ServerError::Axum(rejection) => ResponseError::default()
                .title("Server error during data parsing.")
                .details(&rejection.body_text())
                .status(rejection.status()),

            ServerError::Unauthorized => ResponseError::default()
                .title("Missing or invalid 'Authorization' header.")
                .details(&self.to_string())
                .status(StatusCode::UNAUTHORIZED),
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}
