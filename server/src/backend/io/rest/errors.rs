//! # API Errors
//!
//! Single translation point from failures to HTTP responses. Client errors
//! carry their message and a stable `code`; server errors are logged once
//! here and answered with an opaque message. Decode faults and panics share
//! one response that also closes the connection.

use std::any::Any;

use axum::http::header::CONNECTION;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use super::json_egress::{write_json, EncodeError, Envelope};
use super::json_ingress::{DecodeError, DecodeFault, IngressError};
use super::params::InvalidIdentifier;
use crate::backend::domain::{MovieServiceError, ValidationErrors};

const SERVER_ERROR_MESSAGE: &str =
    "the server encountered a problem and could not process your request";
const NOT_FOUND_MESSAGE: &str = "the requested resource could not be found";
const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    BadRequest(#[from] DecodeError),
    #[error("failed validation")]
    FailedValidation(ValidationErrors),
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,
    #[error("the {0} method is not supported for this resource")]
    MethodNotAllowed(Method),
    #[error("{}", EDIT_CONFLICT_MESSAGE)]
    EditConflict,
    #[error("server error: {0:#}")]
    Server(anyhow::Error),
    #[error(transparent)]
    Fault(#[from] DecodeFault),
}

impl From<IngressError> for ApiError {
    fn from(err: IngressError) -> Self {
        match err {
            IngressError::Client(err) => Self::BadRequest(err),
            IngressError::Fault(fault) => Self::Fault(fault),
        }
    }
}

impl From<MovieServiceError> for ApiError {
    fn from(err: MovieServiceError) -> Self {
        match err {
            MovieServiceError::Validation(errors) => Self::FailedValidation(errors),
            MovieServiceError::NotFound => Self::NotFound,
            MovieServiceError::EditConflict => Self::EditConflict,
            MovieServiceError::Storage(err) => Self::Server(err.into()),
        }
    }
}

impl From<EncodeError> for ApiError {
    fn from(err: EncodeError) -> Self {
        Self::Server(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(DecodeError::BodyTooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::FailedValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidIdentifier(_) | ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::EditConflict => StatusCode::CONFLICT,
            ApiError::Server(_) | ApiError::Fault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(err) => err.code(),
            ApiError::FailedValidation(_) => "failed_validation",
            ApiError::InvalidIdentifier(_) => "invalid_identifier",
            ApiError::NotFound => "not_found",
            ApiError::MethodNotAllowed(_) => "method_not_allowed",
            ApiError::EditConflict => "edit_conflict",
            ApiError::Server(_) | ApiError::Fault(_) => "server_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        match self {
            ApiError::Server(err) => {
                error!(error = ?err, "server error");
                error_response(status, SERVER_ERROR_MESSAGE, code, HeaderMap::new())
            }
            ApiError::Fault(fault) => {
                warn!(error = %fault, "request aborted by decode fault");
                fault_response()
            }
            ApiError::FailedValidation(errors) => {
                error_response(status, &errors, code, HeaderMap::new())
            }
            other => error_response(status, &other.to_string(), code, HeaderMap::new()),
        }
    }
}

/// Envelope `{"error": message, "code": code}`; falls back to a bare 500
/// when the envelope itself cannot be rendered
fn error_response<M: Serialize + ?Sized>(
    status: StatusCode,
    message: &M,
    code: &str,
    headers: HeaderMap,
) -> Response {
    let envelope = Envelope::new().with("error", message).with("code", code);
    match write_json(status, envelope, headers) {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "failed to write error response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// 500 that also tells the server to drop the connection afterwards
fn fault_response() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("close"));
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        SERVER_ERROR_MESSAGE,
        "server_error",
        headers,
    )
}

/// Panic handler for `CatchPanicLayer`
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else {
        "unknown panic payload"
    };

    error!(panic = %detail, "request handler panicked");
    fault_response()
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::Validator;
    use crate::backend::io::rest::field_table::{FieldKind, FieldSpec, FieldTable};
    use crate::backend::io::rest::json_ingress::{JsonIngress, Location};
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_decode_error_response() {
        let response = ApiError::from(DecodeError::TypeMismatch(Location::Field(
            "year".to_string(),
        )))
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "body contains incorrect JSON type for field \"year\"",
                "code": "type_mismatch"
            })
        );
    }

    #[tokio::test]
    async fn test_body_too_large_status() {
        let response =
            ApiError::from(DecodeError::BodyTooLarge { limit: 10 }).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_validation_response_lists_fields() {
        let mut v = Validator::new();
        v.add_error("genres", "must be provided");

        let response = ApiError::FailedValidation(v.into_errors()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": {"genres": "must be provided"},
                "code": "failed_validation"
            })
        );
    }

    #[tokio::test]
    async fn test_server_error_hides_detail() {
        let response =
            ApiError::Server(anyhow::anyhow!("disk on fire at /var/lib/movies.db")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], SERVER_ERROR_MESSAGE);
        assert!(!body.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_fault_closes_connection() {
        #[derive(Debug, serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Empty {}

        impl FieldTable for Empty {
            const FIELDS: &'static [FieldSpec] = &[FieldSpec::new("ghost", FieldKind::String)];
        }

        let err = JsonIngress::default()
            .decode::<Empty>(r#"{"ghost":"boo"}"#.as_bytes())
            .unwrap_err();
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONNECTION], "close");
        assert_eq!(body_json(response).await["code"], "server_error");
    }

    #[tokio::test]
    async fn test_panic_handler_closes_connection() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONNECTION], "close");
        assert_eq!(body_json(response).await["error"], SERVER_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_method_not_allowed_message() {
        let response = method_not_allowed(Method::DELETE).await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await["error"],
            "the DELETE method is not supported for this resource"
        );
    }
}
