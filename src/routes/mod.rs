// Route exports
pub mod deck;
pub mod games;
pub mod matches;
pub mod profile;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::models::ErrorResponse;
use crate::services::{AuthError, DeckService, SessionContext, StoreError, TokenVerifier};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub deck: Arc<DeckService>,
    pub verifier: Arc<TokenVerifier>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(deck::configure)
            .configure(games::configure)
            .configure(profile::configure),
    );
}

/// Resolve the caller from the `Authorization` header
pub(crate) fn authenticate(state: &AppState, req: &HttpRequest) -> Result<SessionContext, HttpResponse> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    state.verifier.verify_header(header).map_err(|e| {
        tracing::info!("Rejected request to {}: {}", req.path(), e);
        let message = match e {
            AuthError::MissingToken => "Sign in to continue".to_string(),
            other => other.to_string(),
        };
        HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Unauthorized".to_string(),
            message,
            status_code: 401,
        })
    })
}

pub(crate) fn bad_request(error: &str, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: 400,
    })
}

pub(crate) fn validation_failed(errors: validator::ValidationErrors) -> HttpResponse {
    bad_request("Validation failed", errors.to_string())
}

/// Map a backend failure onto the HTTP status the client sees
pub(crate) fn store_failure(context: &str, err: StoreError) -> HttpResponse {
    let (mut builder, status_code) = match &err {
        StoreError::NotFound(_) => (HttpResponse::NotFound(), 404),
        StoreError::Rejected(_) => (HttpResponse::BadRequest(), 400),
        // The service key was refused upstream; the caller can't fix that
        StoreError::Unauthorized
        | StoreError::RequestError(_)
        | StoreError::ApiError(_)
        | StoreError::InvalidResponse(_) => (HttpResponse::BadGateway(), 502),
    };

    if status_code >= 500 {
        tracing::error!("{}: {}", context, err);
    } else {
        tracing::info!("{}: {}", context, err);
    }

    builder.json(ErrorResponse {
        error: context.to_string(),
        message: err.to_string(),
        status_code,
    })
}
