use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::{ChatListResponse, HealthResponse};
use crate::routes::{authenticate, store_failure, AppState};

/// Configure health and chat list routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(list_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    // Only the optional ledger is checked here; the hosted backend is exercised per request
    let status = match state.deck.ledger() {
        Some(ledger) => match ledger.health_check().await {
            Ok(true) => "healthy",
            _ => "degraded",
        },
        None => "healthy",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Chat list for the current user
///
/// GET /api/v1/matches
async fn list_matches(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.deck.store().list_chats(&ctx.current_user_id).await {
        Ok(chats) => {
            tracing::debug!("Listed {} chats for {}", chats.len(), ctx.current_user_id);
            let count = chats.len();
            HttpResponse::Ok().json(ChatListResponse { chats, count })
        }
        Err(e) => store_failure("Failed to load chats", e),
    }
}
