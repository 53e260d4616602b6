use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{DecideRequest, GesturePhase, GestureRequest, LoadDeckRequest, SwipeDirection};
use crate::routes::{authenticate, bad_request, validation_failed, AppState};

/// Configure deck routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/deck", web::post().to(load_deck))
        .route("/deck", web::get().to(get_deck))
        .route("/deck/gesture", web::post().to(gesture))
        .route("/deck/decide", web::post().to(decide));
}

/// Load a fresh deck
///
/// POST /api/v1/deck
///
/// Request body (optional):
/// ```json
/// {
///   "excludeUserIds": ["string"]
/// }
/// ```
async fn load_deck(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<LoadDeckRequest>>,
) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let body = body.map(web::Json::into_inner).unwrap_or_default();
    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for load_deck request: {:?}", errors);
        return validation_failed(errors);
    }

    let deck = state.deck.load(&ctx.current_user_id, &body.exclude_user_ids).await;
    HttpResponse::Ok().json(deck)
}

/// Current deck with any pending notices
///
/// GET /api/v1/deck
async fn get_deck(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    HttpResponse::Ok().json(state.deck.view(&ctx.current_user_id).await)
}

/// Pointer event on the top card
///
/// POST /api/v1/deck/gesture
///
/// Request body:
/// ```json
/// {
///   "phase": "start" | "move" | "end",
///   "translationX": 0.0,
///   "translationY": 0.0
/// }
/// ```
///
/// `end` may omit the translations to release where the last move left the card.
async fn gesture(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<GestureRequest>,
) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let translation = body.translation();
    if let Some((x, y)) = translation {
        if !x.is_finite() || !y.is_finite() {
            return bad_request("Validation failed", "translations must be finite numbers");
        }
    }
    if body.phase == GesturePhase::Move && translation.is_none() {
        return bad_request("Validation failed", "move events need translationX");
    }

    let deck = state
        .deck
        .gesture(&ctx.current_user_id, body.phase, translation)
        .await;
    HttpResponse::Ok().json(deck)
}

/// Like or pass button
///
/// POST /api/v1/deck/decide
///
/// Request body:
/// ```json
/// {
///   "direction": "like" | "pass"
/// }
/// ```
async fn decide(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<DecideRequest>,
) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    let direction: SwipeDirection = match body.direction.parse() {
        Ok(direction) => direction,
        Err(message) => return bad_request("Invalid direction", message),
    };

    HttpResponse::Ok().json(state.deck.decide(&ctx.current_user_id, direction).await)
}
