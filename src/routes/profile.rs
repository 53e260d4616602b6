use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

use crate::models::{AddGameRequest, GameListResponse, ProfileUpdate};
use crate::routes::{authenticate, bad_request, store_failure, validation_failed, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(get_profile))
        .route("/profile", web::patch().to(update_profile))
        .route("/profile/games", web::get().to(list_library))
        .route("/profile/games", web::post().to(add_game));
}

/// GET /api/v1/profile
async fn get_profile(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.deck.store().get_profile(&ctx.current_user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => store_failure("Failed to fetch profile", e),
    }
}

/// Partial update from the profile editor
///
/// PATCH /api/v1/profile
async fn update_profile(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ProfileUpdate>,
) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for profile update from {}: {:?}", ctx.current_user_id, errors);
        return validation_failed(errors);
    }

    if body.is_empty() {
        return bad_request("Validation failed", "no fields to update");
    }

    match state.deck.store().update_profile(&ctx.current_user_id, &body).await {
        Ok(profile) => {
            tracing::info!("Updated profile for {}", ctx.current_user_id);
            HttpResponse::Ok().json(profile)
        }
        Err(e) => store_failure("Failed to update profile", e),
    }
}

/// Games on the caller's profile
///
/// GET /api/v1/profile/games
async fn list_library(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    match state.deck.store().user_games(&ctx.current_user_id).await {
        Ok(games) => {
            let count = games.len();
            HttpResponse::Ok().json(GameListResponse { games, count })
        }
        Err(e) => store_failure("Failed to load game library", e),
    }
}

/// Add a catalog game to the caller's library
///
/// POST /api/v1/profile/games
///
/// Request body:
/// ```json
/// {
///   "gameId": "string"
/// }
/// ```
///
/// Responds with the updated library. New shared games only show up in the
/// deck after it is reloaded.
async fn add_game(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<AddGameRequest>,
) -> impl Responder {
    let ctx = match authenticate(&state, &req) {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    let store = state.deck.store();
    if let Err(e) = store.add_game(&ctx.current_user_id, &body.game_id).await {
        return store_failure("Failed to add game", e);
    }

    match store.user_games(&ctx.current_user_id).await {
        Ok(games) => {
            let count = games.len();
            HttpResponse::Created().json(GameListResponse { games, count })
        }
        Err(e) => store_failure("Failed to load game library", e),
    }
}
