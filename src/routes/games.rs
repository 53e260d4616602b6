use actix_web::{web, HttpRequest, HttpResponse, Responder};

use crate::models::GameListResponse;
use crate::routes::{authenticate, store_failure, AppState};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/games", web::get().to(list_games));
}

/// Game catalog, ordered by name
///
/// GET /api/v1/games
async fn list_games(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(response) = authenticate(&state, &req) {
        return response;
    }

    match state.deck.store().list_games().await {
        Ok(games) => {
            let count = games.len();
            HttpResponse::Ok().json(GameListResponse { games, count })
        }
        Err(e) => store_failure("Failed to load games", e),
    }
}
