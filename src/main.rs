use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use gamematch_deck::config::Settings;
use gamematch_deck::routes::{self, AppState};
use gamematch_deck::services::{DeckService, DecisionLedger, MatchWriter, ProfileStore, SupabaseClient, TokenVerifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn config_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting GameMatch deck service...");

    let settings = Settings::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        config_error(e)
    })?;

    let deck_config = settings.deck.to_deck_config().map_err(|e| {
        error!("Invalid deck settings: {}", e);
        config_error(e)
    })?;

    info!("Configuration loaded successfully");

    let supabase = SupabaseClient::new(
        settings.supabase.url.clone(),
        settings.supabase.api_key.clone(),
        settings.tables.to_tables(),
        Duration::from_secs(settings.supabase.request_timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to build Supabase client: {}", e);
        config_error(e)
    })?;
    let store: Arc<dyn ProfileStore> = Arc::new(supabase);

    info!("Supabase client initialized for {}", settings.supabase.url);

    // The ledger is optional; without it decks are filtered only by the backend
    let ledger = match &settings.database.url {
        Some(url) => {
            let max_conn = settings.database.max_connections.unwrap_or(10);
            match DecisionLedger::connect(
                url,
                max_conn,
                settings.database.min_connections.unwrap_or(1),
                Duration::from_secs(settings.database.acquire_timeout_secs.unwrap_or(30)),
                Duration::from_secs(settings.database.idle_timeout_secs.unwrap_or(600)),
            )
            .await
            {
                Ok(ledger) => {
                    info!("Decision ledger connected (max: {} connections)", max_conn);
                    Some(Arc::new(ledger))
                }
                Err(e) => {
                    warn!("Failed to connect decision ledger ({}), running without it", e);
                    None
                }
            }
        }
        None => {
            info!("No database configured, decision ledger disabled");
            None
        }
    };

    let writer = MatchWriter::new(store.clone(), settings.retry.to_policy());
    let deck = Arc::new(DeckService::new(
        store,
        ledger,
        writer,
        deck_config,
        settings.sessions.to_limits(),
    ));

    let app_state = AppState {
        deck,
        verifier: Arc::new(TokenVerifier::new(&settings.auth.jwt_secret, &settings.auth.audience)),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
