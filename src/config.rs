use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::DeckConfig;
use crate::services::{RetryPolicy, SessionLimits, SupabaseTables};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub tables: TableSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub deck: DeckSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct TableSettings {
    #[serde(default = "default_users_table")]
    pub users: String,
    #[serde(default = "default_games_table")]
    pub games: String,
    #[serde(default = "default_user_games_table")]
    pub user_games: String,
    #[serde(default = "default_matches_table")]
    pub matches: String,
    #[serde(default = "default_messages_table")]
    pub messages: String,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            users: default_users_table(),
            games: default_games_table(),
            user_games: default_user_games_table(),
            matches: default_matches_table(),
            messages: default_messages_table(),
        }
    }
}

fn default_users_table() -> String { "users".to_string() }
fn default_games_table() -> String { "games".to_string() }
fn default_user_games_table() -> String { "user_games".to_string() }
fn default_matches_table() -> String { "matches".to_string() }
fn default_messages_table() -> String { "messages".to_string() }

impl TableSettings {
    pub fn to_tables(&self) -> SupabaseTables {
        SupabaseTables {
            users: self.users.clone(),
            games: self.games.clone(),
            user_games: self.user_games.clone(),
            matches: self.matches.clone(),
            messages: self.messages.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_audience")]
    pub audience: String,
}

fn default_audience() -> String { "authenticated".to_string() }

/// Decision ledger database; the ledger is disabled when `url` is unset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeckSettings {
    #[serde(default = "default_screen_width")]
    pub screen_width: f64,
    #[serde(default = "default_threshold_fraction")]
    pub threshold_fraction: f64,
    #[serde(default = "default_max_rotation_deg")]
    pub max_rotation_deg: f64,
    #[serde(default = "default_vertical_damping")]
    pub vertical_damping: f64,
    #[serde(default = "default_max_vertical_offset")]
    pub max_vertical_offset: f64,
    #[serde(default = "default_preview_base_scale")]
    pub preview_base_scale: f64,
    #[serde(default = "default_lift_scale")]
    pub lift_scale: f64,
    #[serde(default = "default_exit_scale")]
    pub exit_scale: f64,
    #[serde(default = "default_exit_duration_ms")]
    pub exit_duration_ms: u64,
    #[serde(default = "default_spring_settle_ms")]
    pub spring_settle_ms: u64,
    #[serde(default = "default_auto_commit")]
    pub auto_commit: bool,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            screen_width: default_screen_width(),
            threshold_fraction: default_threshold_fraction(),
            max_rotation_deg: default_max_rotation_deg(),
            vertical_damping: default_vertical_damping(),
            max_vertical_offset: default_max_vertical_offset(),
            preview_base_scale: default_preview_base_scale(),
            lift_scale: default_lift_scale(),
            exit_scale: default_exit_scale(),
            exit_duration_ms: default_exit_duration_ms(),
            spring_settle_ms: default_spring_settle_ms(),
            auto_commit: default_auto_commit(),
        }
    }
}

fn default_screen_width() -> f64 { 390.0 }
fn default_threshold_fraction() -> f64 { 0.4 }
fn default_max_rotation_deg() -> f64 { 15.0 }
fn default_vertical_damping() -> f64 { 3.0 }
fn default_max_vertical_offset() -> f64 { 100.0 }
fn default_preview_base_scale() -> f64 { 0.9 }
fn default_lift_scale() -> f64 { 1.05 }
fn default_exit_scale() -> f64 { 0.8 }
fn default_exit_duration_ms() -> u64 { 200 }
fn default_spring_settle_ms() -> u64 { 300 }
fn default_auto_commit() -> bool { true }

impl DeckSettings {
    /// Validate and convert into the controller's tunables
    pub fn to_deck_config(&self) -> Result<DeckConfig, ConfigError> {
        if !(self.screen_width > 0.0) {
            return Err(ConfigError::Message("deck.screen_width must be positive".into()));
        }
        if !(self.threshold_fraction > 0.0 && self.threshold_fraction <= 1.0) {
            return Err(ConfigError::Message("deck.threshold_fraction must be in (0, 1]".into()));
        }
        if !(self.vertical_damping > 0.0) || self.max_vertical_offset < 0.0 {
            return Err(ConfigError::Message(
                "deck.vertical_damping must be positive and deck.max_vertical_offset non-negative".into(),
            ));
        }

        Ok(DeckConfig {
            screen_width: self.screen_width,
            threshold_fraction: self.threshold_fraction,
            max_rotation_deg: self.max_rotation_deg,
            vertical_damping: self.vertical_damping,
            max_vertical_offset: self.max_vertical_offset,
            preview_base_scale: self.preview_base_scale,
            lift_scale: self.lift_scale,
            exit_scale: self.exit_scale,
            exit_duration: Duration::from_millis(self.exit_duration_ms),
            spring_settle: Duration::from_millis(self.spring_settle_ms),
            auto_commit: self.auto_commit,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

fn default_max_sessions() -> u64 { 10_000 }
fn default_idle_ttl_secs() -> u64 { 1800 }

impl SessionSettings {
    pub fn to_limits(&self) -> SessionLimits {
        SessionLimits {
            max_sessions: self.max_sessions,
            idle_ttl: Duration::from_secs(self.idle_ttl_secs),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 { 4 }
fn default_base_delay_ms() -> u64 { 250 }
fn default_max_delay_ms() -> u64 { 4000 }

impl RetrySettings {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with GAMEMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., GAMEMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("GAMEMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_well_known_env(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("GAMEMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Honour the variable names the mobile client and Supabase tooling use
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Ok(key) = env::var("SUPABASE_SERVICE_ROLE_KEY") {
        builder = builder.set_override("supabase.api_key", key)?;
    }
    if let Ok(secret) = env::var("SUPABASE_JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }
    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }

    builder.build()
}
