use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::SwipeDirection;

/// Errors that can occur when interacting with the decision ledger
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Direction as stored in the `swipe_direction` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "swipe_direction", rename_all = "lowercase")]
pub enum LedgerDirection {
    Like,
    Pass,
}

impl From<SwipeDirection> for LedgerDirection {
    fn from(value: SwipeDirection) -> Self {
        match value {
            SwipeDirection::Like => LedgerDirection::Like,
            SwipeDirection::Pass => LedgerDirection::Pass,
        }
    }
}

/// Postgres record of every like/pass
///
/// Lets a reloaded deck skip candidates the user already decided on.
pub struct DecisionLedger {
    pool: PgPool,
}

impl DecisionLedger {
    /// Connect and run migrations
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Record a decision, overwriting any earlier one for the same pair
    pub async fn record_decision(
        &self,
        user_id: &str,
        candidate_id: &str,
        direction: SwipeDirection,
    ) -> Result<(), LedgerError> {
        let query = r#"
            INSERT INTO swipe_decisions (user_id, candidate_id, direction, decided_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id, candidate_id)
            DO UPDATE SET
                direction = EXCLUDED.direction,
                decided_at = EXCLUDED.decided_at
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(candidate_id)
            .bind(LedgerDirection::from(direction))
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded decision: {} -> {} ({})", user_id, candidate_id, direction.as_str());

        Ok(())
    }

    /// Candidate ids the user already decided on
    pub async fn decided_ids(&self, user_id: &str) -> Result<Vec<String>, LedgerError> {
        let rows = sqlx::query("SELECT candidate_id FROM swipe_decisions WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("candidate_id")).collect())
    }

    pub async fn health_check(&self) -> Result<bool, LedgerError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
