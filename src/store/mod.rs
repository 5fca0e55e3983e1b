//! Currency store
//!
//! Read and write access to the currency registry. The intake machine and
//! the report commands depend on the [`CurrencyStore`] trait; the Postgres
//! implementation lives in [`postgres`].

pub mod postgres;

use async_trait::async_trait;

use crate::domain::{BalanceLine, CurrencyDefinition, NewCurrency};

pub use postgres::PgCurrencyStore;

/// Store-level errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unique-index backstop fired on insert: another writer registered a
    /// colliding name or short form after our duplicate check.
    #[error("currency already registered: {0}")]
    Duplicate(String),
}

/// Queries and the single write command the service issues.
#[async_trait]
pub trait CurrencyStore: Send + Sync {
    /// Capacity check: how many currencies the guild already has.
    async fn count_for_guild(&self, guild_id: i64) -> Result<i64, StoreError>;

    /// Case-insensitive duplicate check against existing names.
    async fn name_exists(&self, guild_id: i64, name: &str) -> Result<bool, StoreError>;

    /// Case-insensitive duplicate check against existing short forms.
    async fn short_form_exists(&self, guild_id: i64, short_form: &str)
        -> Result<bool, StoreError>;

    /// The sole mutation: persist a fully-validated currency atomically.
    async fn insert(&self, new: &NewCurrency) -> Result<(), StoreError>;

    /// All currencies for a guild, ordered case-insensitively by name.
    async fn list_for_guild(&self, guild_id: i64) -> Result<Vec<CurrencyDefinition>, StoreError>;

    /// Every guild currency left-joined with the user's balance row.
    async fn balances_for_user(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Vec<BalanceLine>, StoreError>;
}
