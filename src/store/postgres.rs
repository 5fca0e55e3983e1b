//! Postgres store
//!
//! sqlx-backed implementation of [`CurrencyStore`] over the
//! `guild_currencies` and `user_money` tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{BalanceLine, CurrencyDefinition, NewCurrency};

use super::{CurrencyStore, StoreError};

/// Postgres-backed currency store
#[derive(Debug, Clone)]
pub struct PgCurrencyStore {
    pool: PgPool,
}

impl PgCurrencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CurrencyStore for PgCurrencyStore {
    async fn count_for_guild(&self, guild_id: i64) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM guild_currencies WHERE guild_id = $1",
        )
        .bind(guild_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn name_exists(&self, guild_id: i64, name: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM guild_currencies
                WHERE guild_id = $1 AND LOWER(currency_name) = LOWER($2)
            )
            "#,
        )
        .bind(guild_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn short_form_exists(
        &self,
        guild_id: i64,
        short_form: &str,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM guild_currencies
                WHERE guild_id = $1 AND LOWER(short_form) = LOWER($2)
            )
            "#,
        )
        .bind(guild_id)
        .bind(short_form)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn insert(&self, new: &NewCurrency) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO guild_currencies (guild_id, currency_name, short_form, max_debt)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(new.guild_id)
        .bind(&new.name)
        .bind(&new.short_form)
        .bind(new.max_debt)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Duplicate(new.name.clone())
            }
            _ => StoreError::Database(e),
        })?;

        tracing::info!(
            guild_id = new.guild_id,
            name = %new.name,
            short_form = %new.short_form,
            max_debt = new.max_debt,
            "currency persisted"
        );
        Ok(())
    }

    async fn list_for_guild(&self, guild_id: i64) -> Result<Vec<CurrencyDefinition>, StoreError> {
        let rows: Vec<(i64, String, String, i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT guild_id, currency_name, short_form, max_debt, created_at
            FROM guild_currencies
            WHERE guild_id = $1
            ORDER BY UPPER(currency_name) ASC
            "#,
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(guild_id, name, short_form, max_debt, created_at)| CurrencyDefinition {
                    guild_id,
                    name,
                    short_form,
                    max_debt,
                    created_at,
                },
            )
            .collect())
    }

    async fn balances_for_user(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Vec<BalanceLine>, StoreError> {
        let rows: Vec<(String, String, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT gc.currency_name, gc.short_form, um.amount
            FROM guild_currencies gc
            LEFT OUTER JOIN user_money um
                ON um.guild_id = gc.guild_id
                AND um.user_id = $2
                AND um.currency_name = gc.currency_name
            WHERE gc.guild_id = $1
            ORDER BY UPPER(gc.currency_name) ASC
            "#,
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(currency_name, short_form, amount)| BalanceLine {
                currency_name,
                short_form,
                amount,
            })
            .collect())
    }
}
