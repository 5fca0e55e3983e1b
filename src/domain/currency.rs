//! Currency records
//!
//! Typed rows for the guild currency registry and the read-only balance
//! table owned by other services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How many currencies a single guild may register.
pub const MAX_GUILD_CURRENCIES: i64 = 3;

/// A currency registered for a guild.
///
/// # Invariants
/// - `name` is unique per guild, case-insensitively
/// - `short_form` is unique per guild, case-insensitively, in its own
///   namespace (a currency's short form may equal another currency's name)
/// - `max_debt` >= 0
///
/// Rows are created only by the intake flow's terminal persist and are
/// never mutated or deleted by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyDefinition {
    pub guild_id: i64,
    pub name: String,
    pub short_form: String,
    /// Amount of negative balance a holder may incur (0 = no debt)
    pub max_debt: i64,
    pub created_at: DateTime<Utc>,
}

/// A fully-validated currency ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCurrency {
    pub guild_id: i64,
    pub name: String,
    pub short_form: String,
    pub max_debt: i64,
}

/// A user's balance in one currency. Read-only here; written by the
/// economy services that mint and spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBalance {
    pub guild_id: i64,
    pub user_id: i64,
    pub currency_name: String,
    pub amount: i64,
}

/// One line of the balance report: a guild currency left-joined with the
/// user's balance row. `amount` is `None` when the user holds no balance
/// row for that currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub currency_name: String,
    pub short_form: String,
    pub amount: Option<i64>,
}
