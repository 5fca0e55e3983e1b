//! coffer Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod chat;
pub mod commands;
pub mod domain;
pub mod intake;
pub mod store;

// Private modules (used only by the binary)
pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{
    BalanceLine, CurrencyDefinition, IntakeContext, NewCurrency, RejectReason, UserBalance,
    MAX_GUILD_CURRENCIES,
};
pub use intake::{CurrencyIntake, IntakeOutcome};
