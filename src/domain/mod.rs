//! Domain module
//!
//! Core domain types and per-step validation.

pub mod context;
pub mod currency;
pub mod validate;

pub use context::IntakeContext;
pub use currency::{
    BalanceLine, CurrencyDefinition, NewCurrency, UserBalance, MAX_GUILD_CURRENCIES,
};
pub use validate::{validate_debt, validate_name, validate_short_form, RejectReason};
