//! Step validators
//!
//! Pure per-attempt validation for the intake steps. Duplicate lookups are
//! performed by the state machine; validators take the lookup result as an
//! input so they stay side-effect free.

use thiserror::Error;

/// Why one attempt at a step was rejected. Soft and step-local: the flow
/// stays on the same step and re-prompts until the retry budget runs out.
///
/// The `Display` text is the user-facing rejection message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("This isn't a valid answer - please provide another one.")]
    EmptyInput,

    #[error("You're already using a currency with the name **{0}** - please provide another one.")]
    DuplicateName(String),

    #[error("You're already using a currency with the short form **{0}** - please provide another one.")]
    DuplicateShortForm(String),

    #[error("This isn't a valid number - please provide another one.")]
    InvalidNumber,

    #[error("The debt amount has to be zero or above - please provide another one.")]
    NegativeAmount,
}

/// Validate a currency name attempt. `name_taken` is the result of the
/// case-insensitive lookup against the guild's existing names.
pub fn validate_name(raw: &str, name_taken: bool) -> Result<String, RejectReason> {
    let name = require_text(raw)?;
    if name_taken {
        return Err(RejectReason::DuplicateName(name));
    }
    Ok(name)
}

/// Validate a short form attempt. `short_form_taken` is the lookup result
/// against the guild's existing short forms (not its names).
pub fn validate_short_form(raw: &str, short_form_taken: bool) -> Result<String, RejectReason> {
    let short_form = require_text(raw)?;
    if short_form_taken {
        return Err(RejectReason::DuplicateShortForm(short_form));
    }
    Ok(short_form)
}

/// Validate a debt ceiling attempt: non-empty, an integer, and >= 0.
pub fn validate_debt(raw: &str) -> Result<i64, RejectReason> {
    let text = require_text(raw)?;
    let value: i64 = text.parse().map_err(|_| RejectReason::InvalidNumber)?;
    if value < 0 {
        return Err(RejectReason::NegativeAmount);
    }
    Ok(value)
}

fn require_text(raw: &str) -> Result<String, RejectReason> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RejectReason::EmptyInput);
    }
    Ok(trimmed.to_string())
}
