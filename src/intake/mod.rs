//! Conversational intake
//!
//! The bounded state machine that walks a participant through registering
//! a currency: capacity precondition, then name, short form and debt
//! ceiling steps, then a single atomic persist.

mod machine;

use serde::{Deserialize, Serialize};

use crate::domain::NewCurrency;

pub use machine::CurrencyIntake;

/// Terminal outcome of one intake invocation.
///
/// Exactly one of these is reached per run; every outcome has been
/// announced to the participant by the time it is returned. Nothing is
/// persisted on any outcome but `Persisted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntakeOutcome {
    /// All steps accepted; the currency was written.
    Persisted(NewCurrency),

    /// The guild already holds the maximum number of currencies. Checked
    /// before any prompting.
    CapacityExceeded,

    /// A step's wait elapsed with no reply. Abandons the whole flow.
    TimedOut,

    /// A single step used up its retry budget. Abandons the whole flow.
    TooManyInvalidAttempts,
}
