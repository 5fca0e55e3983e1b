//! Intake state machine
//!
//! One invocation walks `name -> short form -> debt ceiling` in order,
//! prompting once per step and waiting for the participant's next message
//! with a deadline. Soft rejections re-prompt within the step until its
//! retry budget runs out; a timeout or an exhausted budget abandons the
//! whole flow. Only a fully-accepted run writes to the store, and it
//! writes exactly once.

use std::sync::Arc;
use std::time::Duration;

use crate::chat::ChatChannel;
use crate::domain::{
    validate_debt, validate_name, validate_short_form, IntakeContext, NewCurrency, RejectReason,
    MAX_GUILD_CURRENCIES,
};
use crate::error::AppError;
use crate::store::CurrencyStore;

use super::IntakeOutcome;

const NAME_PROMPT: &str = r#"What do you want the _name_ of the currency to be? Examples: "dollars", "pounds", "krona", etc."#;
const SHORT_FORM_PROMPT: &str = r#"What do you want the _short form_ of the currency to be? Examples: "USD", "GBP", "RS3", etc."#;
const DEBT_PROMPT: &str = r#"How much debt do you want users to be able to go into with this currency? Use "0" for no debt, or a number for any amount."#;
const SUCCESS_MESSAGE: &str = "Added a new currency to your guild!";
const TIMEOUT_MESSAGE: &str = "Timed out on adding a new currency to the guild.";
const OUT_OF_ATTEMPTS_MESSAGE: &str =
    "You failed to give a valid answer too many times - please try again later.";

/// Where one step ended up.
enum StepResult<T> {
    Accepted(T),
    Abandoned(Abandon),
}

/// Flow-level failures. Either one ends the whole intake, whichever step
/// it happened on.
enum Abandon {
    TimedOut,
    OutOfAttempts,
}

/// The two text steps differ only in which uniqueness namespace they
/// check.
#[derive(Clone, Copy)]
enum TextField {
    Name,
    ShortForm,
}

/// One currency-creation conversation.
pub struct CurrencyIntake<C> {
    store: Arc<dyn CurrencyStore>,
    channel: C,
    ctx: IntakeContext,
    reply_timeout: Duration,
    retry_limit: u32,
}

impl<C: ChatChannel> CurrencyIntake<C> {
    pub fn new(
        store: Arc<dyn CurrencyStore>,
        channel: C,
        ctx: IntakeContext,
        reply_timeout: Duration,
        retry_limit: u32,
    ) -> Self {
        Self {
            store,
            channel,
            ctx,
            reply_timeout,
            retry_limit,
        }
    }

    /// Run the flow to one of its terminal outcomes.
    ///
    /// Store and transport failures surface as `Err`; everything the
    /// participant can cause is an [`IntakeOutcome`].
    pub async fn run(mut self) -> Result<IntakeOutcome, AppError> {
        let guild_id = self.ctx.guild_id;
        tracing::info!(
            guild_id,
            user_id = self.ctx.user_id,
            correlation_id = %self.ctx.correlation_id,
            "currency intake started"
        );

        if self.store.count_for_guild(guild_id).await? >= MAX_GUILD_CURRENCIES {
            self.channel
                .say(&format!(
                    "You can only have **{}** currencies per guild.",
                    MAX_GUILD_CURRENCIES
                ))
                .await?;
            return self.finish(IntakeOutcome::CapacityExceeded);
        }

        let name = match self.text_step(TextField::Name).await? {
            StepResult::Accepted(value) => value,
            StepResult::Abandoned(abandon) => return self.abandon(abandon).await,
        };

        let short_form = match self.text_step(TextField::ShortForm).await? {
            StepResult::Accepted(value) => value,
            StepResult::Abandoned(abandon) => return self.abandon(abandon).await,
        };

        let max_debt = match self.debt_step().await? {
            StepResult::Accepted(value) => value,
            StepResult::Abandoned(abandon) => return self.abandon(abandon).await,
        };

        let new = NewCurrency {
            guild_id,
            name,
            short_form,
            max_debt,
        };
        self.store.insert(&new).await?;
        self.channel.say(SUCCESS_MESSAGE).await?;
        self.finish(IntakeOutcome::Persisted(new))
    }

    /// Shared step driver for the two text fields: prompt once, then spend
    /// attempts until one validates. The duplicate check is a fresh store
    /// read on every attempt.
    async fn text_step(&mut self, field: TextField) -> Result<StepResult<String>, AppError> {
        let prompt = match field {
            TextField::Name => NAME_PROMPT,
            TextField::ShortForm => SHORT_FORM_PROMPT,
        };
        self.channel.say(prompt).await?;

        for attempt in 1..=self.retry_limit {
            let reply = match self.channel.next_reply(self.reply_timeout).await? {
                Some(message) => message,
                None => return Ok(StepResult::Abandoned(Abandon::TimedOut)),
            };

            let candidate = reply.content.trim();
            let taken = if candidate.is_empty() {
                false
            } else {
                match field {
                    TextField::Name => {
                        self.store.name_exists(self.ctx.guild_id, candidate).await?
                    }
                    TextField::ShortForm => {
                        self.store
                            .short_form_exists(self.ctx.guild_id, candidate)
                            .await?
                    }
                }
            };

            let validated = match field {
                TextField::Name => validate_name(&reply.content, taken),
                TextField::ShortForm => validate_short_form(&reply.content, taken),
            };
            match validated {
                Ok(value) => return Ok(StepResult::Accepted(value)),
                Err(reason) => self.reject(attempt, reason).await?,
            }
        }

        Ok(StepResult::Abandoned(Abandon::OutOfAttempts))
    }

    async fn debt_step(&mut self) -> Result<StepResult<i64>, AppError> {
        self.channel.say(DEBT_PROMPT).await?;

        for attempt in 1..=self.retry_limit {
            let reply = match self.channel.next_reply(self.reply_timeout).await? {
                Some(message) => message,
                None => return Ok(StepResult::Abandoned(Abandon::TimedOut)),
            };

            match validate_debt(&reply.content) {
                Ok(value) => return Ok(StepResult::Accepted(value)),
                Err(reason) => self.reject(attempt, reason).await?,
            }
        }

        Ok(StepResult::Abandoned(Abandon::OutOfAttempts))
    }

    async fn reject(&self, attempt: u32, reason: RejectReason) -> Result<(), AppError> {
        tracing::debug!(
            correlation_id = %self.ctx.correlation_id,
            attempt,
            ?reason,
            "intake attempt rejected"
        );
        self.channel.say(&reason.to_string()).await?;
        Ok(())
    }

    async fn abandon(self, abandon: Abandon) -> Result<IntakeOutcome, AppError> {
        let (message, outcome) = match abandon {
            Abandon::TimedOut => (TIMEOUT_MESSAGE, IntakeOutcome::TimedOut),
            Abandon::OutOfAttempts => {
                (OUT_OF_ATTEMPTS_MESSAGE, IntakeOutcome::TooManyInvalidAttempts)
            }
        };
        self.channel.say(message).await?;
        self.finish(outcome)
    }

    fn finish(&self, outcome: IntakeOutcome) -> Result<IntakeOutcome, AppError> {
        tracing::info!(
            correlation_id = %self.ctx.correlation_id,
            outcome = outcome_label(&outcome),
            "currency intake finished"
        );
        Ok(outcome)
    }
}

fn outcome_label(outcome: &IntakeOutcome) -> &'static str {
    match outcome {
        IntakeOutcome::Persisted(_) => "persisted",
        IntakeOutcome::CapacityExceeded => "capacity_exceeded",
        IntakeOutcome::TimedOut => "timed_out",
        IntakeOutcome::TooManyInvalidAttempts => "too_many_invalid_attempts",
    }
}
