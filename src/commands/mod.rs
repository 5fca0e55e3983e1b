//! Command dispatch
//!
//! Maps inbound chat messages to the service's three commands. Messages
//! claimed by a waiting intake flow never reach the parser; everything
//! else either triggers a command or is ignored.

pub mod reports;

use std::sync::Arc;
use std::time::Duration;

use crate::chat::{IncomingMessage, MessageGateway, ReplySink};
use crate::config::Config;
use crate::domain::IntakeContext;
use crate::error::AppError;
use crate::intake::CurrencyIntake;
use crate::store::CurrencyStore;

/// The command triggers the service understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateCurrency,
    ListCurrencies,
    /// `show-balance [user]`; without an argument the author is the target.
    ShowBalance { target: Option<i64> },
}

impl Command {
    /// Parse a message body into a command trigger, if it is one.
    pub fn parse(content: &str) -> Option<Command> {
        let mut parts = content.split_whitespace();
        let command = match parts.next()? {
            "create-currency" => Command::CreateCurrency,
            "list-currencies" => Command::ListCurrencies,
            "show-balance" => Command::ShowBalance {
                target: parts.next().and_then(|arg| arg.parse().ok()),
            },
            _ => return None,
        };
        Some(command)
    }
}

/// How an inbound message was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Delivered to one or more waiting intake flows.
    RoutedToIntake,
    /// Spawned a new intake flow.
    IntakeStarted,
    /// A report command ran and replied.
    Replied,
    /// Not a command and nobody was waiting for it.
    Ignored,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::RoutedToIntake => "routed_to_intake",
            Disposition::IntakeStarted => "intake_started",
            Disposition::Replied => "replied",
            Disposition::Ignored => "ignored",
        }
    }
}

/// Routes every inbound message: first to waiting flows, then to commands.
pub struct Dispatcher {
    store: Arc<dyn CurrencyStore>,
    gateway: Arc<MessageGateway>,
    sink: Arc<dyn ReplySink>,
    reply_timeout: Duration,
    retry_limit: u32,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn CurrencyStore>,
        gateway: Arc<MessageGateway>,
        sink: Arc<dyn ReplySink>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            gateway,
            sink,
            reply_timeout: config.prompt_timeout(),
            retry_limit: config.step_retry_limit,
        }
    }

    pub async fn handle(&self, message: IncomingMessage) -> Result<Disposition, AppError> {
        if self.gateway.offer(&message) {
            return Ok(Disposition::RoutedToIntake);
        }

        match Command::parse(&message.content) {
            Some(Command::CreateCurrency) => {
                self.spawn_intake(&message);
                Ok(Disposition::IntakeStarted)
            }
            Some(Command::ListCurrencies) => {
                reports::list_currencies(
                    self.store.as_ref(),
                    self.sink.as_ref(),
                    message.guild_id,
                    message.channel_id,
                )
                .await?;
                Ok(Disposition::Replied)
            }
            Some(Command::ShowBalance { target }) => {
                reports::show_balance(
                    self.store.as_ref(),
                    self.sink.as_ref(),
                    message.guild_id,
                    message.channel_id,
                    target.unwrap_or(message.author_id),
                )
                .await?;
                Ok(Disposition::Replied)
            }
            None => Ok(Disposition::Ignored),
        }
    }

    /// Start an intake flow as its own task. The subscription is opened
    /// here, before the task is spawned, so the participant's next message
    /// cannot slip past the gateway.
    fn spawn_intake(&self, message: &IncomingMessage) {
        let channel =
            self.gateway
                .subscribe(message.channel_id, message.author_id, self.sink.clone());
        let ctx = IntakeContext::new(message.guild_id, message.channel_id, message.author_id);
        let intake = CurrencyIntake::new(
            self.store.clone(),
            channel,
            ctx,
            self.reply_timeout,
            self.retry_limit,
        );

        let sink = self.sink.clone();
        let channel_id = message.channel_id;
        tokio::spawn(async move {
            if let Err(error) = intake.run().await {
                tracing::error!(%error, "currency intake failed");
                let _ = sink
                    .send(
                        channel_id,
                        "Something went wrong while adding the currency - please try again later.",
                    )
                    .await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_currency() {
        assert_eq!(Command::parse("create-currency"), Some(Command::CreateCurrency));
        assert_eq!(
            Command::parse("  create-currency  "),
            Some(Command::CreateCurrency)
        );
    }

    #[test]
    fn test_parse_list_currencies() {
        assert_eq!(Command::parse("list-currencies"), Some(Command::ListCurrencies));
    }

    #[test]
    fn test_parse_show_balance_defaults_to_author() {
        assert_eq!(
            Command::parse("show-balance"),
            Some(Command::ShowBalance { target: None })
        );
    }

    #[test]
    fn test_parse_show_balance_with_target() {
        assert_eq!(
            Command::parse("show-balance 12345"),
            Some(Command::ShowBalance {
                target: Some(12345)
            })
        );
    }

    #[test]
    fn test_parse_rejects_everything_else() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("hello there"), None);
        assert_eq!(Command::parse("create-currency-now"), None);
    }
}
