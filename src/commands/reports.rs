//! Report commands
//!
//! The two read-only queries over the registry: listing a guild's
//! currencies and showing a user's balances. Each is one read and one
//! reply.

use crate::chat::ReplySink;
use crate::error::AppError;
use crate::store::CurrencyStore;

const NO_CURRENCIES_MESSAGE: &str =
    "There are no currencies set up for this guild! Use the `create-currency` command to add a new one.";

/// List the guild's currencies, ordered case-insensitively by name.
pub async fn list_currencies(
    store: &dyn CurrencyStore,
    sink: &dyn ReplySink,
    guild_id: i64,
    channel_id: i64,
) -> Result<(), AppError> {
    let currencies = store.list_for_guild(guild_id).await?;
    if currencies.is_empty() {
        sink.send(channel_id, NO_CURRENCIES_MESSAGE).await?;
        return Ok(());
    }

    let listing = currencies
        .iter()
        .map(|currency| format!("* {}", currency.name))
        .collect::<Vec<_>>()
        .join("\n");
    sink.send(channel_id, &listing).await?;
    Ok(())
}

/// Show a user's balance in every guild currency. Currencies the user
/// holds no balance row for are reported as "none".
pub async fn show_balance(
    store: &dyn CurrencyStore,
    sink: &dyn ReplySink,
    guild_id: i64,
    channel_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    let lines = store.balances_for_user(guild_id, user_id).await?;
    if lines.is_empty() {
        sink.send(channel_id, NO_CURRENCIES_MESSAGE).await?;
        return Ok(());
    }

    let report = lines
        .iter()
        .map(|line| match line.amount {
            Some(amount) => format!("{}: {} {}", line.currency_name, amount, line.short_form),
            None => format!("{}: none", line.currency_name),
        })
        .collect::<Vec<_>>()
        .join("\n");
    sink.send(channel_id, &report).await?;
    Ok(())
}
