//! Common test utilities
//!
//! In-memory fakes for the store and chat seams so the intake flow can be
//! exercised end-to-end without a database or a transport.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use coffer::chat::{ChatChannel, ChatError, IncomingMessage, ReplySink};
use coffer::store::{CurrencyStore, StoreError};
use coffer::{BalanceLine, CurrencyDefinition, NewCurrency, UserBalance};

pub const GUILD: i64 = 1001;
pub const CHANNEL: i64 = 2002;
pub const USER: i64 = 3003;

/// In-memory currency store with a write counter for zero-write assertions.
#[derive(Default)]
pub struct MemoryStore {
    currencies: Mutex<Vec<CurrencyDefinition>>,
    balances: Mutex<Vec<UserBalance>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed_currency(&self, guild_id: i64, name: &str, short_form: &str, max_debt: i64) {
        self.currencies.lock().unwrap().push(CurrencyDefinition {
            guild_id,
            name: name.to_string(),
            short_form: short_form.to_string(),
            max_debt,
            created_at: Utc::now(),
        });
    }

    pub fn seed_balance(&self, guild_id: i64, user_id: i64, currency_name: &str, amount: i64) {
        self.balances.lock().unwrap().push(UserBalance {
            guild_id,
            user_id,
            currency_name: currency_name.to_string(),
            amount,
        });
    }

    /// How many inserts have been issued.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn currencies(&self) -> Vec<CurrencyDefinition> {
        self.currencies.lock().unwrap().clone()
    }
}

#[async_trait]
impl CurrencyStore for MemoryStore {
    async fn count_for_guild(&self, guild_id: i64) -> Result<i64, StoreError> {
        let count = self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.guild_id == guild_id)
            .count();
        Ok(count as i64)
    }

    async fn name_exists(&self, guild_id: i64, name: &str) -> Result<bool, StoreError> {
        Ok(self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.guild_id == guild_id && c.name.eq_ignore_ascii_case(name)))
    }

    async fn short_form_exists(&self, guild_id: i64, short_form: &str) -> Result<bool, StoreError> {
        Ok(self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.guild_id == guild_id && c.short_form.eq_ignore_ascii_case(short_form)))
    }

    async fn insert(&self, new: &NewCurrency) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.currencies.lock().unwrap().push(CurrencyDefinition {
            guild_id: new.guild_id,
            name: new.name.clone(),
            short_form: new.short_form.clone(),
            max_debt: new.max_debt,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_for_guild(&self, guild_id: i64) -> Result<Vec<CurrencyDefinition>, StoreError> {
        let mut rows: Vec<CurrencyDefinition> = self
            .currencies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.guild_id == guild_id)
            .cloned()
            .collect();
        rows.sort_by_key(|c| c.name.to_uppercase());
        Ok(rows)
    }

    async fn balances_for_user(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Vec<BalanceLine>, StoreError> {
        let rows = self.list_for_guild(guild_id).await?;
        let balances = self.balances.lock().unwrap();
        let lines = rows
            .into_iter()
            .map(|c| {
                let amount = balances
                    .iter()
                    .find(|b| {
                        b.guild_id == guild_id
                            && b.user_id == user_id
                            && b.currency_name == c.name
                    })
                    .map(|b| b.amount);
                BalanceLine {
                    currency_name: c.name,
                    short_form: c.short_form,
                    amount,
                }
            })
            .collect();
        Ok(lines)
    }
}

/// Chat channel fed from a fixed script. An exhausted script behaves like
/// a participant who stopped answering: every further wait times out.
pub struct ScriptedChannel {
    replies: VecDeque<String>,
    transcript: Arc<Mutex<Vec<String>>>,
}

impl ScriptedChannel {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: replies.iter().map(|r| r.to_string()).collect(),
            transcript: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Everything the service said, shared with the test after the channel
    /// moves into the flow.
    pub fn transcript(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.transcript)
    }
}

#[async_trait]
impl ChatChannel for ScriptedChannel {
    async fn say(&self, content: &str) -> Result<(), ChatError> {
        self.transcript.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn next_reply(&mut self, _timeout: Duration) -> Result<Option<IncomingMessage>, ChatError> {
        Ok(self.replies.pop_front().map(|content| IncomingMessage {
            guild_id: GUILD,
            channel_id: CHANNEL,
            author_id: USER,
            content,
        }))
    }
}

/// Reply sink that collects outbound messages for assertions.
#[derive(Default)]
pub struct CollectingSink {
    sent: Mutex<Vec<(i64, String)>>,
}

impl CollectingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` messages have been sent. Panics after
    /// two seconds; intake flows run as spawned tasks, so tests poll.
    pub async fn wait_for(&self, count: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            if self.sent.lock().unwrap().len() >= count {
                return;
            }
            if tokio::time::Instant::now() > deadline {
                panic!(
                    "timed out waiting for {} outbound messages, got {:?}",
                    count,
                    self.sent()
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl ReplySink for CollectingSink {
    async fn send(&self, channel_id: i64, content: &str) -> Result<(), ChatError> {
        self.sent.lock().unwrap().push((channel_id, content.to_string()));
        Ok(())
    }
}
