//! Message gateway
//!
//! Routes inbound chat messages to intake flows waiting on them. A flow
//! subscribes with its `(channel_id, author_id)` key; every message from
//! that participant in that channel is fanned out to all subscribed flows
//! until they unsubscribe (on drop). Messages nobody is waiting for are
//! left to the command dispatcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::webhook::ReplySink;
use super::{ChatChannel, ChatError, IncomingMessage};

type WaiterKey = (i64, i64);
type Waiters = HashMap<WaiterKey, Vec<(u64, mpsc::UnboundedSender<IncomingMessage>)>>;

/// Registry of conversations currently being waited on.
#[derive(Default)]
pub struct MessageGateway {
    waiters: Mutex<Waiters>,
    next_waiter_id: AtomicU64,
}

impl MessageGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer an inbound message to waiting flows.
    ///
    /// Returns `true` if at least one flow received it; the caller should
    /// then not dispatch the message as a command.
    pub fn offer(&self, message: &IncomingMessage) -> bool {
        let key = (message.channel_id, message.author_id);
        let mut waiters = self.registry();
        match waiters.get_mut(&key) {
            Some(senders) => {
                senders.retain(|(_, tx)| tx.send(message.clone()).is_ok());
                if senders.is_empty() {
                    waiters.remove(&key);
                    return false;
                }
                true
            }
            None => false,
        }
    }

    /// Open a conversation bound to one participant in one channel.
    /// Outbound messages go through `sink`; inbound messages arrive via
    /// [`MessageGateway::offer`]. The subscription ends when the returned
    /// channel is dropped.
    pub fn subscribe(
        self: &Arc<Self>,
        channel_id: i64,
        author_id: i64,
        sink: Arc<dyn ReplySink>,
    ) -> GatewayChannel {
        let (tx, rx) = mpsc::unbounded_channel();
        let waiter_id = self.next_waiter_id.fetch_add(1, Ordering::Relaxed);
        self.registry()
            .entry((channel_id, author_id))
            .or_default()
            .push((waiter_id, tx));

        GatewayChannel {
            gateway: Arc::clone(self),
            key: (channel_id, author_id),
            waiter_id,
            rx,
            sink,
        }
    }

    /// Number of flows currently waiting on the given conversation.
    pub fn waiting_on(&self, channel_id: i64, author_id: i64) -> usize {
        self.registry()
            .get(&(channel_id, author_id))
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn unsubscribe(&self, key: WaiterKey, waiter_id: u64) {
        let mut waiters = self.registry();
        if let Some(senders) = waiters.get_mut(&key) {
            senders.retain(|(id, _)| *id != waiter_id);
            if senders.is_empty() {
                waiters.remove(&key);
            }
        }
    }

    fn registry(&self) -> MutexGuard<'_, Waiters> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The gateway-backed [`ChatChannel`] handed to each intake flow.
pub struct GatewayChannel {
    gateway: Arc<MessageGateway>,
    key: WaiterKey,
    waiter_id: u64,
    rx: mpsc::UnboundedReceiver<IncomingMessage>,
    sink: Arc<dyn ReplySink>,
}

#[async_trait]
impl ChatChannel for GatewayChannel {
    async fn say(&self, content: &str) -> Result<(), ChatError> {
        self.sink.send(self.key.0, content).await
    }

    async fn next_reply(&mut self, timeout: Duration) -> Result<Option<IncomingMessage>, ChatError> {
        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Ok(Some(message)) => Ok(Some(message)),
            Ok(None) => Err(ChatError::Closed),
            Err(_) => Ok(None),
        }
    }
}

impl Drop for GatewayChannel {
    fn drop(&mut self) {
        self.gateway.unsubscribe(self.key, self.waiter_id);
    }
}
