//! Test resolver whose answers are driven by the test body.
//!
//! Every query is recorded. A query whose key has a scripted answer returns it
//! immediately; any other query parks until the test calls one of the
//! `complete_*` methods for that key. A query that is never completed stays
//! pending forever, which is how tests model a lookup lost in transit.
//!
//! # Example
//!
//! ```ignore
//! let resolver = Arc::new(ScriptedResolver::new());
//! resolver.script_reverse(addr, Ok(Some("vitalik.eth".into())));
//!
//! // ... a forward query for "slow.eth" parks ...
//! resolver.complete_forward("slow.eth", Ok(Some(addr)));
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::{anyhow, Result};
use magic_address_types::{normalize_alias, Address};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::resolver::{LookupKind, NameResolver, ResolveOptions};

/// A scripted answer: `Err` carries the transport error message.
pub type Reply<V> = std::result::Result<V, String>;

#[derive(Debug)]
struct Lane<K, V> {
    scripted: HashMap<K, Reply<V>>,
    waiting: HashMap<K, Vec<oneshot::Sender<Reply<V>>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> Lane<K, V> {
    fn new() -> Self {
        Self {
            scripted: HashMap::new(),
            waiting: HashMap::new(),
        }
    }

    /// Either the scripted reply or a receiver to park on.
    fn enter(&mut self, key: &K) -> std::result::Result<Reply<V>, oneshot::Receiver<Reply<V>>> {
        if let Some(reply) = self.scripted.get(key) {
            return Ok(reply.clone());
        }
        let (tx, rx) = oneshot::channel();
        self.waiting.entry(key.clone()).or_default().push(tx);
        Err(rx)
    }

    fn complete(&mut self, key: &K, reply: Reply<V>) -> usize {
        let senders = self.waiting.remove(key).unwrap_or_default();
        let mut delivered = 0;
        for tx in senders {
            if tx.send(reply.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    fn parked(&self, key: &K) -> usize {
        self.waiting
            .get(key)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

#[derive(Debug)]
struct ScriptState {
    forward: Lane<String, Option<Address>>,
    reverse: Lane<Address, Option<String>>,
    avatar: Lane<String, Option<String>>,
    calls: Vec<(LookupKind, String)>,
}

/// Resolver for tests; see the module docs.
#[derive(Debug)]
pub struct ScriptedResolver {
    state: Mutex<ScriptState>,
}

impl Default for ScriptedResolver {
    fn default() -> Self {
        Self::new()
    }
}

async fn settle<V>(entry: std::result::Result<Reply<V>, oneshot::Receiver<Reply<V>>>) -> Result<V> {
    let reply = match entry {
        Ok(reply) => reply,
        Err(rx) => match rx.await {
            Ok(reply) => reply,
            // Lane dropped without an answer: stay pending like a lost request.
            Err(_) => std::future::pending().await,
        },
    };
    reply.map_err(|message| anyhow!(message))
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptState {
                forward: Lane::new(),
                reverse: Lane::new(),
                avatar: Lane::new(),
                calls: Vec::new(),
            }),
        }
    }

    /// Answer every future forward query for `name` with `reply`.
    pub fn script_forward(&self, name: &str, reply: Reply<Option<Address>>) {
        self.state
            .lock()
            .forward
            .scripted
            .insert(normalize_alias(name), reply);
    }

    pub fn script_reverse(&self, address: Address, reply: Reply<Option<String>>) {
        self.state.lock().reverse.scripted.insert(address, reply);
    }

    pub fn script_avatar(&self, name: &str, reply: Reply<Option<String>>) {
        self.state
            .lock()
            .avatar
            .scripted
            .insert(normalize_alias(name), reply);
    }

    /// Release parked forward queries for `name`. Returns how many were delivered.
    pub fn complete_forward(&self, name: &str, reply: Reply<Option<Address>>) -> usize {
        self.state
            .lock()
            .forward
            .complete(&normalize_alias(name), reply)
    }

    pub fn complete_reverse(&self, address: Address, reply: Reply<Option<String>>) -> usize {
        self.state.lock().reverse.complete(&address, reply)
    }

    pub fn complete_avatar(&self, name: &str, reply: Reply<Option<String>>) -> usize {
        self.state
            .lock()
            .avatar
            .complete(&normalize_alias(name), reply)
    }

    /// Number of live queries parked on a forward key.
    pub fn parked_forward(&self, name: &str) -> usize {
        self.state.lock().forward.parked(&normalize_alias(name))
    }

    pub fn parked_reverse(&self, address: Address) -> usize {
        self.state.lock().reverse.parked(&address)
    }

    /// Every query received so far, in arrival order.
    pub fn calls(&self) -> Vec<(LookupKind, String)> {
        self.state.lock().calls.clone()
    }

    pub fn calls_of(&self, kind: LookupKind) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, key)| key.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl NameResolver for ScriptedResolver {
    async fn resolve_name(&self, name: &str, _options: &ResolveOptions) -> Result<Option<Address>> {
        let entry = {
            let mut state = self.state.lock();
            state.calls.push((LookupKind::Forward, name.to_string()));
            state.forward.enter(&normalize_alias(name))
        };
        settle(entry).await
    }

    async fn lookup_address(
        &self,
        address: &Address,
        _options: &ResolveOptions,
    ) -> Result<Option<String>> {
        let entry = {
            let mut state = self.state.lock();
            state.calls.push((LookupKind::Reverse, address.to_string()));
            state.reverse.enter(address)
        };
        settle(entry).await
    }

    async fn resolve_avatar(
        &self,
        name: &str,
        _options: &ResolveOptions,
    ) -> Result<Option<String>> {
        let entry = {
            let mut state = self.state.lock();
            state.calls.push((LookupKind::Avatar, name.to_string()));
            state.avatar.enter(&normalize_alias(name))
        };
        settle(entry).await
    }
}
