//! In-memory host stub for tests.
//!
//! [`MockStub`] implements [`LedgerStub`] over a HashMap, with scripted
//! transaction inputs (function, parameters, creator credential, query
//! results) and a recorded log of cross-handler invocations. It backs the
//! crate's own tests and is exported for applications testing their
//! handlers without a live host runtime.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::error::{Result, ShimError};
use crate::stub::{BoxFuture, Creator, IterItem, LedgerStub, QueryIter};

/// A recorded cross-handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    /// Target handler name.
    pub name: String,
    /// Argument payloads as sent.
    pub args: Vec<Bytes>,
    /// Channel the call was addressed to.
    pub channel: String,
}

/// Scripted remote iterator.
///
/// Yields its items in order; once they run out it keeps reporting an empty
/// `done = true` step. Tracks how many times `next` was called so tests can
/// assert that exhausted cursors stop calling.
pub struct MockQueryIter {
    items: VecDeque<IterItem>,
    calls: Arc<AtomicUsize>,
}

impl MockQueryIter {
    /// Create a scripted iterator.
    pub fn new(items: Vec<IterItem>) -> Self {
        Self {
            items: items.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter, readable after the iterator is boxed away.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl QueryIter for MockQueryIter {
    fn next(&mut self) -> BoxFuture<'_, Result<IterItem>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let item = self.items.pop_front().unwrap_or(IterItem {
            value: None,
            done: true,
        });
        Box::pin(async move { Ok(item) })
    }
}

/// In-memory test double for the host boundary.
#[derive(Default)]
pub struct MockStub {
    state: Mutex<HashMap<String, Bytes>>,
    function: Mutex<Option<(String, Vec<String>)>>,
    creator: Mutex<Option<Creator>>,
    query_results: Mutex<VecDeque<Vec<IterItem>>>,
    queries: Mutex<Vec<String>>,
    invocations: Mutex<Vec<RecordedInvocation>>,
    invoke_reply: Mutex<Bytes>,
}

impl MockStub {
    /// Create an empty mock stub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the current transaction's function name and parameters.
    pub fn set_function(&self, name: &str, params: &[&str]) {
        *self.function.lock().expect("function lock poisoned") = Some((
            name.to_string(),
            params.iter().map(|p| p.to_string()).collect(),
        ));
    }

    /// Script the submitter credential.
    pub fn set_creator(&self, msp_id: &str, id_bytes: impl Into<Bytes>) {
        *self.creator.lock().expect("creator lock poisoned") =
            Some(Creator::new(msp_id, id_bytes));
    }

    /// Seed a state entry directly.
    pub fn set_state(&self, key: &str, value: impl Into<Bytes>) {
        self.state
            .lock()
            .expect("state lock poisoned")
            .insert(key.to_string(), value.into());
    }

    /// Read a state entry directly, for assertions.
    pub fn state_of(&self, key: &str) -> Option<Bytes> {
        self.state
            .lock()
            .expect("state lock poisoned")
            .get(key)
            .cloned()
    }

    /// Queue one scripted query result set; consumed in FIFO order by
    /// `get_query_result`.
    pub fn push_query_result(&self, items: Vec<IterItem>) {
        self.query_results
            .lock()
            .expect("query lock poisoned")
            .push_back(items);
    }

    /// Query strings received so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock poisoned").clone()
    }

    /// Script the payload returned by cross-handler invocations.
    pub fn set_invoke_reply(&self, payload: impl Into<Bytes>) {
        *self.invoke_reply.lock().expect("reply lock poisoned") = payload.into();
    }

    /// Cross-handler invocations recorded so far, in order.
    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned")
            .clone()
    }
}

impl LedgerStub for MockStub {
    fn get_creator(&self) -> BoxFuture<'_, Result<Creator>> {
        let creator = self
            .creator
            .lock()
            .expect("creator lock poisoned")
            .clone()
            .ok_or_else(|| ShimError::Transport("no creator scripted".to_string()));
        Box::pin(async move { creator })
    }

    fn get_function_and_parameters(&self) -> Result<(String, Vec<String>)> {
        self.function
            .lock()
            .expect("function lock poisoned")
            .clone()
            .ok_or_else(|| ShimError::Transport("no function scripted".to_string()))
    }

    fn get_state<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Bytes>> {
        let value = self.state_of(key).unwrap_or_default();
        Box::pin(async move { Ok(value) })
    }

    fn put_state<'a>(&'a self, key: &'a str, value: Bytes) -> BoxFuture<'a, Result<()>> {
        self.state
            .lock()
            .expect("state lock poisoned")
            .insert(key.to_string(), value);
        Box::pin(async move { Ok(()) })
    }

    fn invoke_handler<'a>(
        &'a self,
        name: &'a str,
        args: Vec<Bytes>,
        channel: &'a str,
    ) -> BoxFuture<'a, Result<Bytes>> {
        self.invocations
            .lock()
            .expect("invocations lock poisoned")
            .push(RecordedInvocation {
                name: name.to_string(),
                args,
                channel: channel.to_string(),
            });
        let reply = self.invoke_reply.lock().expect("reply lock poisoned").clone();
        Box::pin(async move { Ok(reply) })
    }

    fn get_query_result<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn QueryIter>>> {
        self.queries
            .lock()
            .expect("queries lock poisoned")
            .push(query.to_string());
        let scripted = self
            .query_results
            .lock()
            .expect("query lock poisoned")
            .pop_front()
            .ok_or_else(|| ShimError::Transport("no query result scripted".to_string()));
        Box::pin(async move {
            let items = scripted?;
            Ok(Box::new(MockQueryIter::new(items)) as Box<dyn QueryIter>)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_state_round_trip() {
        let stub = MockStub::new();
        stub.put_state("k", Bytes::from_static(b"v")).await.unwrap();
        assert_eq!(stub.get_state("k").await.unwrap(), Bytes::from_static(b"v"));
    }

    #[tokio::test]
    async fn test_absent_state_is_empty() {
        let stub = MockStub::new();
        assert!(stub.get_state("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unscripted_creator_is_transport_error() {
        let stub = MockStub::new();
        let err = stub.get_creator().await.unwrap_err();
        assert!(matches!(err, ShimError::Transport(_)));
    }

    #[tokio::test]
    async fn test_scripted_iterator_synthesizes_terminal_step() {
        let mut iter = MockQueryIter::new(vec![]);
        let item = iter.next().await.unwrap();
        assert!(item.done);
        assert!(item.value.is_none());
    }

    #[tokio::test]
    async fn test_queries_are_recorded() {
        let stub = MockStub::new();
        stub.push_query_result(vec![]);
        stub.get_query_result("{\"selector\":{}}").await.unwrap();
        assert_eq!(stub.queries(), vec!["{\"selector\":{}}".to_string()]);
    }
}
