//! Host boundary - the primitives supplied by the ledger runtime.
//!
//! Everything the runtime hands us is behind [`LedgerStub`]: the submitter
//! credential, the function name and positional parameters of the current
//! transaction, raw key/value state access, cross-handler invocation, and
//! rich query iteration. The trait is dyn-safe so a transaction context can
//! hold it as `Arc<dyn LedgerStub>`; async methods return [`BoxFuture`].
//!
//! None of these primitives are reimplemented here. Timeouts, retries and
//! rollback belong to the host transport.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::Result;

/// Boxed future for dyn-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The submitter credential as delivered by the host runtime.
#[derive(Debug, Clone)]
pub struct Creator {
    /// Membership service provider that vouched for the submitter.
    pub msp_id: String,
    /// PEM-encoded X.509 certificate bytes.
    pub id_bytes: Bytes,
}

impl Creator {
    /// Create a creator record.
    pub fn new(msp_id: impl Into<String>, id_bytes: impl Into<Bytes>) -> Self {
        Self {
            msp_id: msp_id.into(),
            id_bytes: id_bytes.into(),
        }
    }
}

/// One raw query match as yielded by the remote iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Namespace the key lives in.
    pub namespace: String,
    /// Full state key of the match.
    pub key: String,
    /// Undecoded value bytes.
    pub value: Bytes,
}

impl RawRecord {
    /// Create a raw record.
    pub fn new(
        namespace: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Bytes>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One step of the remote iterator protocol.
///
/// A `done = true` response may still carry a value; consumers must count
/// or materialize it like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterItem {
    /// The record carried by this step, if any.
    pub value: Option<RawRecord>,
    /// Whether the iterator is exhausted after this step.
    pub done: bool,
}

/// Remote query-result iterator primitive.
///
/// Implementations are driven by exactly one logical task at a time; the
/// wrapping [`QueryCursor`](crate::cursor::QueryCursor) owns the iterator
/// for its whole lifetime.
pub trait QueryIter: Send {
    /// Fetch the next step from the remote iterator.
    fn next(&mut self) -> BoxFuture<'_, Result<IterItem>>;
}

/// Host primitives available to a transaction.
///
/// One instance is handed to the shim per transaction delivery; the host
/// guarantees deliveries are isolated from each other, so no locking is
/// layered on top here.
pub trait LedgerStub: Send + Sync {
    /// Submitter credential of the current transaction.
    fn get_creator(&self) -> BoxFuture<'_, Result<Creator>>;

    /// Function name and positional parameters of the current transaction.
    ///
    /// These are materialized with the transaction itself, so the accessor
    /// is synchronous.
    fn get_function_and_parameters(&self) -> Result<(String, Vec<String>)>;

    /// Read raw state bytes by key. Empty bytes means the key is absent.
    fn get_state<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Bytes>>;

    /// Write raw state bytes by key.
    fn put_state<'a>(&'a self, key: &'a str, value: Bytes) -> BoxFuture<'a, Result<()>>;

    /// Invoke another handler by name on the given channel, returning its
    /// response payload.
    fn invoke_handler<'a>(
        &'a self,
        name: &'a str,
        args: Vec<Bytes>,
        channel: &'a str,
    ) -> BoxFuture<'a, Result<Bytes>>;

    /// Issue a rich query and return the remote iterator over its matches.
    ///
    /// Only available on state-store backends with rich query support;
    /// absence is a deployment-time concern.
    fn get_query_result<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<Box<dyn QueryIter>>>;
}
