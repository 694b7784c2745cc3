//! Transaction context for handlers.
//!
//! [`Context`] composes the host's raw stub behind typed convenience
//! accessors - string and JSON state, cross-handler invocation, composite
//! keys, identity resolution, and rich query cursors. One context is
//! constructed per transaction delivery and handed to the resolved handler;
//! the host stub itself is never mutated or extended.
//!
//! # Example
//!
//! ```ignore
//! async fn transfer(ctx: Context, args: Vec<String>, _fcn: String) -> HandlerResult {
//!     let owner = ctx.creator_identity().await?;
//!     let key = ctx.create_composite_key("asset", &[&args[0]])?;
//!     ctx.put_json_state(&key, &NewOwner { id: owner.subject_id().to_string() }).await?;
//!     Ok(Payload::Empty)
//! }
//! ```

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cursor::{QueryCursor, RichQuery, ValueMode};
use crate::error::Result;
use crate::identity::Identity;
use crate::key;
use crate::stub::LedgerStub;

/// Per-transaction adapter over the host stub.
///
/// Cheap to clone; handlers may move it into spawned work scoped to the
/// transaction.
#[derive(Clone)]
pub struct Context {
    stub: Arc<dyn LedgerStub>,
}

impl Context {
    /// Wrap a host stub for one transaction.
    pub fn new(stub: Arc<dyn LedgerStub>) -> Self {
        Self { stub }
    }

    /// The raw host stub, for primitives not covered by the typed accessors.
    pub fn stub(&self) -> &dyn LedgerStub {
        self.stub.as_ref()
    }

    /// Resolve the submitter's identity from the transaction credential.
    pub async fn creator_identity(&self) -> Result<Identity> {
        let creator = self.stub.get_creator().await?;
        Identity::from_creator(&creator)
    }

    /// Read a state value as a UTF-8 string. Absent keys yield an empty
    /// string, matching the raw primitive's empty-bytes convention.
    pub async fn get_string_state(&self, key: &str) -> Result<String> {
        let raw = self.stub.get_state(key).await?;
        Ok(String::from_utf8(raw.to_vec())?)
    }

    /// Read and JSON-decode a state value. `None` when the key is absent.
    pub async fn get_json_state<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw = self.stub.get_state(key).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    /// Write a string state value.
    pub async fn put_string_state(&self, key: &str, value: &str) -> Result<()> {
        self.stub
            .put_state(key, Bytes::copy_from_slice(value.as_bytes()))
            .await
    }

    /// JSON-encode and write a state value.
    pub async fn put_json_state<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let encoded = serde_json::to_vec(value)?;
        self.stub.put_state(key, Bytes::from(encoded)).await
    }

    /// Invoke another handler and decode its payload as a UTF-8 string.
    pub async fn invoke_string_handler(
        &self,
        name: &str,
        args: &[&str],
        channel: &str,
    ) -> Result<String> {
        let args = args
            .iter()
            .map(|arg| Bytes::copy_from_slice(arg.as_bytes()))
            .collect();
        let payload = self.stub.invoke_handler(name, args, channel).await?;
        Ok(String::from_utf8(payload.to_vec())?)
    }

    /// Invoke another handler and JSON-decode its payload.
    pub async fn invoke_json_handler<T: DeserializeOwned>(
        &self,
        name: &str,
        args: &[&str],
        channel: &str,
    ) -> Result<T> {
        let text = self.invoke_string_handler(name, args, channel).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Encode a composite state key. See [`key::create_composite_key`].
    pub fn create_composite_key<S: AsRef<str>>(
        &self,
        object_type: &str,
        attributes: &[S],
    ) -> Result<String> {
        key::create_composite_key(object_type, attributes)
    }

    /// Issue a rich query, returning a cursor with the chosen value mode.
    pub async fn query(
        &self,
        query: impl Into<RichQuery>,
        mode: ValueMode,
    ) -> Result<QueryCursor> {
        let query = query.into().into_query_string()?;
        let iter = self.stub.get_query_result(&query).await?;
        Ok(QueryCursor::new(iter, mode))
    }

    /// Issue a rich query and count its matches without materializing them.
    pub async fn query_count(&self, query: impl Into<RichQuery>) -> Result<u64> {
        QueryCursor::count(self.stub.as_ref(), query).await
    }
}
