//! Paginated cursor over rich query results.
//!
//! [`QueryCursor`] wraps the host's remote iterator primitive
//! ([`QueryIter`](crate::stub::QueryIter)) and exposes:
//!
//! - [`advance`](QueryCursor::advance) - single-step iteration; once the
//!   iterator reports done, further calls return `None` without contacting
//!   the remote side
//! - [`collect_all`](QueryCursor::collect_all) - eager materialization in
//!   retrieval order; unbounded in memory, use only when the query bounds
//!   the result set
//! - [`count`](QueryCursor::count) - static drain mode that bypasses record
//!   construction entirely and just counts items
//!
//! Value materialization is a configuration choice, not two cursor types:
//! [`ValueMode::Raw`] yields the decoded value string, [`ValueMode::Json`]
//! parses it as JSON.
//!
//! An iterator that never reports done iterates forever; bounding the query
//! is the caller's responsibility.

use serde_json::Value;

use crate::error::Result;
use crate::stub::{LedgerStub, QueryIter, RawRecord};

/// How a cursor materializes record values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMode {
    /// Yield the value as a decoded UTF-8 string.
    Raw,
    /// Parse the value as JSON.
    Json,
}

/// A materialized record value.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// Decoded string value ([`ValueMode::Raw`]).
    Text(String),
    /// Parsed JSON value ([`ValueMode::Json`]).
    Json(Value),
}

/// One query match, materialized per the cursor's [`ValueMode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Namespace the key lives in.
    pub namespace: String,
    /// Full state key of the match.
    pub key: String,
    /// Materialized value.
    pub value: RecordValue,
}

/// A rich query in either of the host's accepted forms.
#[derive(Debug, Clone, PartialEq)]
pub enum RichQuery {
    /// Pre-rendered query expression string.
    Expression(String),
    /// Structured selector, serialized to JSON on use.
    Selector(Value),
}

impl RichQuery {
    /// Render the query string handed to the host.
    pub fn into_query_string(self) -> Result<String> {
        match self {
            Self::Expression(expr) => Ok(expr),
            Self::Selector(selector) => Ok(serde_json::to_string(&selector)?),
        }
    }
}

impl From<&str> for RichQuery {
    fn from(expr: &str) -> Self {
        Self::Expression(expr.to_string())
    }
}

impl From<String> for RichQuery {
    fn from(expr: String) -> Self {
        Self::Expression(expr)
    }
}

impl From<Value> for RichQuery {
    fn from(selector: Value) -> Self {
        Self::Selector(selector)
    }
}

/// Lazily streams query matches from a remote iterator.
///
/// Owns its exhaustion flag exclusively; a cursor must be driven by one
/// logical task only.
pub struct QueryCursor {
    iter: Box<dyn QueryIter>,
    mode: ValueMode,
    done: bool,
}

impl QueryCursor {
    /// Wrap a remote iterator with the given value materialization mode.
    pub fn new(iter: Box<dyn QueryIter>, mode: ValueMode) -> Self {
        Self {
            iter,
            mode,
            done: false,
        }
    }

    /// True once the remote iterator has reported done. Terminal: never
    /// resets.
    pub fn is_exhausted(&self) -> bool {
        self.done
    }

    /// Fetch the next record, if any.
    ///
    /// After exhaustion this returns `None` without contacting the remote
    /// iterator. A step may carry no value (notably the final done step);
    /// that also yields `None`.
    pub async fn advance(&mut self) -> Result<Option<Record>> {
        if self.done {
            return Ok(None);
        }
        let item = self.iter.next().await?;
        self.done = item.done;
        match item.value {
            Some(raw) => Ok(Some(self.materialize(raw)?)),
            None => Ok(None),
        }
    }

    /// Drain the cursor, collecting every record in retrieval order.
    pub async fn collect_all(&mut self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while !self.done {
            if let Some(record) = self.advance().await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Issue `query` and count its matches without materializing values.
    ///
    /// Drives the remote iterator directly, counting every carried item -
    /// including one carried by the final done response.
    pub async fn count(stub: &dyn LedgerStub, query: impl Into<RichQuery>) -> Result<u64> {
        let query = query.into().into_query_string()?;
        let mut iter = stub.get_query_result(&query).await?;

        let mut total = 0u64;
        loop {
            let item = iter.next().await?;
            if item.value.is_some() {
                total += 1;
            }
            if item.done {
                break;
            }
        }
        Ok(total)
    }

    /// Issue `query` and eagerly collect every match.
    pub async fn collect(
        stub: &dyn LedgerStub,
        query: impl Into<RichQuery>,
        mode: ValueMode,
    ) -> Result<Vec<Record>> {
        let query = query.into().into_query_string()?;
        let iter = stub.get_query_result(&query).await?;
        let mut cursor = Self::new(iter, mode);
        cursor.collect_all().await
    }

    fn materialize(&self, raw: RawRecord) -> Result<Record> {
        let value = match self.mode {
            ValueMode::Raw => RecordValue::Text(String::from_utf8(raw.value.to_vec())?),
            ValueMode::Json => RecordValue::Json(serde_json::from_slice(&raw.value)?),
        };
        Ok(Record {
            namespace: raw.namespace,
            key: raw.key,
            value,
        })
    }
}
