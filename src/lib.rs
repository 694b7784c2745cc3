//! # ledgershim
//!
//! Dispatch and identity-resolution layer between a ledger-transaction host
//! runtime and application-defined business handlers.
//!
//! The host authenticates and delivers transactions; this crate resolves the
//! submitter's identity from their X.509 credential, routes the call to the
//! right handler by function name, and normalizes the handler's return value
//! into a wire payload. On stores with rich query support it also wraps the
//! host's result iterator in a paginated cursor.
//!
//! ## Architecture
//!
//! - **Host boundary** ([`stub`]): the opaque primitives the runtime
//!   supplies, behind the [`LedgerStub`](stub::LedgerStub) trait
//! - **Identity** ([`identity`]): credential PEM to a stable
//!   `(subject_id, issuer_id)` fingerprint pair
//! - **Dispatch** ([`dispatch`], [`handler`]): two-tier handler registry,
//!   per-transaction [`Context`], single error boundary
//! - **Cursors** ([`cursor`]): lazy iteration, eager materialization, and a
//!   drain-and-count mode over query results
//!
//! ## Example
//!
//! ```ignore
//! use ledgershim::{Context, Dispatcher, Payload};
//!
//! let dispatcher = Dispatcher::builder()
//!     .handle("whoami", |ctx: Context, _args, _fcn| async move {
//!         let id = ctx.creator_identity().await?;
//!         Ok(Payload::from(id.subject_id().to_string()))
//!     })
//!     .build();
//!
//! // per transaction delivery:
//! let response = dispatcher.invoke(ctx).await;
//! ```

pub mod cursor;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod identity;
pub mod key;
pub mod mock;
pub mod payload;
pub mod stub;

pub use dispatch::{Dispatcher, DispatcherBuilder, Response};
pub use error::{Result, ShimError};
pub use handler::{Context, HandlerRegistry};
pub use identity::Identity;
pub use payload::Payload;
