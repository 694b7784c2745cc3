//! Handler module - transaction context and handler registration.
//!
//! Provides:
//! - [`Context`] - per-transaction adapter over the host stub with typed
//!   state accessors
//! - [`HandlerRegistry`] - two-tier (instance, then static) name-to-handler
//!   mapping
//!
//! # Example
//!
//! ```ignore
//! use ledgershim::handler::{Context, HandlerRegistry};
//! use ledgershim::payload::Payload;
//!
//! let mut registry = HandlerRegistry::new();
//!
//! registry.register_instance("readAsset", |ctx: Context, args, _fcn| async move {
//!     let value = ctx.get_string_state(&args[0]).await?;
//!     Ok(Payload::from(value))
//! });
//! ```

mod context;
mod registry;

pub use context::Context;
pub use registry::{FnHandler, Handler, HandlerRegistry, HandlerResult, ReceiverKind};
