//! Dispatcher - per-transaction entry points and the error boundary.
//!
//! The [`DispatcherBuilder`] provides a fluent API for registering handlers;
//! the built [`Dispatcher`] handles one transaction per call:
//! 1. Ask the host for the function name and positional parameters
//! 2. Resolve the handler (instance tier first, then static)
//! 3. Invoke it with the transaction context
//! 4. Coerce the returned [`Payload`] into wire bytes
//!
//! Every error from any of those steps is caught here, logged, and turned
//! into a failure [`Response`]. Nothing propagates to the host process.
//!
//! # Example
//!
//! ```ignore
//! use ledgershim::{Context, Dispatcher};
//! use ledgershim::payload::Payload;
//!
//! let dispatcher = Dispatcher::builder()
//!     .handle("readAsset", |ctx: Context, args, _fcn| async move {
//!         let value = ctx.get_string_state(&args[0]).await?;
//!         Ok(Payload::from(value))
//!     })
//!     .handle_static("ping", |_ctx, _args, _fcn| async { Ok(Payload::from("pong")) })
//!     .build();
//!
//! let response = dispatcher.invoke(ctx).await;
//! ```

use std::future::Future;

use bytes::Bytes;

use crate::error::{Result, ShimError};
use crate::handler::{Context, HandlerRegistry, HandlerResult};

/// Host-facing success/failure envelope for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The transaction succeeded with the given payload (possibly empty).
    Success {
        /// Wire payload bytes.
        payload: Bytes,
    },
    /// The transaction failed; `message` is surfaced to the submitter.
    Failure {
        /// Human-readable failure message.
        message: String,
    },
}

impl Response {
    /// Success with a payload.
    pub fn success(payload: Bytes) -> Self {
        Self::Success { payload }
    }

    /// Success with no payload.
    pub fn success_empty() -> Self {
        Self::Success {
            payload: Bytes::new(),
        }
    }

    /// Failure with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Whether this is a success response.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The success payload, if any.
    pub fn payload(&self) -> Option<&Bytes> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message } => Some(message),
        }
    }
}

/// Builder for configuring a [`Dispatcher`].
pub struct DispatcherBuilder {
    registry: HandlerRegistry,
}

impl DispatcherBuilder {
    /// Create a new dispatcher builder.
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
        }
    }

    /// Register an instance-tier handler.
    pub fn handle<F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Context, Vec<String>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.registry.register_instance(name, handler);
        self
    }

    /// Register a static-tier handler, shadowed by any instance-tier
    /// handler of the same name.
    pub fn handle_static<F, Fut>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(Context, Vec<String>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.registry.register_static(name, handler);
        self
    }

    /// Build the dispatcher.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            registry: self.registry,
        }
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes transactions to registered handlers and normalizes their results.
///
/// Stateless between transactions: each delivery is an independent,
/// host-isolated invocation, so there is no queueing here.
pub struct Dispatcher {
    registry: HandlerRegistry,
}

impl Dispatcher {
    /// Create a new dispatcher builder.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Build a dispatcher around an already-populated registry.
    pub fn from_registry(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Initialization entry point.
    ///
    /// Always an immediate empty success; mutates nothing. Applications
    /// with real initialization logic layer it above this entry point.
    pub async fn init(&self, _ctx: Context) -> Response {
        Response::success_empty()
    }

    /// Per-transaction dispatch entry point.
    ///
    /// Never fails outward: every error becomes a failure [`Response`]
    /// carrying the error's message.
    pub async fn invoke(&self, ctx: Context) -> Response {
        match self.try_invoke(ctx).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "transaction failed");
                Response::failure(err.to_string())
            }
        }
    }

    async fn try_invoke(&self, ctx: Context) -> Result<Response> {
        let (fcn, params) = ctx.stub().get_function_and_parameters()?;

        let (handler, kind) = self
            .registry
            .resolve(&fcn)
            .ok_or_else(|| ShimError::HandlerNotFound(fcn.clone()))?;
        tracing::debug!(function = %fcn, receiver = ?kind, params = params.len(), "dispatching");

        let payload = handler.call(ctx, params, fcn).await?;
        Ok(Response::success(payload.into_bytes()?))
    }
}
