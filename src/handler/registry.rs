//! Handler registry for dispatching transactions by function name.
//!
//! The registry keeps two tiers of handlers, mirroring instance methods and
//! static methods on an application's handler set. Resolution checks the
//! instance tier first, then the static tier, by exact name - no fuzzy
//! matching, no case folding. That exact-match lookup is a deliberate
//! simplicity contract.

use std::collections::HashMap;
use std::future::Future;

use super::Context;
use crate::error::Result;
use crate::payload::Payload;
use crate::stub::BoxFuture;

/// Result type for handler functions.
pub type HandlerResult = Result<Payload>;

/// Which tier a handler was registered (and resolved) in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiverKind {
    /// Instance-tier handler; conceptually bound to the application's
    /// handler object.
    Instance,
    /// Static-tier handler; a free function with no receiver.
    Static,
}

/// Trait for transaction handlers.
pub trait Handler: Send + Sync {
    /// Handle one transaction, given the per-transaction context, the
    /// positional parameters, and the function name it was dispatched as.
    fn call(&self, ctx: Context, args: Vec<String>, fcn: String)
        -> BoxFuture<'static, HandlerResult>;
}

/// Adapter turning an async closure into a [`Handler`].
pub struct FnHandler<F> {
    handler: F,
}

impl<F> FnHandler<F> {
    /// Wrap an async closure.
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Context, Vec<String>, String) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(
        &self,
        ctx: Context,
        args: Vec<String>,
        fcn: String,
    ) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self.handler)(ctx, args, fcn))
    }
}

/// Two-tier registry mapping function names to handlers.
pub struct HandlerRegistry {
    /// Instance-tier handlers, resolved first.
    instance: HashMap<String, Box<dyn Handler>>,
    /// Static-tier handlers, resolved second.
    statics: HashMap<String, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            instance: HashMap::new(),
            statics: HashMap::new(),
        }
    }

    /// Register an instance-tier handler.
    ///
    /// Re-registering a name replaces the previous handler in that tier.
    pub fn register_instance<F, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(Context, Vec<String>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.instance
            .insert(name.to_string(), Box::new(FnHandler::new(handler)));
    }

    /// Register a static-tier handler.
    pub fn register_static<F, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(Context, Vec<String>, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.statics
            .insert(name.to_string(), Box::new(FnHandler::new(handler)));
    }

    /// Resolve a handler by exact function name, instance tier first.
    pub fn resolve(&self, name: &str) -> Option<(&dyn Handler, ReceiverKind)> {
        if let Some(handler) = self.instance.get(name) {
            return Some((handler.as_ref(), ReceiverKind::Instance));
        }
        self.statics
            .get(name)
            .map(|handler| (handler.as_ref(), ReceiverKind::Static))
    }

    /// Whether any tier has a handler for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.instance.contains_key(name) || self.statics.contains_key(name)
    }

    /// Number of registered handlers across both tiers.
    pub fn len(&self) -> usize {
        self.instance.len() + self.statics.len()
    }

    /// True when no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.instance.is_empty() && self.statics.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
