//! Escape-hatch hooks: `catch` fallbacks and `finally` transforms.
//!
//! Hooks are opaque callables. The compiler never inspects them; it stores
//! them in the validator's hook registry and the procedure invokes them by
//! index, awaiting each one before moving on to the next check.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde_json::Value;

/// Supplies a replacement value for an absent or invalid field.
pub type CatchFn = Arc<dyn Fn() -> BoxFuture<'static, Value> + Send + Sync>;

/// Post-processes a valid field; the returned value replaces it.
pub type FinallyFn = Arc<dyn Fn(Value, ErrorSink) -> BoxFuture<'static, Value> + Send + Sync>;

/// A hook stored on a schema node.
#[derive(Clone)]
pub enum Hook {
    /// Fallback used instead of recording an error.
    Catch(CatchFn),
    /// Transform run after the node validated.
    Finally(FinallyFn),
}

impl Hook {
    /// Wraps a synchronous fallback supplier.
    pub fn catch<F>(supplier: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Hook::Catch(Arc::new(move || futures::future::ready(supplier()).boxed()))
    }

    /// Wraps an asynchronous fallback supplier.
    pub fn catch_async<F, Fut>(supplier: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        Hook::Catch(Arc::new(move || supplier().boxed()))
    }

    /// Wraps a synchronous transform.
    pub fn finally<F>(transform: F) -> Self
    where
        F: Fn(Value, &ErrorSink) -> Value + Send + Sync + 'static,
    {
        Hook::Finally(Arc::new(move |value, sink| {
            futures::future::ready(transform(value, &sink)).boxed()
        }))
    }

    /// Wraps an asynchronous transform.
    pub fn finally_async<F, Fut>(transform: F) -> Self
    where
        F: Fn(Value, ErrorSink) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        Hook::Finally(Arc::new(move |value, sink| transform(value, sink).boxed()))
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Hook::Catch(_) => "catch",
            Hook::Finally(_) => "finally",
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook::{}(..)", self.name())
    }
}

/// Handle a `finally` transform uses to report errors.
///
/// Every pushed message becomes an error at the field's path once the
/// transform has finished. The handle is cheap to clone and can be moved
/// into async blocks.
#[derive(Clone, Default)]
pub struct ErrorSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl ErrorSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Reports an error for the field being transformed.
    pub fn push(&self, message: impl Into<String>) {
        self.messages.lock().push(message.into());
    }

    /// Number of messages reported so far.
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// True when nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub(crate) fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSink")
            .field("messages", &*self.messages.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sync_catch_is_ready() {
        let Hook::Catch(f) = Hook::catch(|| json!(7)) else {
            panic!("expected catch hook");
        };
        assert_eq!(futures::executor::block_on(f()), json!(7));
    }

    #[test]
    fn test_finally_reports_through_sink() {
        let Hook::Finally(f) = Hook::finally(|value, errors| {
            errors.push("rejected");
            value
        }) else {
            panic!("expected finally hook");
        };

        let sink = ErrorSink::new();
        let out = futures::executor::block_on(f(json!("x"), sink.clone()));
        assert_eq!(out, json!("x"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.drain(), vec!["rejected".to_string()]);
        assert!(sink.is_empty());
    }
}
