//! Index-addressable storage for opaque hooks.
//!
//! Hooks cannot be folded into a compiled procedure the way messages and
//! bounds are, so the compiler files each one here and the procedure keeps
//! only its index. The registry is filled once while compiling and is
//! read-only afterwards, which is what lets concurrent validations share it
//! without locking.

use crate::schema::{CatchFn, FinallyFn, Hook};

/// Hooks registered by one compiled procedure, addressed by index.
///
/// # Example
///
/// ```rust
/// use shapecheck::{Hook, HookRegistry};
/// use serde_json::json;
///
/// let mut registry = HookRegistry::new();
/// let index = registry.register(Hook::catch(|| json!(0)));
///
/// assert_eq!(index, 0);
/// assert!(registry.catch(index).is_some());
/// assert!(registry.finally(index).is_none());
/// ```
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: Vec<Hook>,
}

impl HookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a hook and returns the index the procedure will call it by.
    pub fn register(&mut self, hook: Hook) -> usize {
        self.hooks.push(hook);
        self.hooks.len() - 1
    }

    /// Returns the hook at `index`.
    pub fn get(&self, index: usize) -> Option<&Hook> {
        self.hooks.get(index)
    }

    /// Returns the fallback supplier at `index`, if that slot holds one.
    pub fn catch(&self, index: usize) -> Option<&CatchFn> {
        match self.hooks.get(index) {
            Some(Hook::Catch(f)) => Some(f),
            _ => None,
        }
    }

    /// Returns the transform at `index`, if that slot holds one.
    pub fn finally(&self, index: usize) -> Option<&FinallyFn> {
        match self.hooks.get(index) {
            Some(Hook::Finally(f)) => Some(f),
            _ => None,
        }
    }

    /// Number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// True when no hook has been registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.hooks.iter()).finish()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<HookRegistry>();
    assert_sync::<HookRegistry>();
};
