//! # Callback registry: custom id → callback mapping.
//!
//! ## Architecture
//! ```text
//! bind(c, cb)            ──► "ns:0" → Single(cb)
//! bind_many([a, b], gcb) ──► "ns:1" → Grouped { gcb, index: 0 }
//!                            "ns:2" → Grouped { gcb, index: 1 }
//!
//! dispatcher: contains(id)  (admission predicate, read lock)
//!             get(id)       (clone of the binding, lock released before await)
//! ```
//!
//! ## Rules
//! - Rebinding an id **overwrites** the previous binding (last write wins).
//! - There is no removal; the mapping only grows for the store's lifetime.
//! - The lock is never held across an `.await`.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::callbacks::{BoxCallbackFuture, Callback, GroupCallback};

/// Callback bound to one custom id.
pub(crate) enum Binding<I> {
    /// Callback owned by a single component.
    Single(Arc<dyn Callback<I>>),
    /// Callback shared by a group; `index` is this id's position in the group.
    Grouped {
        callback: Arc<dyn GroupCallback<I>>,
        index: usize,
    },
}

impl<I> Clone for Binding<I> {
    fn clone(&self) -> Self {
        match self {
            Binding::Single(cb) => Binding::Single(Arc::clone(cb)),
            Binding::Grouped { callback, index } => Binding::Grouped {
                callback: Arc::clone(callback),
                index: *index,
            },
        }
    }
}

impl<I: 'static> Binding<I> {
    /// Group index, if this is a group binding.
    pub(crate) fn index(&self) -> Option<usize> {
        match self {
            Binding::Single(_) => None,
            Binding::Grouped { index, .. } => Some(*index),
        }
    }

    /// Creates the callback future for `inter`.
    pub(crate) fn invoke(&self, inter: I) -> BoxCallbackFuture {
        match self {
            Binding::Single(cb) => cb.call(inter),
            Binding::Grouped { callback, index } => callback.call(*index, inter),
        }
    }
}

/// Thread-safe mapping of custom ids to callbacks.
pub(crate) struct CallbackRegistry<I> {
    callbacks: RwLock<HashMap<String, Binding<I>>>,
}

impl<I> CallbackRegistry<I> {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self {
            callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Binds `callback` to `custom_id`.
    ///
    /// Returns `true` if a previous binding was overwritten.
    pub(crate) fn insert(&self, custom_id: String, binding: Binding<I>) -> bool {
        let mut callbacks = self
            .callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        callbacks.insert(custom_id, binding).is_some()
    }

    /// True if a callback is bound to `custom_id`.
    pub(crate) fn contains(&self, custom_id: &str) -> bool {
        self.callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(custom_id)
    }

    /// Returns a clone of the binding for `custom_id`.
    pub(crate) fn get(&self, custom_id: &str) -> Option<Binding<I>> {
        self.callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(custom_id)
            .cloned()
    }

    /// Number of bound ids.
    pub(crate) fn len(&self) -> usize {
        self.callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns sorted list of bound ids.
    pub(crate) fn ids(&self) -> Vec<String> {
        let callbacks = self
            .callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<String> = callbacks.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{CallbackFn, GroupFn};
    use crate::error::CallbackError;

    fn single(tag: &'static str) -> Binding<String> {
        Binding::Single(Arc::new(CallbackFn::new(move |inter: String| async move {
            if inter == tag {
                Ok(())
            } else {
                Err(CallbackError::fail(format!("{tag} got {inter}")))
            }
        })))
    }

    #[tokio::test]
    async fn test_rebinding_overwrites() {
        let reg = CallbackRegistry::new();
        assert!(!reg.insert("ns:0".into(), single("first")));
        assert!(reg.insert("ns:0".into(), single("second")));
        assert_eq!(reg.len(), 1);

        let binding = reg.get("ns:0").unwrap();
        assert!(binding.invoke("second".into()).await.is_ok());
        assert!(binding.invoke("first".into()).await.is_err());
    }

    #[tokio::test]
    async fn test_grouped_binding_carries_index() {
        let reg = CallbackRegistry::<String>::new();
        let group: Arc<dyn GroupCallback<String>> =
            Arc::new(GroupFn::new(|index: usize, inter: String| async move {
                if inter == format!("#{index}") {
                    Ok(())
                } else {
                    Err(CallbackError::fail("index mismatch"))
                }
            }));
        for (index, id) in ["ns:a", "ns:b", "ns:c"].into_iter().enumerate() {
            reg.insert(
                id.into(),
                Binding::Grouped {
                    callback: group.clone(),
                    index,
                },
            );
        }

        let b = reg.get("ns:b").unwrap();
        assert_eq!(b.index(), Some(1));
        assert!(b.invoke("#1".into()).await.is_ok());
        assert_eq!(reg.ids(), vec!["ns:a", "ns:b", "ns:c"]);
    }

    #[test]
    fn test_contains_and_missing() {
        let reg = CallbackRegistry::new();
        reg.insert("ns:0".into(), single("x"));
        assert!(reg.contains("ns:0"));
        assert!(!reg.contains("ns:1"));
        assert!(reg.get("ns:1").is_none());
    }
}
