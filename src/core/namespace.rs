//! # Namespaced custom id allocation.
//!
//! Every store owns a random [`Namespace`]; all ids it hands out look like
//! `<namespace>:<suffix>`. Stores fed from the same interaction source never
//! route each other's interactions because their prefixes differ.
//!
//! ```text
//! make_id()                  → "4f1c2a9e0b7d6c35:0", "4f1c2a9e0b7d6c35:1", ...
//! make_id_with(["page", "3"]) → "4f1c2a9e0b7d6c35:page:3"
//! strip_id("4f1c…:page:3")    → "page:3"
//! strip_id("ffff…:0")         → "ffff…:0"   (foreign id, unchanged)
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

/// Separator between the namespace and each suffix part.
pub const SEPARATOR: char = ':';

/// Process-unique prefix identifying one store's ids.
///
/// Random namespaces are 8 random bytes, hex encoded (16 chars).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Namespace(Arc<str>);

impl Namespace {
    /// Creates a fresh random namespace.
    pub fn random() -> Self {
        let token: u64 = rand::rng().random();
        Self(format!("{token:016x}").into())
    }

    /// Uses `value` verbatim as the namespace.
    ///
    /// The caller is responsible for keeping it unique among stores sharing a source.
    pub fn new(value: impl Into<Arc<str>>) -> Self {
        Self(value.into())
    }

    /// Returns the namespace string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shared handle to the namespace string (for events).
    pub(crate) fn shared(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Allocates custom ids under one [`Namespace`].
///
/// The anonymous counter is atomic, so concurrent callers never receive the
/// same id.
#[derive(Debug)]
pub struct IdAllocator {
    namespace: Namespace,
    counter: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator starting at suffix `0`.
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            counter: AtomicU64::new(0),
        }
    }

    /// The namespace ids are allocated under.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns `namespace:N` and post-increments `N`.
    pub fn make_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{SEPARATOR}{n}", self.namespace)
    }

    /// Returns `namespace:part1:part2:…`.
    ///
    /// With no parts, behaves like [`make_id`](Self::make_id). Uniqueness among
    /// custom parts is the caller's concern.
    pub fn make_id_with<P, S>(&self, parts: P) -> String
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parts = parts.into_iter().peekable();
        if parts.peek().is_none() {
            return self.make_id();
        }

        let mut id = String::from(self.namespace.as_str());
        for part in parts {
            id.push(SEPARATOR);
            id.push_str(part.as_ref());
        }
        id
    }

    /// Removes `namespace:` from `custom_id`.
    ///
    /// Ids from other namespaces are returned unchanged.
    pub fn strip_id<'a>(&self, custom_id: &'a str) -> &'a str {
        custom_id
            .strip_prefix(self.namespace.as_str())
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .unwrap_or(custom_id)
    }

    /// True if `custom_id` carries this namespace's prefix.
    pub fn owns_id(&self, custom_id: &str) -> bool {
        custom_id
            .strip_prefix(self.namespace.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }
}
