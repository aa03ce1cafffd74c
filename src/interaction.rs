//! # Component and interaction abstractions.
//!
//! The store never looks inside UI components or interaction payloads. It only
//! needs the `custom_id` string each of them carries:
//! - [`HasCustomId`] for components handed to [`CallbackStore::bind`](crate::CallbackStore::bind);
//! - [`Interaction`] for events returned by a [`Listener`](crate::Listener).

/// A UI component exposing the custom id it was created with.
///
/// The id must not change after the component is bound: the store routes
/// interactions by the id seen at bind time.
pub trait HasCustomId {
    /// Returns the component's custom id.
    fn custom_id(&self) -> &str;
}

impl HasCustomId for String {
    fn custom_id(&self) -> &str {
        self
    }
}

impl HasCustomId for &str {
    fn custom_id(&self) -> &str {
        self
    }
}

impl<T: HasCustomId + ?Sized> HasCustomId for std::sync::Arc<T> {
    fn custom_id(&self) -> &str {
        (**self).custom_id()
    }
}

/// An interaction event delivered by the host platform.
///
/// Routing uses [`custom_id`](Interaction::custom_id) only; whatever else the
/// type carries is passed through to the bound callback untouched.
pub trait Interaction: Send + Sync + 'static {
    /// Custom id of the component that fired.
    fn custom_id(&self) -> &str;
}
