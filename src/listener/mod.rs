//! Interaction sources: the listener contract and an in-process feed.
//!
//! ## Contents
//! - [`Listener`] async "wait for the next admitted interaction" contract
//! - [`InteractionFeed`], [`FeedListener`] broadcast-backed implementation shared by many stores

mod feed;
#[allow(clippy::module_inception)]
mod listener;

pub use feed::{FeedListener, InteractionFeed};
pub use listener::{Admission, Listener};
