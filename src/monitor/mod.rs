//! Scene change monitoring.
//!
//! Pollers compare versions; subscribers get pushed one [`SceneEvent`] per
//! committed version through a [`SceneEventStream`].

mod events;
mod feed;
mod stream;

pub use events::{SceneEvent, SceneEventKind, SubscriptionId};
pub use feed::ChangeFeed;
pub use stream::SceneEventStream;
