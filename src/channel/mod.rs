//! Typed, single-consumer action channels.
//!
//! A coordinator owns an [`Interface`] and hands its view an
//! [`ActionSender`]. Exactly one observer consumes the actions: either a
//! [`ChannelObserver`] running the handler inline, or an
//! [`AsyncChannelObserver`] spawning one task per action.

mod error;
mod interface;
mod observer;

pub use error::ChannelError;
pub use interface::{ActionSender, ChannelId, DuplicatePolicy, Interface, Subscription};
pub use observer::{AsyncChannelObserver, ChannelObserver};
