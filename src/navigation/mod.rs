//! Path-based navigation.
//!
//! A [`NavigationStack`] keeps two representations in step: the declared
//! [`NavigationPath`] (the single source of truth) and the
//! [`PlatformStack`] of frames a host actually shows. Every mutation of
//! the path is followed by an explicit reconciliation that yields the
//! [`StackDiff`] the host must apply. Back navigation reported by the
//! host truncates both and is never undone.

mod child;
mod navigator;
mod path;
mod platform;
mod stack;

pub use child::{ChildStack, StackHandle};
pub use navigator::{Destination, Navigator};
pub use path::NavigationPath;
pub use platform::{Frame, FrameId, PlatformStack, StackDiff};
pub use stack::NavigationStack;
