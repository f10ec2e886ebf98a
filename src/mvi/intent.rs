//! Base trait for actions flowing through an [`Interface`](crate::channel::Interface).

/// Marker trait for action types.
///
/// Actions represent:
/// - User intents reported by a view (button taps, search submissions)
/// - Upward notifications from a child coordinator to its parent
///
/// Actions carry no errors; failures are resolved where the work started.
pub trait Intent: Send + 'static {}
