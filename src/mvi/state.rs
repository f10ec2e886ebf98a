//! Base trait for view state.

/// Marker trait for state a view is derived from.
///
/// States should be:
/// - Cheap to clone (views receive snapshots, never references into a coordinator)
/// - Self-contained (all data needed to describe the view)
/// - Comparable (PartialEq so hosts can skip re-derivation when nothing changed)
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
