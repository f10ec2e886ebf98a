use std::fmt::Debug;
use std::hash::Hash;

use super::path::NavigationPath;

/// A value-equatable destination descriptor.
///
/// Implement this for a closed `enum` so every variant carries its own data
/// and [`Navigator::destination_view`] can match exhaustively.
pub trait Destination: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Destination for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// The mapping half of a navigation stack: what to render for each
/// destination and which path each declarative target state means.
pub trait Navigator: Send + Sync + 'static {
    type Destination: Destination;
    /// Named navigation intents, e.g. "reset" or "show event 42".
    type TargetState: Clone + PartialEq + Debug + Send + Sync + 'static;
    type View;

    fn root_view(&self) -> Self::View;

    /// Content for one destination. Implementations match on every variant
    /// without a wildcard arm so a new destination fails to compile until
    /// it is handled.
    fn destination_view(&self, destination: &Self::Destination) -> Self::View;

    /// The path a target state stands for.
    ///
    /// `None` means the intent does not change the path (for example an
    /// overlay confirmation). The result must depend only on `state`, which
    /// makes applying the same state twice idempotent.
    fn target_path(&self, state: &Self::TargetState) -> Option<NavigationPath<Self::Destination>>;
}
