use std::future::Future;

use super::error::DeepLinkError;
use super::link::DeepLink;
use crate::navigation::{NavigationPath, Navigator};

/// What a resolved link asks the navigation stack to do.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkPlan<D, T> {
    /// Replace the path in a single assignment.
    Path(NavigationPath<D>),
    /// Apply target states one after another.
    TargetStates(Vec<T>),
}

/// The plan type for a given navigator.
pub type PlanFor<N> = LinkPlan<<N as Navigator>::Destination, <N as Navigator>::TargetState>;

/// Translates links into navigation plans for one navigator.
pub trait LinkRouter: Send + Sync + 'static {
    type Navigator: Navigator;

    /// Resolve a parsed link.
    ///
    /// May await whatever data is needed to prove the destinations exist.
    /// Nothing is committed until this returns `Ok`.
    fn resolve(
        &self,
        link: &DeepLink,
    ) -> impl Future<Output = Result<PlanFor<Self::Navigator>, DeepLinkError>> + Send;
}
