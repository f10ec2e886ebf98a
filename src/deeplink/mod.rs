//! Deep link dispatch.
//!
//! An inbound URL is parsed into a [`DeepLink`], resolved by a
//! [`LinkRouter`] into a [`LinkPlan`] (possibly awaiting data to validate
//! it), and only then committed to a mounted navigation stack. A link that
//! fails at any step leaves navigation untouched.

mod dispatcher;
mod error;
mod link;
mod router;

pub use dispatcher::{DeepLinkDispatcher, LinkOutcome};
pub use error::DeepLinkError;
pub use link::DeepLink;
pub use router::{LinkPlan, LinkRouter, PlanFor};
