//! An event-browsing app built on the crate's primitives.
//!
//! The home screen reports taps, searches and selections to
//! [`RootCoordinator`], which loads events through an [`EventService`] and
//! reports upward to the app. The app turns those reports, and inbound deep
//! links, into navigation on a [`RootNavigator`] stack.

mod app;
mod home;
mod links;
mod navigator;
mod root;
mod service;

pub use app::{AppSnapshot, DemoApp};
pub use home::{EventsState, HomeAction, HomeView, HomeViewState};
pub use links::AppLinkRouter;
pub use navigator::{route_root_action, AppDestination, RootNavigator, Screen, StateConfiguration};
pub use root::{RootAction, RootCoordinator, RootState, MAGIC_TAP_COUNT};
pub use service::{sample_events, Event, EventService, MockEventService, ServiceError};
