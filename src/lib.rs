//! Coordinators, action channels and declarative navigation for view trees.
//!
//! A view reports intents on an [`channel::Interface`] owned by its
//! [`coordinator::Coordinator`]. The coordinator interprets them, updates
//! its [`observable::Observable`] state and may declare where navigation
//! should be through a [`navigation::NavigationStack`]. Deep links enter
//! through a [`deeplink::DeepLinkDispatcher`] and end up in the same stack.

pub mod channel;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod deeplink;
pub mod demo;
pub mod logging;
pub mod mvi;
pub mod navigation;
pub mod observable;
pub mod resource;
