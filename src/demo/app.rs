//! Wires the demo coordinators, navigator and link dispatcher together.

use std::sync::Arc;

use serde::Serialize;

use super::home::HomeView;
use super::links::AppLinkRouter;
use super::navigator::{route_root_action, AppDestination, RootNavigator, Screen};
use super::root::{RootAction, RootCoordinator, RootState};
use super::service::EventService;
use crate::channel::Interface;
use crate::config::Config;
use crate::coordinator::{mount, CoordinatorError, Mounted, NavigationPattern};
use crate::deeplink::DeepLinkDispatcher;
use crate::navigation::{NavigationPath, NavigationStack};

/// Everything a host would render, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppSnapshot {
    pub state: RootState,
    pub sheet_presented: bool,
    pub path: NavigationPath<AppDestination>,
    pub screens: Vec<Screen>,
}

pub struct DemoApp<S: EventService> {
    root: Mounted<RootCoordinator<S>>,
    /// Receives the root coordinator's reports; kept alive for its senders.
    _root_events: Interface<RootAction>,
    stack: Arc<NavigationStack<RootNavigator>>,
    links: DeepLinkDispatcher<AppLinkRouter<S>>,
}

impl<S: EventService> DemoApp<S> {
    /// Build and mount the app. Must run inside a tokio runtime.
    pub fn launch(service: Arc<S>, config: &Config) -> Result<Self, CoordinatorError> {
        let stack = Arc::new(NavigationStack::new(RootNavigator, &config.navigation));

        let weak_stack = Arc::downgrade(&stack);
        let root_events = Interface::consume(move |action: RootAction| {
            if let Some(stack) = weak_stack.upgrade() {
                route_root_action(&stack, action);
            }
        });

        let root = mount(
            RootCoordinator::new(
                Arc::clone(&service),
                root_events.sender(),
                config.channel.duplicate_observer.policy(),
            )
            .with_child_stack(Arc::clone(&stack)),
            &config.tasks,
        )?;

        let links = DeepLinkDispatcher::new(AppLinkRouter::new(service), &config.deep_link);
        links.mount(Arc::clone(&stack));

        tracing::info!(scheme = %config.deep_link.scheme, "Demo app launched");

        Ok(Self {
            root,
            _root_events: root_events,
            stack,
            links,
        })
    }

    pub fn home(&self) -> HomeView {
        self.root.entry_view()
    }

    pub fn root(&self) -> &Mounted<RootCoordinator<S>> {
        &self.root
    }

    pub fn stack(&self) -> &Arc<NavigationStack<RootNavigator>> {
        &self.stack
    }

    pub fn links(&self) -> &DeepLinkDispatcher<AppLinkRouter<S>> {
        &self.links
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.stack.views()
    }

    /// Wait until every action handler spawned so far has finished.
    pub async fn settle(&self) {
        self.root.tasks().wait_idle().await;
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let sheet_presented = matches!(
            self.root.navigation(),
            NavigationPattern::Sheet { is_presented: true }
        );
        AppSnapshot {
            state: self.root.coordinator().state(),
            sheet_presented,
            path: self.stack.path(),
            screens: self.screens(),
        }
    }
}
