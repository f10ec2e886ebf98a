//! The root coordinator of the demo app.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use super::home::{HomeAction, HomeView, HomeViewState};
use super::navigator::RootNavigator;
use super::service::{sample_events, Event, EventService, ServiceError};
use crate::channel::{ActionSender, DuplicatePolicy, Interface};
use crate::coordinator::{Coordinator, NavigationPattern};
use crate::mvi::{Intent, Reducer};
use crate::navigation::{ChildStack, NavigationStack};
use crate::observable::Observable;
use crate::resource::{Resource, ResourceIntent, ResourceReducer};

/// Tap count at which the root presents its sheet.
pub const MAGIC_TAP_COUNT: u32 = 42;

type EventsResource = Resource<Vec<Event>, ServiceError>;
type EventsReducer = ResourceReducer<Vec<Event>, ServiceError>;

/// What the root coordinator reports to whoever composed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootAction {
    DidReachFortyTwo,
    DidSelectEvent(String),
}

impl Intent for RootAction {}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RootState {
    pub button_tap_count: u32,
    pub is_showing_sheet: bool,
    pub points: EventsResource,
    pub search_results: EventsResource,
}

impl RootState {
    /// Starting state: no taps, and the sample events already loaded.
    pub fn seeded() -> Self {
        Self {
            points: Resource::with_value(sample_events()),
            ..Self::default()
        }
    }
}

pub struct RootCoordinator<S> {
    interface: Interface<HomeAction>,
    parent: ActionSender<RootAction>,
    service: Arc<S>,
    state: Observable<RootState>,
    child: Option<ChildStack>,
}

impl<S: EventService> RootCoordinator<S> {
    pub fn new(service: Arc<S>, parent: ActionSender<RootAction>, policy: DuplicatePolicy) -> Self {
        Self {
            interface: Interface::with_policy(policy),
            parent,
            service,
            state: Observable::new(RootState::seeded()),
            child: None,
        }
    }

    /// Compose a navigation stack beneath the root's entry view.
    pub fn with_child_stack(mut self, stack: Arc<NavigationStack<RootNavigator>>) -> Self {
        self.child = Some(ChildStack::new(stack));
        self
    }

    pub fn state(&self) -> RootState {
        self.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    fn reduce(resource: &mut EventsResource, intent: ResourceIntent<Vec<Event>, ServiceError>) {
        *resource = EventsReducer::reduce(std::mem::take(resource), intent);
    }

    async fn search(&self, query: String) {
        self.state
            .update(|state| Self::reduce(&mut state.search_results, ResourceIntent::Begin));
        tracing::debug!(query = %query, "Searching events");

        let result = self.service.search_events(&query).await;
        if let Err(err) = &result {
            tracing::warn!(query = %query, error = %err, "Event search failed");
        }
        self.state.update(|state| {
            Self::reduce(&mut state.search_results, ResourceIntent::Resolve(result))
        });
    }

    async fn refresh_points(&self) {
        self.state
            .update(|state| Self::reduce(&mut state.points, ResourceIntent::BeginRetaining));

        let result = self.service.events().await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Loading points failed");
        }
        self.state
            .update(|state| Self::reduce(&mut state.points, ResourceIntent::Resolve(result)));
    }

    fn tap(&self) {
        let mut reached = false;
        self.state.update(|state| {
            state.button_tap_count += 1;
            if state.button_tap_count == MAGIC_TAP_COUNT {
                state.is_showing_sheet = true;
                reached = true;
            }
        });

        // Published outside the state update so the parent may read state.
        if reached {
            tracing::info!(taps = MAGIC_TAP_COUNT, "Tap goal reached");
            self.parent.publish(RootAction::DidReachFortyTwo);
        }
    }
}

impl<S: EventService> Coordinator for RootCoordinator<S> {
    type Action = HomeAction;
    type View = HomeView;

    fn interface(&self) -> &Interface<HomeAction> {
        &self.interface
    }

    fn entry_view(&self) -> HomeView {
        let state = self.state.with(|state| HomeViewState {
            button_tap_count: state.button_tap_count,
            is_showing_sheet: state.is_showing_sheet,
            points: state.points.state().clone(),
            search_results: state.search_results.state().clone(),
        });
        HomeView::new(self.interface.sender(), state)
    }

    /// The sheet covers the child stack while it is presented.
    fn navigation(&self) -> NavigationPattern {
        let is_presented = self.state.with(|state| state.is_showing_sheet);
        match &self.child {
            Some(child) if !is_presented => NavigationPattern::Navigator(child.clone()),
            _ => NavigationPattern::Sheet { is_presented },
        }
    }

    fn handle(&self, action: HomeAction) -> impl Future<Output = ()> + Send {
        async move {
            match action {
                HomeAction::SearchEvents(query) => self.search(query).await,
                HomeAction::RefreshPoints => self.refresh_points().await,
                HomeAction::ButtonTapped => self.tap(),
                HomeAction::EventSelected(id) => {
                    self.parent.publish(RootAction::DidSelectEvent(id));
                }
                HomeAction::SheetDismissed => {
                    self.state.update(|state| state.is_showing_sheet = false);
                }
            }
        }
    }
}
