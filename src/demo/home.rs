//! The home screen: what it shows and what it can report.

use serde::Serialize;

use super::service::{Event, ServiceError};
use crate::channel::ActionSender;
use crate::mvi::{Intent, UiState};
use crate::resource::LoadingState;

pub type EventsState = LoadingState<Vec<Event>, ServiceError>;

/// Intents the home screen reports to its coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    SearchEvents(String),
    ButtonTapped,
    EventSelected(String),
    RefreshPoints,
    SheetDismissed,
}

impl Intent for HomeAction {}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct HomeViewState {
    pub button_tap_count: u32,
    pub is_showing_sheet: bool,
    pub points: EventsState,
    pub search_results: EventsState,
}

impl UiState for HomeViewState {}

/// Description of the home screen derived from coordinator state.
///
/// Holds a publish-only handle to its coordinator's channel; it never
/// handles its own actions.
#[derive(Debug, Clone)]
pub struct HomeView {
    sender: ActionSender<HomeAction>,
    state: HomeViewState,
}

impl HomeView {
    pub fn new(sender: ActionSender<HomeAction>, state: HomeViewState) -> Self {
        Self { sender, state }
    }

    pub fn state(&self) -> &HomeViewState {
        &self.state
    }

    pub fn tap_button(&self) {
        self.sender.publish(HomeAction::ButtonTapped);
    }

    pub fn search(&self, query: impl Into<String>) {
        self.sender.publish(HomeAction::SearchEvents(query.into()));
    }

    pub fn select_event(&self, id: impl Into<String>) {
        self.sender.publish(HomeAction::EventSelected(id.into()));
    }

    pub fn refresh(&self) {
        self.sender.publish(HomeAction::RefreshPoints);
    }

    pub fn dismiss_sheet(&self) {
        self.sender.publish(HomeAction::SheetDismissed);
    }
}
