//! Navigation for the demo app.

use serde::Serialize;

use super::root::RootAction;
use crate::navigation::{NavigationPath, NavigationStack, Navigator};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "destination", content = "id", rename_all = "snake_case")]
pub enum AppDestination {
    Page,
    Events,
    EventDetail(String),
}

/// Where the app should be, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateConfiguration {
    Reset,
    ShowPage,
    ShowEvents,
    ShowEvent(String),
    /// Presented as an overlay; the path stays where it is.
    ShowDeletionConfirmation,
}

/// What the host renders for a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Home,
    Page,
    EventList,
    EventDetail { id: String },
}

#[derive(Debug, Default)]
pub struct RootNavigator;

impl Navigator for RootNavigator {
    type Destination = AppDestination;
    type TargetState = StateConfiguration;
    type View = Screen;

    fn root_view(&self) -> Screen {
        Screen::Home
    }

    fn destination_view(&self, destination: &AppDestination) -> Screen {
        match destination {
            AppDestination::Page => Screen::Page,
            AppDestination::Events => Screen::EventList,
            AppDestination::EventDetail(id) => Screen::EventDetail { id: id.clone() },
        }
    }

    fn target_path(&self, state: &StateConfiguration) -> Option<NavigationPath<AppDestination>> {
        match state {
            StateConfiguration::Reset => Some(NavigationPath::new()),
            StateConfiguration::ShowPage => Some(vec![AppDestination::Page].into()),
            StateConfiguration::ShowEvents => Some(vec![AppDestination::Events].into()),
            StateConfiguration::ShowEvent(id) => Some(
                vec![AppDestination::Events, AppDestination::EventDetail(id.clone())].into(),
            ),
            StateConfiguration::ShowDeletionConfirmation => None,
        }
    }
}

/// Turn a report from the root coordinator into navigation.
pub fn route_root_action(stack: &NavigationStack<RootNavigator>, action: RootAction) {
    let target = match action {
        RootAction::DidReachFortyTwo => StateConfiguration::ShowPage,
        RootAction::DidSelectEvent(id) => StateConfiguration::ShowEvent(id),
    };
    stack.apply_target_state(target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NavigationConfig;

    #[test]
    fn every_destination_has_a_view() {
        let navigator = RootNavigator;
        let all = [
            AppDestination::Page,
            AppDestination::Events,
            AppDestination::EventDetail("1".to_string()),
        ];
        let screens: Vec<Screen> = all.iter().map(|d| navigator.destination_view(d)).collect();
        assert_eq!(
            screens,
            vec![
                Screen::Page,
                Screen::EventList,
                Screen::EventDetail {
                    id: "1".to_string()
                }
            ]
        );
    }

    #[test]
    fn selected_event_opens_detail() {
        let stack = NavigationStack::new(RootNavigator, &NavigationConfig::default());
        route_root_action(&stack, RootAction::DidSelectEvent("12".to_string()));
        assert_eq!(
            stack.views(),
            vec![
                Screen::Home,
                Screen::EventList,
                Screen::EventDetail {
                    id: "12".to_string()
                }
            ]
        );

        route_root_action(&stack, RootAction::DidReachFortyTwo);
        assert_eq!(stack.path(), NavigationPath::from(vec![AppDestination::Page]));
    }

    #[test]
    fn deletion_confirmation_keeps_path() {
        let stack = NavigationStack::new(RootNavigator, &NavigationConfig::default());
        stack.apply_target_state(StateConfiguration::ShowEvents);
        stack.apply_target_state(StateConfiguration::ShowDeletionConfirmation);
        assert_eq!(stack.depth(), 1);
    }
}
