mod common;

use proptest::prelude::*;
use waypoint::config::NavigationConfig;
use waypoint::demo::{AppDestination, RootNavigator, Screen, StateConfiguration};
use waypoint::navigation::{NavigationPath, NavigationStack};

fn destination() -> impl Strategy<Value = AppDestination> {
    prop_oneof![
        Just(AppDestination::Page),
        Just(AppDestination::Events),
        "[0-9]{1,3}".prop_map(AppDestination::EventDetail),
    ]
}

fn target_state() -> impl Strategy<Value = StateConfiguration> {
    prop_oneof![
        Just(StateConfiguration::Reset),
        Just(StateConfiguration::ShowPage),
        Just(StateConfiguration::ShowEvents),
        "[0-9]{1,3}".prop_map(StateConfiguration::ShowEvent),
        Just(StateConfiguration::ShowDeletionConfirmation),
    ]
}

fn stack() -> NavigationStack<RootNavigator> {
    NavigationStack::new(RootNavigator, &NavigationConfig::default())
}

proptest! {
    #[test]
    fn platform_pop_keeps_exact_prefix(
        path in prop::collection::vec(destination(), 1..10),
        cut in any::<prop::sample::Index>(),
    ) {
        let stack = stack();
        stack.set_path(NavigationPath::from(path.clone()));
        let k = cut.index(path.len());

        prop_assert!(stack.platform_popped_to(k));
        let current = stack.path();
        prop_assert_eq!(current.as_slice(), &path[..k]);
        prop_assert_eq!(stack.platform_stack().to_path(), stack.path());
    }

    #[test]
    fn applying_a_target_state_twice_is_idempotent(
        before in prop::collection::vec(target_state(), 0..4),
        state in target_state(),
    ) {
        let stack = stack();
        for earlier in before {
            stack.apply_target_state(earlier);
        }

        stack.apply_target_state(state.clone());
        let once = stack.path();
        let frames = stack.platform_stack();
        let diff = stack.apply_target_state(state);

        prop_assert!(diff.is_empty());
        prop_assert_eq!(stack.path(), once);
        prop_assert_eq!(stack.platform_stack(), frames);
    }

    #[test]
    fn platform_always_renders_the_path(
        states in prop::collection::vec(target_state(), 1..12),
    ) {
        let stack = stack();
        for state in states {
            stack.apply_target_state(state);
            prop_assert_eq!(stack.platform_stack().to_path(), stack.path());
            prop_assert_eq!(stack.views().len(), stack.depth() + 1);
        }
    }
}

#[test]
fn reconcile_keeps_frames_of_the_common_prefix() {
    let stack = stack();
    stack.apply_target_state(StateConfiguration::ShowEvent("7".to_string()));
    let events_frame = stack.platform_stack().frames()[0].id;

    let diff = stack.apply_target_state(StateConfiguration::ShowEvent("12".to_string()));
    assert_eq!(diff.popped.len(), 1);
    assert_eq!(diff.pushed.len(), 1);
    assert_eq!(stack.platform_stack().frames()[0].id, events_frame);
}

#[test]
fn pop_report_beyond_depth_is_ignored() {
    let stack = stack();
    stack.apply_target_state(StateConfiguration::ShowPage);
    assert!(!stack.platform_popped_to(1));
    assert!(!stack.platform_popped(0));
    assert_eq!(stack.depth(), 1);
}

#[test]
fn back_gesture_is_not_undone_by_later_reads() {
    let stack = stack();
    stack.apply_target_state(StateConfiguration::ShowEvent("42".to_string()));
    assert!(stack.platform_popped(1));

    assert_eq!(stack.views(), vec![Screen::Home, Screen::EventList]);
    assert_eq!(stack.path(), NavigationPath::from(vec![AppDestination::Events]));
}

#[test]
fn reset_pops_to_root() {
    let stack = stack();
    stack.push(AppDestination::Page);
    stack.push(AppDestination::Events);
    let diff = stack.apply_target_state(StateConfiguration::Reset);
    assert_eq!(diff.popped.len(), 2);
    assert!(stack.path().is_empty());

    stack.push(AppDestination::Page);
    stack.pop_to_root();
    assert_eq!(stack.views(), vec![Screen::Home]);
}

#[test]
fn concurrent_pushes_all_land() {
    const THREADS: usize = 8;
    const PUSHES: usize = 50;

    let stack = stack();
    std::thread::scope(|scope| {
        for thread in 0..THREADS {
            let stack = &stack;
            scope.spawn(move || {
                for push in 0..PUSHES {
                    stack.push(AppDestination::EventDetail(format!("{thread}-{push}")));
                }
            });
        }
    });

    assert_eq!(stack.depth(), THREADS * PUSHES);
    assert_eq!(stack.platform_stack().to_path(), stack.path());
    assert_eq!(stack.platform_stack().len(), THREADS * PUSHES);
}

#[test]
fn pop_reports_racing_pushes_keep_platform_in_step() {
    let stack = stack();
    stack.set_path(NavigationPath::from(vec![AppDestination::Events; 100]));

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..100 {
                stack.push(AppDestination::Page);
            }
        });
        scope.spawn(|| {
            for _ in 0..100 {
                stack.platform_popped(1);
            }
        });
    });

    assert_eq!(stack.depth(), 100);
    assert_eq!(stack.platform_stack().to_path(), stack.path());
}
