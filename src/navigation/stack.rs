//! The navigation reconciler.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::navigator::Navigator;
use super::path::NavigationPath;
use super::platform::{PlatformStack, StackDiff};
use crate::config::NavigationConfig;
use crate::observable::Observable;

type PathOf<N> = NavigationPath<<N as Navigator>::Destination>;

/// Owns a navigation path and keeps the presented stack in step with it.
///
/// The path has one writer, this stack. Hosts read it through
/// [`path`](Self::path) / [`subscribe`](Self::subscribe) and are the only
/// other party allowed to shorten it, via
/// [`platform_popped_to`](Self::platform_popped_to).
pub struct NavigationStack<N: Navigator> {
    navigator: N,
    path: Observable<PathOf<N>>,
    /// Also serializes commits so path and platform never diverge.
    platform: Mutex<PlatformStack<N::Destination>>,
    history: Mutex<VecDeque<N::TargetState>>,
    history_limit: usize,
}

impl<N: Navigator> NavigationStack<N> {
    pub fn new(navigator: N, config: &NavigationConfig) -> Self {
        Self {
            navigator,
            path: Observable::new(NavigationPath::new()),
            platform: Mutex::new(PlatformStack::new()),
            history: Mutex::new(VecDeque::new()),
            history_limit: config.history_limit.max(1),
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Snapshot of the declared path.
    pub fn path(&self) -> PathOf<N> {
        self.path.get()
    }

    pub fn depth(&self) -> usize {
        self.path.with(NavigationPath::len)
    }

    /// Receiver notified whenever the path changes.
    pub fn subscribe(&self) -> watch::Receiver<PathOf<N>> {
        self.path.subscribe()
    }

    /// Snapshot of the presented frames.
    pub fn platform_stack(&self) -> PlatformStack<N::Destination> {
        self.platform.lock().clone()
    }

    /// Navigate to where `state` says navigation should be.
    ///
    /// The whole path is assigned in one step, so resetting and pushing
    /// several destinations is atomic. Target states that do not map to a
    /// path leave it unchanged.
    pub fn apply_target_state(&self, state: N::TargetState) -> StackDiff<N::Destination> {
        let target = self.navigator.target_path(&state);
        tracing::debug!(target_state = ?state, "Applying target state");
        self.record(state);

        match target {
            Some(path) => self.commit(path),
            None => StackDiff::default(),
        }
    }

    /// Replace the path wholesale.
    pub fn set_path(&self, path: PathOf<N>) -> StackDiff<N::Destination> {
        self.commit(path)
    }

    /// Append one destination. Concurrent pushes all land.
    pub fn push(&self, destination: N::Destination) -> StackDiff<N::Destination> {
        let mut platform = self.platform.lock();
        let mut path = self.path.get();
        path.push(destination);
        self.commit_locked(&mut platform, path)
    }

    pub fn pop_to_root(&self) -> StackDiff<N::Destination> {
        self.commit(NavigationPath::new())
    }

    /// The host popped `count` frames (back gesture, hardware back).
    pub fn platform_popped(&self, count: usize) -> bool {
        let mut platform = self.platform.lock();
        let len = self.depth().saturating_sub(count);
        self.truncate_locked(&mut platform, len)
    }

    /// The host popped back to `len` frames.
    ///
    /// The truncation is authoritative: the path becomes its first `len`
    /// destinations and is not restored. Reports of a length at or beyond
    /// the current depth are ignored and return `false`.
    pub fn platform_popped_to(&self, len: usize) -> bool {
        let mut platform = self.platform.lock();
        self.truncate_locked(&mut platform, len)
    }

    fn truncate_locked(&self, platform: &mut PlatformStack<N::Destination>, len: usize) -> bool {
        let depth = self.path.with(NavigationPath::len);
        if len >= depth {
            tracing::debug!(len, depth, "Ignoring pop report that does not shorten the path");
            return false;
        }

        let removed = platform.truncate(len);
        self.path.update(|path| path.truncate(len));
        tracing::info!(depth = len, popped = removed.len(), "Host popped navigation stack");
        true
    }

    /// Root view followed by one view per presented frame.
    pub fn views(&self) -> Vec<N::View> {
        let platform = self.platform.lock();
        std::iter::once(self.navigator.root_view())
            .chain(
                platform
                    .frames()
                    .iter()
                    .map(|frame| self.navigator.destination_view(&frame.destination)),
            )
            .collect()
    }

    /// Most recently applied target states, oldest first.
    pub fn history(&self) -> Vec<N::TargetState> {
        self.history.lock().iter().cloned().collect()
    }

    fn record(&self, state: N::TargetState) {
        let mut history = self.history.lock();
        if history.len() == self.history_limit {
            history.pop_front();
        }
        history.push_back(state);
    }

    fn commit(&self, path: PathOf<N>) -> StackDiff<N::Destination> {
        let mut platform = self.platform.lock();
        self.commit_locked(&mut platform, path)
    }

    fn commit_locked(
        &self,
        platform: &mut PlatformStack<N::Destination>,
        path: PathOf<N>,
    ) -> StackDiff<N::Destination> {
        let changed = self.path.set_if_changed(path);
        let diff = self.path.with(|path| platform.reconcile(path));

        if changed {
            tracing::info!(
                depth = platform.len(),
                pushed = diff.pushed.len(),
                popped = diff.popped.len(),
                "Navigation path committed"
            );
        }
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum Screen {
        List,
        Detail(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Target {
        Reset,
        Detail(u32),
        Confirm,
    }

    struct TestNavigator;

    impl Navigator for TestNavigator {
        type Destination = Screen;
        type TargetState = Target;
        type View = String;

        fn root_view(&self) -> String {
            "root".to_string()
        }

        fn destination_view(&self, destination: &Screen) -> String {
            match destination {
                Screen::List => "list".to_string(),
                Screen::Detail(id) => format!("detail {id}"),
            }
        }

        fn target_path(&self, state: &Target) -> Option<NavigationPath<Screen>> {
            match state {
                Target::Reset => Some(NavigationPath::new()),
                Target::Detail(id) => Some(vec![Screen::List, Screen::Detail(*id)].into()),
                Target::Confirm => None,
            }
        }
    }

    fn stack() -> NavigationStack<TestNavigator> {
        NavigationStack::new(TestNavigator, &NavigationConfig::default())
    }

    #[test]
    fn apply_target_state_is_idempotent() {
        let stack = stack();
        let first = stack.apply_target_state(Target::Detail(4));
        let path = stack.path();
        let second = stack.apply_target_state(Target::Detail(4));

        assert_eq!(first.pushed.len(), 2);
        assert!(second.is_empty());
        assert_eq!(stack.path(), path);
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn non_path_target_keeps_path() {
        let stack = stack();
        stack.apply_target_state(Target::Detail(1));
        let diff = stack.apply_target_state(Target::Confirm);
        assert!(diff.is_empty());
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.history().len(), 2);
    }

    #[test]
    fn platform_pop_truncates_without_undo() {
        let stack = stack();
        stack.apply_target_state(Target::Detail(9));

        assert!(stack.platform_popped(1));
        assert_eq!(stack.path(), NavigationPath::from(vec![Screen::List]));
        assert_eq!(stack.platform_stack().to_path(), stack.path());

        assert!(!stack.platform_popped_to(5));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn views_follow_frames() {
        let stack = stack();
        stack.apply_target_state(Target::Detail(2));
        assert_eq!(stack.views(), vec!["root", "list", "detail 2"]);

        stack.apply_target_state(Target::Reset);
        assert_eq!(stack.views(), vec!["root"]);
    }

    #[test]
    fn history_is_bounded() {
        let config = NavigationConfig { history_limit: 2 };
        let stack = NavigationStack::new(TestNavigator, &config);
        stack.apply_target_state(Target::Reset);
        stack.apply_target_state(Target::Detail(1));
        stack.apply_target_state(Target::Confirm);
        assert_eq!(stack.history(), vec![Target::Detail(1), Target::Confirm]);
    }

    #[test]
    fn commits_notify_subscribers() {
        let stack = stack();
        let mut rx = stack.subscribe();
        stack.push(Screen::List);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);

        stack.set_path(vec![Screen::List].into());
        assert!(!rx.has_changed().unwrap());
    }
}
