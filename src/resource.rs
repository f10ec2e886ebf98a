//! Lifecycle of an asynchronously loaded value.
//!
//! ```text
//! Initial ──→ Loading ──→ Loaded
//!               ↑   └───→ Failed
//!               └── Loaded / Failed (new fetch)
//! ```
//!
//! Only the owning coordinator drives transitions; views read snapshots.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use thiserror::Error;

use crate::mvi::{Intent, Reducer, UiState};

/// Fieldless view of a [`LoadingState`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    Initial,
    Loading,
    Loaded,
    Failed,
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadPhase::Initial => "initial",
            LoadPhase::Loading => "loading",
            LoadPhase::Loaded => "loaded",
            LoadPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Illegal resource transition from {from} to {to}")]
pub struct TransitionError {
    pub from: LoadPhase,
    pub to: LoadPhase,
}

impl TransitionError {
    fn new(from: LoadPhase, to: LoadPhase) -> Self {
        Self { from, to }
    }
}

/// The four-state lifecycle of a loaded value.
///
/// Transition methods leave the state untouched when they fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "value", rename_all = "lowercase")]
pub enum LoadingState<V, F> {
    /// No request made yet.
    Initial,
    /// A request is in flight. `previous` is the last loaded value when the
    /// caller chose to retain it.
    Loading { previous: Option<V> },
    Loaded(V),
    Failed(F),
}

impl<V, F> Default for LoadingState<V, F> {
    fn default() -> Self {
        LoadingState::Initial
    }
}

impl<V, F> LoadingState<V, F> {
    pub fn phase(&self) -> LoadPhase {
        match self {
            LoadingState::Initial => LoadPhase::Initial,
            LoadingState::Loading { .. } => LoadPhase::Loading,
            LoadingState::Loaded(_) => LoadPhase::Loaded,
            LoadingState::Failed(_) => LoadPhase::Failed,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }

    /// The loaded value, or the retained one while reloading.
    pub fn value(&self) -> Option<&V> {
        match self {
            LoadingState::Loaded(value) => Some(value),
            LoadingState::Loading { previous } => previous.as_ref(),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&F> {
        match self {
            LoadingState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Start a fetch, discarding any loaded value.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.enter_loading(false)
    }

    /// Start a fetch, keeping a loaded value visible until it resolves.
    pub fn begin_retaining(&mut self) -> Result<(), TransitionError> {
        self.enter_loading(true)
    }

    pub fn succeed(&mut self, value: V) -> Result<(), TransitionError> {
        self.settle(LoadingState::Loaded(value))
    }

    pub fn fail(&mut self, failure: F) -> Result<(), TransitionError> {
        self.settle(LoadingState::Failed(failure))
    }

    pub fn resolve(&mut self, result: Result<V, F>) -> Result<(), TransitionError> {
        match result {
            Ok(value) => self.succeed(value),
            Err(failure) => self.fail(failure),
        }
    }

    fn enter_loading(&mut self, retain: bool) -> Result<(), TransitionError> {
        if self.is_loading() {
            return Err(TransitionError::new(LoadPhase::Loading, LoadPhase::Loading));
        }
        let previous = match std::mem::take(self) {
            LoadingState::Loaded(value) if retain => Some(value),
            _ => None,
        };
        *self = LoadingState::Loading { previous };
        Ok(())
    }

    fn settle(&mut self, next: LoadingState<V, F>) -> Result<(), TransitionError> {
        if !self.is_loading() {
            return Err(TransitionError::new(self.phase(), next.phase()));
        }
        *self = next;
        Ok(())
    }
}

/// A [`LoadingState`] plus the number of fetches in flight for it.
///
/// Fetches that start while one is already running join the current
/// loading cycle. The state leaves `Loading` when the last of them
/// completes, with that fetch's result, so concurrent fetches resolve to
/// whichever finished last. Earlier successes are shown as the retained
/// value in the meantime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource<V, F> {
    state: LoadingState<V, F>,
    in_flight: usize,
}

impl<V, F> Default for Resource<V, F> {
    fn default() -> Self {
        Self {
            state: LoadingState::Initial,
            in_flight: 0,
        }
    }
}

impl<V, F> Resource<V, F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resource that starts out holding a value.
    pub fn with_value(value: V) -> Self {
        Self {
            state: LoadingState::Loaded(value),
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &LoadingState<V, F> {
        &self.state
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.phase()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.start(false)
    }

    pub fn begin_retaining(&mut self) -> Result<(), TransitionError> {
        self.start(true)
    }

    /// Record the completion of one fetch.
    ///
    /// Fails when no fetch is in flight, e.g. a completion arriving for a
    /// resource that never started loading.
    pub fn resolve(&mut self, result: Result<V, F>) -> Result<(), TransitionError> {
        if self.in_flight == 0 || !self.state.is_loading() {
            let to = if result.is_ok() {
                LoadPhase::Loaded
            } else {
                LoadPhase::Failed
            };
            return Err(TransitionError::new(self.state.phase(), to));
        }

        self.in_flight -= 1;
        if self.in_flight > 0 {
            if let (Ok(value), LoadingState::Loading { previous }) = (result, &mut self.state) {
                *previous = Some(value);
            }
            return Ok(());
        }
        self.state.resolve(result)
    }

    fn start(&mut self, retain: bool) -> Result<(), TransitionError> {
        if self.state.is_loading() {
            self.in_flight += 1;
            return Ok(());
        }
        if retain {
            self.state.begin_retaining()?;
        } else {
            self.state.begin()?;
        }
        self.in_flight = 1;
        Ok(())
    }
}

/// Inputs accepted by [`ResourceReducer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceIntent<V, F> {
    Begin,
    BeginRetaining,
    Resolve(Result<V, F>),
}

impl<V: Send + 'static, F: Send + 'static> Intent for ResourceIntent<V, F> {}

impl<V, F> UiState for Resource<V, F>
where
    V: Clone + PartialEq + Send + 'static,
    F: Clone + PartialEq + Send + 'static,
{
}

/// Reducer over [`Resource`]; illegal intents are logged and ignored.
pub struct ResourceReducer<V, F>(PhantomData<fn() -> (V, F)>);

impl<V, F> Reducer for ResourceReducer<V, F>
where
    V: Clone + PartialEq + Send + 'static,
    F: Clone + PartialEq + Send + 'static,
{
    type State = Resource<V, F>;
    type Intent = ResourceIntent<V, F>;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        let outcome = match intent {
            ResourceIntent::Begin => state.begin(),
            ResourceIntent::BeginRetaining => state.begin_retaining(),
            ResourceIntent::Resolve(result) => state.resolve(result),
        };
        if let Err(err) = outcome {
            tracing::warn!(from = %err.from, to = %err.to, "Rejected resource transition");
        }
        state
    }
}
