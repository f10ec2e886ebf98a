//! Coordinators: the units that own presentation state, interpret actions
//! and declare navigation for a view subtree.
//!
//! A coordinator never mutates another coordinator's state. Parents and
//! children talk only through [`Interface`]s and navigation composition.

mod tasks;

pub use tasks::{TaskRegistry, TaskTicket};

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::channel::{ActionSender, AsyncChannelObserver, ChannelError, Interface};
use crate::config::TaskConfig;
use crate::mvi::Intent;
use crate::navigation::ChildStack;

/// Errors raised while mounting a coordinator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Handlers need a tokio runtime to run on.
    #[error("No tokio runtime is available to run action handlers")]
    NoRuntime,

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// How a coordinator presents content beyond its entry view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationPattern {
    /// Only the entry view is shown.
    #[default]
    None,
    /// A modal sheet over the entry view.
    Sheet { is_presented: bool },
    /// A child navigation stack is composed beneath this coordinator.
    Navigator(ChildStack),
}

/// A unit owning presentation state and the handling of its view's actions.
pub trait Coordinator: Send + Sync + 'static {
    type Action: Intent;
    type View;

    /// The channel this coordinator owns and its entry view publishes on.
    fn interface(&self) -> &Interface<Self::Action>;

    /// Describe the entry view from current state. Must not have side effects.
    fn entry_view(&self) -> Self::View;

    fn navigation(&self) -> NavigationPattern {
        NavigationPattern::None
    }

    /// Interpret one action from the entry view.
    ///
    /// Service failures must be caught here and recorded in state; they
    /// never propagate out of a handler.
    fn handle(&self, action: Self::Action) -> impl Future<Output = ()> + Send;
}

/// Mount a coordinator: attach an async observer to its interface so each
/// published action runs [`Coordinator::handle`] on the coordinator's own
/// [`TaskRegistry`].
pub fn mount<C: Coordinator>(
    coordinator: C,
    config: &TaskConfig,
) -> Result<Mounted<C>, CoordinatorError> {
    let tasks = TaskRegistry::current()?;
    let coordinator = Arc::new(coordinator);

    // Weak so the channel slot does not keep its own owner alive.
    let weak = Arc::downgrade(&coordinator);
    let observer = AsyncChannelObserver::attach(
        coordinator.interface(),
        tasks.clone(),
        move |action: C::Action| {
            let coordinator = weak.upgrade();
            async move {
                if let Some(coordinator) = coordinator {
                    coordinator.handle(action).await;
                }
            }
        },
    )?;

    tracing::debug!(channel = %observer.channel(), "Coordinator mounted");

    Ok(Mounted {
        coordinator,
        observer: Some(observer),
        tasks,
        cancel_on_teardown: config.cancel_on_teardown,
    })
}

/// A coordinator wired to its channel. Dropping it tears the coordinator down.
pub struct Mounted<C: Coordinator> {
    coordinator: Arc<C>,
    observer: Option<AsyncChannelObserver<C::Action>>,
    tasks: TaskRegistry,
    cancel_on_teardown: bool,
}

impl<C: Coordinator> Mounted<C> {
    pub fn coordinator(&self) -> &Arc<C> {
        &self.coordinator
    }

    pub fn entry_view(&self) -> C::View {
        self.coordinator.entry_view()
    }

    pub fn navigation(&self) -> NavigationPattern {
        self.coordinator.navigation()
    }

    /// Publish-only handle to the coordinator's channel.
    pub fn sender(&self) -> ActionSender<C::Action> {
        self.coordinator.interface().sender()
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn is_mounted(&self) -> bool {
        self.observer.is_some()
    }

    /// Detach from the channel and stop accepting new handler tasks.
    ///
    /// In-flight handlers are aborted when `cancel_on_teardown` is set,
    /// otherwise they run to completion. Idempotent.
    pub fn teardown(&mut self) {
        let Some(mut observer) = self.observer.take() else {
            return;
        };
        observer.detach();
        self.tasks.close();

        let aborted = if self.cancel_on_teardown {
            self.tasks.cancel_all()
        } else {
            0
        };

        tracing::info!(
            channel = %observer.channel(),
            aborted,
            still_running = self.tasks.in_flight(),
            "Coordinator torn down"
        );
    }
}

impl<C: Coordinator> Drop for Mounted<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
