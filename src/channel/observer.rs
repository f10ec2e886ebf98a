//! Observers that bind a channel to handler logic on a coordinator's behalf.

use std::future::Future;
use std::marker::PhantomData;

use super::error::ChannelError;
use super::interface::{ChannelId, Interface, Subscription};
use crate::coordinator::TaskRegistry;

/// Runs the handler inline, on whatever context calls `publish`.
///
/// Handler invocations happen in exactly the order actions are published,
/// and each one finishes before `publish` returns.
#[derive(Debug)]
pub struct ChannelObserver<A> {
    subscription: Subscription,
    _action: PhantomData<fn(A)>,
}

impl<A: Send + 'static> ChannelObserver<A> {
    pub fn attach<F>(interface: &Interface<A>, handler: F) -> Result<Self, ChannelError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        let subscription = interface.attach(handler)?;
        Ok(Self {
            subscription,
            _action: PhantomData,
        })
    }
}

impl<A> ChannelObserver<A> {
    /// Stop observing. Safe to call more than once.
    pub fn detach(&mut self) {
        self.subscription.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn channel(&self) -> ChannelId {
        self.subscription.channel()
    }
}

/// Spawns one task per action on a [`TaskRegistry`] and returns immediately.
///
/// Tasks are submitted in publish order, but a handler that suspends can
/// finish after one submitted later. Callers needing strict ordering must
/// serialize inside the handler.
#[derive(Debug)]
pub struct AsyncChannelObserver<A> {
    subscription: Subscription,
    tasks: TaskRegistry,
    _action: PhantomData<fn(A)>,
}

impl<A: Send + 'static> AsyncChannelObserver<A> {
    pub fn attach<F, Fut>(
        interface: &Interface<A>,
        tasks: TaskRegistry,
        handler: F,
    ) -> Result<Self, ChannelError>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let registry = tasks.clone();
        let channel = interface.id();
        let subscription = interface.attach(move |action| {
            if registry.spawn(handler(action)).is_none() {
                tracing::debug!(channel = %channel, "Task registry closed, action dropped");
            }
        })?;

        Ok(Self {
            subscription,
            tasks,
            _action: PhantomData,
        })
    }
}

impl<A> AsyncChannelObserver<A> {
    /// Stop observing. Tasks already spawned keep running.
    pub fn detach(&mut self) {
        self.subscription.detach();
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn channel(&self) -> ChannelId {
        self.subscription.channel()
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }
}
