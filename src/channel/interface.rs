//! The action channel shared between a coordinator and its entry view.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::error::ChannelError;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a channel, used in log fields and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(u64);

impl ChannelId {
    fn next() -> Self {
        Self(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch-{}", self.0)
    }
}

/// What [`Interface::attach`] does when an observer is already attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Panic at the point of violation.
    Panic,
    /// Log the violation and return [`ChannelError::DuplicateObserver`].
    Report,
}

impl Default for DuplicatePolicy {
    /// Panic in debug builds, report in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            DuplicatePolicy::Panic
        } else {
            DuplicatePolicy::Report
        }
    }
}

type Handler<A> = Arc<dyn Fn(A) + Send + Sync>;

struct Slot<A> {
    token: u64,
    handler: Handler<A>,
}

struct Shared<A> {
    id: ChannelId,
    policy: DuplicatePolicy,
    consumed: bool,
    next_token: AtomicU64,
    slot: Mutex<Option<Slot<A>>>,
}

impl<A> Shared<A> {
    fn new(policy: DuplicatePolicy, consumed: bool) -> Self {
        Self {
            id: ChannelId::next(),
            policy,
            consumed,
            next_token: AtomicU64::new(1),
            slot: Mutex::new(None),
        }
    }

    fn publish(&self, action: A) {
        // Clone the handler out so it runs without the slot lock held;
        // a handler may publish on this same channel.
        let handler = self
            .slot
            .lock()
            .as_ref()
            .map(|slot| Arc::clone(&slot.handler));

        match handler {
            Some(handler) => {
                tracing::trace!(channel = %self.id, "Dispatching action");
                handler(action);
            }
            None => {
                tracing::trace!(channel = %self.id, "No observer attached, action dropped");
            }
        }
    }

    fn detach(&self, token: u64) -> bool {
        let mut slot = self.slot.lock();
        match slot.as_ref() {
            Some(current) if current.token == token => {
                *slot = None;
                tracing::debug!(channel = %self.id, "Observer detached");
                true
            }
            _ => false,
        }
    }
}

/// A typed, single-consumer, multi-producer action channel.
///
/// The coordinator that creates an `Interface` owns it. Views receive an
/// [`ActionSender`] from [`Interface::sender`] and only ever publish.
///
/// Publishing with no observer attached is a legal no-op: the action is
/// dropped, nothing is buffered.
pub struct Interface<A> {
    shared: Arc<Shared<A>>,
}

impl<A: Send + 'static> Interface<A> {
    /// Create an unattached channel with the default [`DuplicatePolicy`].
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    /// Create an unattached channel with an explicit duplicate-observer policy.
    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            shared: Arc::new(Shared::new(policy, false)),
        }
    }

    /// Create a channel whose consumer is the given inline handler.
    ///
    /// This is how a parent hands a child an action handler without mounting
    /// an observer of its own. The channel reports [`is_consumed`] and any
    /// further [`attach`] is a duplicate.
    ///
    /// [`is_consumed`]: Interface::is_consumed
    /// [`attach`]: Interface::attach
    pub fn consume<F>(handler: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        let shared = Shared::new(DuplicatePolicy::default(), true);
        let token = shared.next_token.fetch_add(1, Ordering::Relaxed);
        *shared.slot.lock() = Some(Slot {
            token,
            handler: Arc::new(handler),
        });
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Register the single consumer of this channel.
    ///
    /// The returned [`Subscription`] detaches the handler when dropped.
    ///
    /// # Errors
    /// Returns [`ChannelError::DuplicateObserver`] if an observer is already
    /// attached and the policy is [`DuplicatePolicy::Report`].
    ///
    /// # Panics
    /// Panics on a duplicate attach when the policy is [`DuplicatePolicy::Panic`].
    pub fn attach<F>(&self, handler: F) -> Result<Subscription, ChannelError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        let mut slot = self.shared.slot.lock();
        if slot.is_some() {
            drop(slot);
            let err = ChannelError::DuplicateObserver {
                channel: self.shared.id,
            };
            match self.shared.policy {
                DuplicatePolicy::Panic => panic!("{err}"),
                DuplicatePolicy::Report => {
                    tracing::error!(channel = %self.shared.id, "Duplicate observer attach rejected");
                    return Err(err);
                }
            }
        }

        let token = self.shared.next_token.fetch_add(1, Ordering::Relaxed);
        *slot = Some(Slot {
            token,
            handler: Arc::new(handler),
        });
        drop(slot);

        tracing::debug!(channel = %self.shared.id, "Observer attached");

        let shared: Weak<Shared<A>> = Arc::downgrade(&self.shared);
        Ok(Subscription {
            channel: self.shared.id,
            detach: Some(Box::new(move || {
                if let Some(shared) = shared.upgrade() {
                    shared.detach(token);
                }
            })),
        })
    }

    /// Deliver an action to the attached observer, if any.
    pub fn publish(&self, action: A) {
        self.shared.publish(action);
    }

    /// Publish-only handle for the view paired with this channel.
    pub fn sender(&self) -> ActionSender<A> {
        ActionSender {
            channel: self.shared.id,
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.shared.id
    }

    pub fn is_attached(&self) -> bool {
        self.shared.slot.lock().is_some()
    }

    /// True when the channel was created with [`Interface::consume`].
    pub fn is_consumed(&self) -> bool {
        self.shared.consumed
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.shared.policy
    }
}

impl<A: Send + 'static> Default for Interface<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Interface<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("id", &self.shared.id)
            .field("attached", &self.shared.slot.lock().is_some())
            .field("consumed", &self.shared.consumed)
            .finish()
    }
}

/// Publish-only handle held by a view.
///
/// The sender does not keep the channel alive. Once the owning coordinator
/// drops its [`Interface`], publishing through a sender does nothing.
pub struct ActionSender<A> {
    channel: ChannelId,
    shared: Weak<Shared<A>>,
}

impl<A> ActionSender<A> {
    pub fn publish(&self, action: A) {
        match self.shared.upgrade() {
            Some(shared) => shared.publish(action),
            None => {
                tracing::trace!(channel = %self.channel, "Channel dropped, action discarded");
            }
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// False once the owning [`Interface`] has been dropped.
    pub fn is_connected(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl<A> Clone for ActionSender<A> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel,
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<A> fmt::Debug for ActionSender<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSender")
            .field("channel", &self.channel)
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Attachment guard returned by [`Interface::attach`].
///
/// Detaching is idempotent, and a stale subscription never removes an
/// observer that attached after it.
pub struct Subscription {
    channel: ChannelId,
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn detach(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }

    pub fn is_active(&self) -> bool {
        self.detach.is_some()
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value| sink.lock().push(value))
    }

    #[test]
    fn publish_without_observer_is_noop() {
        let interface: Interface<u32> = Interface::with_policy(DuplicatePolicy::Report);
        interface.publish(1);
        assert!(!interface.is_attached());
    }

    #[test]
    fn sync_delivery_preserves_order() {
        let interface = Interface::with_policy(DuplicatePolicy::Report);
        let (seen, handler) = recorder();
        let _sub = interface.attach(handler).unwrap();

        for value in [3, 1, 2] {
            interface.publish(value);
        }
        assert_eq!(*seen.lock(), vec![3, 1, 2]);
    }

    #[test]
    fn duplicate_attach_is_reported() {
        let interface: Interface<u32> = Interface::with_policy(DuplicatePolicy::Report);
        let _first = interface.attach(|_| {}).unwrap();
        let err = interface.attach(|_| {}).unwrap_err();
        assert_eq!(
            err,
            ChannelError::DuplicateObserver {
                channel: interface.id()
            }
        );
    }

    #[test]
    #[should_panic(expected = "already has an observer attached")]
    fn duplicate_attach_panics_under_panic_policy() {
        let interface: Interface<u32> = Interface::with_policy(DuplicatePolicy::Panic);
        let _first = interface.attach(|_| {}).unwrap();
        let _second = interface.attach(|_| {});
    }

    #[test]
    fn detach_twice_is_safe() {
        let interface: Interface<u32> = Interface::with_policy(DuplicatePolicy::Report);
        let mut sub = interface.attach(|_| {}).unwrap();
        sub.detach();
        sub.detach();
        assert!(!sub.is_active());
        assert!(!interface.is_attached());
    }

    #[test]
    fn stale_subscription_keeps_newer_observer() {
        let interface = Interface::with_policy(DuplicatePolicy::Report);
        let mut first = interface.attach(|_: u32| {}).unwrap();
        first.detach();

        let (seen, handler) = recorder();
        let _second = interface.attach(handler).unwrap();
        drop(first);

        interface.publish(7);
        assert_eq!(*seen.lock(), vec![7]);
    }

    #[test]
    fn dropping_subscription_detaches() {
        let interface: Interface<u32> = Interface::with_policy(DuplicatePolicy::Report);
        {
            let _sub = interface.attach(|_| {}).unwrap();
            assert!(interface.is_attached());
        }
        assert!(!interface.is_attached());
    }

    #[test]
    fn sender_is_noop_after_interface_dropped() {
        let interface = Interface::with_policy(DuplicatePolicy::Report);
        let (seen, handler) = recorder();
        let sub = interface.attach(handler).unwrap();
        let sender = interface.sender();

        sender.publish(1);
        drop(sub);
        drop(interface);

        assert!(!sender.is_connected());
        sender.publish(2);
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn consumed_interface_is_attached() {
        let (seen, handler) = recorder();
        let interface = Interface::consume(handler);
        assert!(interface.is_consumed());
        assert!(interface.is_attached());

        interface.publish(5);
        assert_eq!(*seen.lock(), vec![5]);
    }

    #[test]
    fn reentrant_publish_is_delivered() {
        let interface = Arc::new(Interface::with_policy(DuplicatePolicy::Report));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sender = interface.sender();
        let _sub = interface
            .attach(move |value: u32| {
                sink.lock().push(value);
                if value > 0 {
                    sender.publish(value - 1);
                }
            })
            .unwrap();

        interface.publish(2);
        assert_eq!(*seen.lock(), vec![2, 1, 0]);
    }
}
