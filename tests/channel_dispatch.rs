mod common;

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use waypoint::channel::{ChannelError, ChannelObserver, DuplicatePolicy, Interface};

proptest! {
    #[test]
    fn sync_observer_sees_publish_order(actions in prop::collection::vec(any::<u16>(), 0..64)) {
        let interface = Interface::with_policy(DuplicatePolicy::Report);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _observer = ChannelObserver::attach(&interface, move |action: u16| sink.lock().push(action))
            .expect("first attach succeeds");

        let sender = interface.sender();
        for (i, action) in actions.iter().enumerate() {
            // Alternate between the owner and a view-side sender.
            if i % 2 == 0 {
                interface.publish(*action);
            } else {
                sender.publish(*action);
            }
        }

        prop_assert_eq!(&*seen.lock(), &actions);
    }

    #[test]
    fn only_the_first_attach_succeeds(extra in 1usize..5) {
        let interface: Interface<u8> = Interface::with_policy(DuplicatePolicy::Report);
        let first = interface.attach(|_| {});
        prop_assert!(first.is_ok());

        for _ in 0..extra {
            let err = interface.attach(|_| {}).unwrap_err();
            prop_assert_eq!(err, ChannelError::DuplicateObserver { channel: interface.id() });
        }
    }
}

#[test]
fn reattach_after_detach_succeeds() {
    let interface: Interface<u8> = Interface::with_policy(DuplicatePolicy::Report);
    let mut first = ChannelObserver::attach(&interface, |_| {}).unwrap();
    first.detach();
    first.detach();

    assert!(!interface.is_attached());
    assert!(ChannelObserver::attach(&interface, |_| {}).is_ok());
}

#[test]
fn consumed_channel_delivers_inline() {
    let (interface, seen) = common::recording_channel::<&'static str>();
    assert!(interface.is_consumed());

    interface.sender().publish("tap");
    interface.publish("search");
    assert_eq!(*seen.lock(), vec!["tap", "search"]);
}

#[test]
fn sender_outliving_channel_is_inert() {
    let (interface, seen) = common::recording_channel::<u8>();
    let sender = interface.sender();
    drop(interface);

    assert!(!sender.is_connected());
    sender.publish(1);
    assert!(seen.lock().is_empty());
}

#[test]
#[should_panic(expected = "already has an observer")]
fn panic_policy_aborts_on_duplicate() {
    let interface: Interface<u8> = Interface::with_policy(DuplicatePolicy::Panic);
    let _first = interface.attach(|_| {}).unwrap();
    let _second = interface.attach(|_| {});
}
