//! Tests for EventRegistry
//!
//! These tests verify:
//! - Delivery to subscribers of the published kind only
//! - Duplicate subscriptions keep the first callback
//! - Unsubscribe and unsubscribe-all
//! - Callbacks re-entering the registry
//! - Sharing a registry across threads

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use histlog::events::{Event, EventKind, EventRegistry, SubscriberId};

// =============================================================================
// Helper Functions
// =============================================================================

fn counter(registry: &EventRegistry, kind: EventKind, id: &str) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&count);
    registry.subscribe(kind, id, move |_| {
        handle.fetch_add(1, Ordering::SeqCst);
    });
    count
}

// =============================================================================
// Publish Tests
// =============================================================================

#[test]
fn test_publish_without_subscribers() {
    let registry = EventRegistry::new();

    assert_eq!(registry.publish(&Event::SettingsChanged("theme".into())), 0);
}

#[test]
fn test_publish_reaches_only_matching_kind() {
    let registry = EventRegistry::new();
    let settings = counter(&registry, EventKind::SettingsChanged, "ui");
    let autofill = counter(&registry, EventKind::TriggerAutoFill, "ui");

    let delivered = registry.publish(&Event::SettingsChanged("theme".into()));

    assert_eq!(delivered, 1);
    assert_eq!(settings.load(Ordering::SeqCst), 1);
    assert_eq!(autofill.load(Ordering::SeqCst), 0);
}

#[test]
fn test_publish_passes_payload() {
    let registry = EventRegistry::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    registry.subscribe(EventKind::TriggerAutoFill, "form", move |event| {
        if let Event::TriggerAutoFill(field) = event {
            sink.lock().unwrap().push(field.clone());
        }
    });

    registry.publish(&Event::TriggerAutoFill("artist".into()));
    registry.publish(&Event::TriggerAutoFill("album".into()));

    assert_eq!(*seen.lock().unwrap(), vec!["artist".to_string(), "album".to_string()]);
}

#[test]
fn test_delivery_in_subscriber_order() {
    let registry = EventRegistry::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for id in ["c", "a", "b"] {
        let sink = Arc::clone(&order);
        registry.subscribe(EventKind::SettingsChanged, id, move |_| {
            sink.lock().unwrap().push(id);
        });
    }

    assert_eq!(registry.publish(&Event::SettingsChanged(String::new())), 3);
    assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
}

// =============================================================================
// Subscribe / Unsubscribe Tests
// =============================================================================

#[test]
fn test_duplicate_subscription_keeps_first() {
    let registry = EventRegistry::new();
    let first = counter(&registry, EventKind::SettingsChanged, "ui");

    let second = Arc::new(AtomicUsize::new(0));
    let handle = Arc::clone(&second);
    let added = registry.subscribe(EventKind::SettingsChanged, "ui", move |_| {
        handle.fetch_add(1, Ordering::SeqCst);
    });

    registry.publish(&Event::SettingsChanged(String::new()));

    assert!(!added);
    assert_eq!(registry.subscriber_count(EventKind::SettingsChanged), 1);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unsubscribe() {
    let registry = EventRegistry::new();
    let count = counter(&registry, EventKind::SettingsChanged, "ui");
    let id = SubscriberId::new("ui");

    assert!(registry.unsubscribe(EventKind::SettingsChanged, &id));
    assert!(!registry.unsubscribe(EventKind::SettingsChanged, &id));
    assert!(!registry.unsubscribe(EventKind::Flushed, &id));

    registry.publish(&Event::SettingsChanged(String::new()));
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unsubscribe_all() {
    let registry = EventRegistry::new();
    let _ = counter(&registry, EventKind::SettingsChanged, "ui");
    let _ = counter(&registry, EventKind::TriggerAutoFill, "ui");
    let other = counter(&registry, EventKind::SettingsChanged, "other");

    assert_eq!(registry.unsubscribe_all(&SubscriberId::new("ui")), 2);
    assert_eq!(registry.subscriber_count(EventKind::TriggerAutoFill), 0);
    assert_eq!(registry.subscriber_count(EventKind::SettingsChanged), 1);

    registry.publish(&Event::SettingsChanged(String::new()));
    assert_eq!(other.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Re-entrancy Tests
// =============================================================================

#[test]
fn test_callback_may_publish() {
    let registry = Arc::new(EventRegistry::new());
    let autofill = counter(&registry, EventKind::TriggerAutoFill, "form");

    let weak = Arc::downgrade(&registry);
    registry.subscribe(EventKind::SettingsChanged, "ui", move |event| {
        if let (Some(registry), Event::SettingsChanged(field)) = (weak.upgrade(), event) {
            registry.publish(&Event::TriggerAutoFill(field.clone()));
        }
    });

    assert_eq!(registry.publish(&Event::SettingsChanged("artist".into())), 1);
    assert_eq!(autofill.load(Ordering::SeqCst), 1);
}

#[test]
fn test_callback_may_subscribe_and_unsubscribe() {
    let registry = Arc::new(EventRegistry::new());
    let late = Arc::new(AtomicUsize::new(0));

    let weak = Arc::downgrade(&registry);
    let handle = Arc::clone(&late);
    registry.subscribe(EventKind::SettingsChanged, "once", move |_| {
        let Some(registry) = weak.upgrade() else {
            return;
        };
        registry.unsubscribe(EventKind::SettingsChanged, &SubscriberId::new("once"));

        let handle = Arc::clone(&handle);
        registry.subscribe(EventKind::SettingsChanged, "late", move |_| {
            handle.fetch_add(1, Ordering::SeqCst);
        });
    });

    // Changes made during delivery apply from the next event
    assert_eq!(registry.publish(&Event::SettingsChanged(String::new())), 1);
    assert_eq!(late.load(Ordering::SeqCst), 0);

    assert_eq!(registry.publish(&Event::SettingsChanged(String::new())), 1);
    assert_eq!(late.load(Ordering::SeqCst), 1);
    assert_eq!(registry.subscriber_count(EventKind::SettingsChanged), 1);
}

#[test]
fn test_nested_publish_with_concurrent_subscribers() {
    let registry = Arc::new(EventRegistry::new());
    let autofill = counter(&registry, EventKind::TriggerAutoFill, "form");

    let weak = Arc::downgrade(&registry);
    registry.subscribe(EventKind::SettingsChanged, "ui", move |_| {
        if let Some(registry) = weak.upgrade() {
            registry.publish(&Event::TriggerAutoFill(String::new()));
        }
    });

    let subscriber = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..200 {
                registry.subscribe(EventKind::Flushed, format!("s{}", i), |_| {});
            }
        })
    };

    for _ in 0..200 {
        registry.publish(&Event::SettingsChanged(String::new()));
    }
    subscriber.join().unwrap();

    assert_eq!(autofill.load(Ordering::SeqCst), 200);
    assert_eq!(registry.subscriber_count(EventKind::Flushed), 200);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_shared_across_threads() {
    let registry = Arc::new(EventRegistry::new());
    let count = counter(&registry, EventKind::TriggerAutoFill, "ui");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..25 {
                    registry.publish(&Event::TriggerAutoFill(format!("field{}", i)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(count.load(Ordering::SeqCst), 100);
}
