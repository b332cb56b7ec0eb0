use dreg_handoff::{Delivery, Handoff, SlotState};
use dreg_implementors::{Registry, RegistryBuilder, RegistryError, publish};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn alpha_registry() -> Registry {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("src")).expect("src");
    fs::write(dir.path().join("Cargo.toml"), "[package]\nname = \"alpha\"\nversion = \"0.1.0\"\n")
        .expect("manifest");
    fs::write(
        dir.path().join("src/lib.rs"),
        "#[derive(serde::Deserialize)] pub struct StructA;\n#[derive(serde::Deserialize)] pub enum EnumB { X }\n",
    )
    .expect("lib.rs");
    RegistryBuilder::new().root(dir.path()).build().expect("build")
}

#[test]
fn callback_registered_first_runs_once_with_full_registry() {
    let registry = alpha_registry();
    let handoff = Handoff::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(None));

    let (counter, sink) = (Arc::clone(&calls), Arc::clone(&seen));
    let registered = handoff
        .register(move |delivered: Arc<Registry>| {
            counter.fetch_add(1, Ordering::SeqCst);
            *sink.lock().expect("lock") = Some(delivered);
        })
        .expect("register");
    assert_eq!(registered, Delivery::Deferred);

    assert_eq!(publish(&handoff, registry.clone()).expect("publish"), Delivery::Immediate);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(seen.lock().expect("lock").as_deref(), Some(&registry));
    assert!(handoff.take_pending().is_none());
    assert_eq!(handoff.state(), SlotState::Delivered);
}

#[test]
fn registry_published_first_waits_in_pending_slot() {
    let registry = alpha_registry();
    let handoff = Handoff::new();

    assert_eq!(publish(&handoff, registry.clone()).expect("publish"), Delivery::Deferred);
    assert_eq!(handoff.state(), SlotState::Pending);

    let pending = handoff.take_pending().expect("pending registry");
    assert_eq!(*pending, registry);
    assert!(handoff.take_pending().is_none());
}

#[test]
fn second_publish_is_rejected() {
    let handoff = Handoff::new();
    publish(&handoff, alpha_registry()).expect("first publish");

    let err = publish(&handoff, Registry::new()).expect_err("second publish");
    assert!(matches!(err, RegistryError::Handoff { .. }));
    assert_eq!(handoff.take_pending().map(|r| r.entry_count()), Some(2));
}

#[tokio::test]
async fn async_subscriber_receives_registry() {
    let handoff = Handoff::new();
    let rx = handoff.subscribe().expect("subscribe");

    publish(&handoff, alpha_registry()).expect("publish");
    let delivered = rx.recv().await.expect("delivered");
    assert_eq!(delivered.get_str("alpha").map(<[_]>::len), Some(2));
}
