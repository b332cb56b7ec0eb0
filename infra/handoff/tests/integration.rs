use dreg_handoff::{Delivery, Handoff, HandoffError, SlotState};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Index(Vec<&'static str>);

#[tokio::test]
async fn subscriber_before_publish_receives_value() {
    let handoff = Handoff::new();
    let rx = handoff.subscribe().unwrap();
    assert_eq!(handoff.state(), SlotState::Waiting);

    assert_eq!(handoff.publish(Index(vec!["alpha"])).unwrap(), Delivery::Immediate);

    let got = rx.recv().await.unwrap();
    assert_eq!(*got, Index(vec!["alpha"]));
    assert_eq!(handoff.state(), SlotState::Delivered);
}

#[tokio::test]
async fn subscriber_after_publish_receives_pending_value() {
    let handoff = Handoff::new();
    handoff.publish(Index(vec!["beta"])).unwrap();

    let mut rx = handoff.subscribe().unwrap();
    let got = rx.try_recv().unwrap().expect("pending value should be ready");
    assert_eq!(got.0, vec!["beta"]);
    assert!(handoff.take_pending().is_none(), "value must not be delivered twice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn publish_from_another_task_wakes_subscriber() {
    let handoff = Handoff::new();
    let rx = handoff.subscribe().unwrap();

    let producer = handoff.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        producer.publish(Index(vec!["gamma"])).unwrap();
    });

    let got = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await.unwrap().unwrap();
    assert_eq!(got.0, vec!["gamma"]);
}

#[tokio::test]
async fn dropping_all_producers_closes_subscriber() {
    let handoff = Handoff::<Index>::new();
    let rx = handoff.subscribe().unwrap();
    drop(handoff);

    assert!(matches!(rx.recv().await, Err(HandoffError::Closed { .. })));
}

#[test]
fn dropped_subscriber_leaves_value_pending() {
    let handoff = Handoff::new();
    let rx = handoff.subscribe().unwrap();
    drop(rx);

    assert_eq!(handoff.publish(Index(vec!["delta"])).unwrap(), Delivery::Deferred);
    assert_eq!(handoff.state(), SlotState::Pending);
    assert_eq!(handoff.take_pending().unwrap().0, vec!["delta"]);
}

#[test]
fn racing_producer_and_consumer_deliver_exactly_once() {
    for _ in 0..200 {
        let handoff = Handoff::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let consumer = {
            let handoff = handoff.clone();
            let calls = Arc::clone(&calls);
            std::thread::spawn(move || {
                handoff
                    .register(move |v: Arc<Index>| {
                        assert_eq!(v.0, vec!["race"]);
                        calls.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
            })
        };
        let producer = {
            let handoff = handoff.clone();
            std::thread::spawn(move || handoff.publish(Index(vec!["race"])).unwrap())
        };

        consumer.join().unwrap();
        producer.join().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(handoff.state(), SlotState::Delivered);
        assert!(handoff.take_pending().is_none());
    }
}
