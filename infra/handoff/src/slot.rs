use crate::error::HandoffError;
use crate::receiver::HandoffReceiver;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

type Callback<T> = Box<dyn FnOnce(Arc<T>) + Send + 'static>;

/// Which side of the handoff completed the delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The counterpart was already present and received the value right away.
    Immediate,
    /// The value (or the consumer) was parked until the counterpart arrives.
    Deferred,
}

/// Observable state of a [`Handoff`] slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Neither side has arrived yet.
    Empty,
    /// A value is parked in the pending slot.
    Pending,
    /// A consumer is registered and waiting for a value.
    Waiting,
    /// The value reached its consumer; the slot is spent.
    Delivered,
}

enum Slot<T> {
    Empty,
    Pending(Arc<T>),
    Callback(Callback<T>),
    Subscriber(oneshot::Sender<Arc<T>>),
    Delivered,
}

impl<T> Slot<T> {
    const fn state(&self) -> SlotState {
        match self {
            Self::Empty => SlotState::Empty,
            Self::Pending(_) => SlotState::Pending,
            Self::Callback(_) | Self::Subscriber(_) => SlotState::Waiting,
            Self::Delivered => SlotState::Delivered,
        }
    }
}

/// A single-slot event connecting one producer with one consumer.
///
/// Producer and consumer may arrive in either order; whichever arrives second
/// performs the delivery, and the value is delivered exactly once. Consumers are
/// either synchronous callbacks ([`Handoff::register`]) or async subscribers
/// ([`Handoff::subscribe`]). A value nobody claimed stays in the pending slot and
/// can be collected once with [`Handoff::take_pending`].
///
/// Cloning is cheap; all clones share the same slot.
pub struct Handoff<T> {
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T> Clone for Handoff<T> {
    fn clone(&self) -> Self {
        Self { slot: Arc::clone(&self.slot) }
    }
}

impl<T> Default for Handoff<T> {
    fn default() -> Self {
        Self { slot: Arc::new(Mutex::new(Slot::Empty)) }
    }
}

impl<T> fmt::Debug for Handoff<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handoff").field("state", &self.slot.lock().state()).finish()
    }
}

impl<T: Send + Sync + 'static> Handoff<T> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state of the slot.
    #[must_use]
    pub fn state(&self) -> SlotState {
        self.slot.lock().state()
    }

    /// Publishes `value`.
    ///
    /// If a consumer is already registered it receives the value immediately,
    /// otherwise the value is parked in the pending slot.
    ///
    /// # Errors
    /// Returns [`HandoffError::AlreadyPublished`] if a value was published before.
    ///
    /// # Examples
    /// ```rust
    /// use dreg_handoff::{Delivery, Handoff};
    ///
    /// # fn main() -> Result<(), dreg_handoff::HandoffError> {
    /// let handoff = Handoff::new();
    /// assert_eq!(handoff.publish(7_u32)?, Delivery::Deferred);
    /// assert_eq!(handoff.take_pending().as_deref(), Some(&7));
    /// # Ok(())
    /// # }
    /// ```
    pub fn publish(&self, value: T) -> Result<Delivery, HandoffError> {
        self.publish_arc(Arc::new(value))
    }

    /// Publishes a shared value without re-wrapping.
    ///
    /// # Errors
    /// Returns [`HandoffError::AlreadyPublished`] if a value was published before.
    pub fn publish_arc(&self, value: Arc<T>) -> Result<Delivery, HandoffError> {
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Delivered) {
            Slot::Empty => {
                *slot = Slot::Pending(value);
                trace!(payload = std::any::type_name::<T>(), "Value parked in pending slot");
                Ok(Delivery::Deferred)
            },
            Slot::Callback(callback) => {
                drop(slot);
                debug!(payload = std::any::type_name::<T>(), "Delivering to registered callback");
                callback(value);
                Ok(Delivery::Immediate)
            },
            Slot::Subscriber(tx) => match tx.send(value) {
                Ok(()) => {
                    debug!(payload = std::any::type_name::<T>(), "Delivered to waiting subscriber");
                    Ok(Delivery::Immediate)
                },
                Err(value) => {
                    warn!(
                        payload = std::any::type_name::<T>(),
                        "Subscriber went away before delivery; parking value"
                    );
                    *slot = Slot::Pending(value);
                    Ok(Delivery::Deferred)
                },
            },
            previous @ (Slot::Pending(_) | Slot::Delivered) => {
                *slot = previous;
                Err(HandoffError::AlreadyPublished {
                    message: std::any::type_name::<T>().into(),
                    context: None,
                })
            },
        }
    }

    /// Registers a synchronous consumer.
    ///
    /// If a value is pending the callback runs right away (outside the slot lock),
    /// otherwise it runs on the next [`Handoff::publish`].
    ///
    /// # Errors
    /// Returns [`HandoffError::AlreadyConsumed`] if another consumer already claimed the slot.
    ///
    /// # Examples
    /// ```rust
    /// use dreg_handoff::{Delivery, Handoff};
    /// use std::sync::{Arc, Mutex};
    ///
    /// # fn main() -> Result<(), dreg_handoff::HandoffError> {
    /// let seen = Arc::new(Mutex::new(None));
    /// let sink = Arc::clone(&seen);
    ///
    /// let handoff = Handoff::new();
    /// handoff.register(move |v: Arc<&'static str>| *sink.lock().unwrap() = Some(*v))?;
    /// assert_eq!(handoff.publish("ready")?, Delivery::Immediate);
    /// assert_eq!(*seen.lock().unwrap(), Some("ready"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn register<F>(&self, callback: F) -> Result<Delivery, HandoffError>
    where
        F: FnOnce(Arc<T>) + Send + 'static,
    {
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Delivered) {
            Slot::Empty => {
                *slot = Slot::Callback(Box::new(callback));
                trace!(payload = std::any::type_name::<T>(), "Callback registered, awaiting value");
                Ok(Delivery::Deferred)
            },
            Slot::Pending(value) => {
                drop(slot);
                debug!(payload = std::any::type_name::<T>(), "Delivering pending value to callback");
                callback(value);
                Ok(Delivery::Immediate)
            },
            previous => {
                *slot = previous;
                Err(already_consumed::<T>())
            },
        }
    }

    /// Subscribes an async consumer.
    ///
    /// # Errors
    /// Returns [`HandoffError::AlreadyConsumed`] if another consumer already claimed the slot.
    pub fn subscribe(&self) -> Result<HandoffReceiver<T>, HandoffError> {
        let (tx, rx) = oneshot::channel();
        let mut slot = self.slot.lock();
        match std::mem::replace(&mut *slot, Slot::Delivered) {
            Slot::Empty => {
                *slot = Slot::Subscriber(tx);
                Ok(HandoffReceiver::new(rx))
            },
            Slot::Pending(value) => {
                // The receiver is still alive, so the send cannot fail.
                let _ = tx.send(value);
                Ok(HandoffReceiver::new(rx))
            },
            previous => {
                *slot = previous;
                Err(already_consumed::<T>())
            },
        }
    }

    /// Collects the pending value, if any. Succeeds at most once.
    #[must_use]
    pub fn take_pending(&self) -> Option<Arc<T>> {
        let mut slot = self.slot.lock();
        if !matches!(*slot, Slot::Pending(_)) {
            return None;
        }
        match std::mem::replace(&mut *slot, Slot::Delivered) {
            Slot::Pending(value) => Some(value),
            _ => None,
        }
    }
}

fn already_consumed<T>() -> HandoffError {
    HandoffError::AlreadyConsumed {
        message: std::any::type_name::<T>().into(),
        context: Some("slot already has a consumer".into()),
    }
}
