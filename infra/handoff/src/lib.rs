//! # Handoff
//!
//! A single-slot, exactly-once handoff between a producer and a consumer that
//! may show up in either order.
//!
//! ## Overview
//!
//! The producer calls [`Handoff::publish`]. The consumer either registers a
//! callback ([`Handoff::register`]), awaits a [`HandoffReceiver`]
//! ([`Handoff::subscribe`]), or collects a parked value later with
//! [`Handoff::take_pending`]. Whichever side arrives second completes the
//! delivery. State changes happen under a `parking_lot::Mutex`; callbacks run
//! after the lock is released.
//!
//! # Example
//!
//! ```rust
//! use dreg_handoff::{Handoff, HandoffError};
//!
//! #[derive(Debug, PartialEq)]
//! struct Snapshot { entries: usize }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), HandoffError> {
//!     let handoff = Handoff::new();
//!     let rx = handoff.subscribe()?;
//!
//!     handoff.publish(Snapshot { entries: 3 })?;
//!
//!     assert_eq!(rx.recv().await?.entries, 3);
//!     Ok(())
//! }
//! ```

mod error;
mod receiver;
mod slot;

pub use error::{HandoffError, HandoffErrorExt};
pub use receiver::HandoffReceiver;
pub use slot::{Delivery, Handoff, SlotState};
