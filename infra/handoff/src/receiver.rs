use crate::error::HandoffError;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// The async side of a [`Handoff`](crate::Handoff) subscription.
#[derive(Debug)]
pub struct HandoffReceiver<T> {
    rx: oneshot::Receiver<Arc<T>>,
}

impl<T> HandoffReceiver<T> {
    pub(crate) const fn new(rx: oneshot::Receiver<Arc<T>>) -> Self {
        Self { rx }
    }

    /// Waits for the published value.
    ///
    /// # Errors
    /// Returns [`HandoffError::Closed`] if every producer handle was dropped first.
    pub async fn recv(self) -> Result<Arc<T>, HandoffError> {
        self.rx.await.map_err(|_| {
            debug!(payload = std::any::type_name::<T>(), "Handoff closed before delivery");
            closed::<T>()
        })
    }

    /// Returns the value if it has already arrived.
    ///
    /// `Ok(None)` means nothing was published yet.
    ///
    /// # Errors
    /// Returns [`HandoffError::Closed`] if every producer handle was dropped first.
    pub fn try_recv(&mut self) -> Result<Option<Arc<T>>, HandoffError> {
        match self.rx.try_recv() {
            Ok(value) => Ok(Some(value)),
            Err(oneshot::error::TryRecvError::Empty) => Ok(None),
            Err(oneshot::error::TryRecvError::Closed) => Err(closed::<T>()),
        }
    }
}

fn closed<T>() -> HandoffError {
    HandoffError::Closed { message: std::any::type_name::<T>().into(), context: None }
}
