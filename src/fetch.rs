use std::future::Future;
use thiserror::Error;
use tokio::task::{AbortHandle, JoinHandle};

/// Why a view load did not land in the view's state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("superseded by a newer request")]
    Superseded,

    #[error("session expired")]
    Unauthorized,
}

/// Identifies one fetch started through a [`LatestRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// One "in flight and relevant" fetch per view. Starting a new fetch aborts
/// the previous task; results carrying a stale ticket must be discarded.
#[derive(Debug, Default)]
pub struct LatestRequest {
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl LatestRequest {
    /// Spawns `future` as the view's current fetch.
    pub fn start<F>(&mut self, future: F) -> (Ticket, JoinHandle<F::Output>)
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(future);
        self.generation += 1;
        self.in_flight = Some(handle.abort_handle());
        (Ticket(self.generation), handle)
    }

    /// Marks `ticket` finished. Returns false when a newer fetch replaced it.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Aborts the in-flight fetch, if any, and invalidates its ticket.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
            self.generation += 1;
        }
    }
}

/// Awaits a fetch started by [`LatestRequest::start`]; an aborted task
/// reports `Superseded`.
pub async fn join_latest<T>(handle: JoinHandle<T>) -> Result<T, ViewError> {
    match handle.await {
        Ok(value) => Ok(value),
        Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
        Err(_) => Err(ViewError::Superseded),
    }
}
