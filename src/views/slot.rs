//! Per-view request slot
//!
//! Holds the busy flag and the cancellation handle of a view's outstanding
//! call. Every call is tagged with a generation number; a result is applied
//! only if its generation is still current, so a response from a cancelled
//! or superseded call never lands in the view.

use crate::errors::{Result, SchoaError};
use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What happens when a view submits while a call is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPolicy {
    /// Cancel the outstanding call and start the new one
    #[default]
    Supersede,
    /// Refuse the new submission
    Reject,
}

#[derive(Debug, Default)]
struct SlotState {
    busy: bool,
    generation: u64,
    abort: Option<AbortHandle>,
}

impl SlotState {
    fn release(&mut self) {
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
        self.busy = false;
    }
}

/// Permission to run one call; consumed by [`RequestSlot::run`]
///
/// Dropping a ticket whose call never finished frees the slot, so a caller
/// that abandons the future (timeout, `select!`, task abort) leaves the view
/// idle rather than busy.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    registration: Option<AbortRegistration>,
    state: Arc<Mutex<SlotState>>,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Ticket {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.busy && state.generation == self.generation {
            tracing::debug!(generation = self.generation, "request abandoned, freeing slot");
            state.release();
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestSlot {
    inner: Arc<Mutex<SlotState>>,
    policy: SubmitPolicy,
}

impl RequestSlot {
    pub fn new(policy: SubmitPolicy) -> Self {
        Self {
            inner: Arc::default(),
            policy,
        }
    }

    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the slot busy and hand out a ticket for the next call
    pub fn begin(&self) -> Result<Ticket> {
        let mut state = self.state();
        if state.busy {
            match self.policy {
                SubmitPolicy::Reject => {
                    return Err(SchoaError::Rejected(
                        "a request is already in flight for this view".to_string(),
                    ))
                }
                SubmitPolicy::Supersede => {
                    if let Some(handle) = state.abort.take() {
                        handle.abort();
                    }
                    tracing::debug!(generation = state.generation, "superseding in-flight request");
                }
            }
        }

        let (handle, registration) = AbortHandle::new_pair();
        state.generation += 1;
        state.busy = true;
        state.abort = Some(handle);

        Ok(Ticket {
            generation: state.generation,
            registration: Some(registration),
            state: self.inner.clone(),
        })
    }

    /// Drive `call` to completion unless cancelled, then hand the value to
    /// `apply` if the ticket is still current
    pub async fn run<F, T>(&self, mut ticket: Ticket, call: F, apply: impl FnOnce(&T)) -> Result<T>
    where
        F: Future<Output = T>,
    {
        let generation = ticket.generation;
        let registration = match ticket.registration.take() {
            Some(registration) => registration,
            None => return Err(SchoaError::Cancelled),
        };
        match Abortable::new(call, registration).await {
            Ok(value) => {
                if self.complete(generation, || apply(&value)) {
                    Ok(value)
                } else {
                    tracing::debug!(generation, "dropping stale response");
                    Err(SchoaError::Cancelled)
                }
            }
            Err(_) => Err(SchoaError::Cancelled),
        }
    }

    fn complete(&self, generation: u64, apply: impl FnOnce()) -> bool {
        let mut state = self.state();
        if state.generation != generation {
            return false;
        }
        state.busy = false;
        state.abort = None;
        apply();
        true
    }

    /// Abort the outstanding call, if any. Returns whether one was cancelled.
    pub fn cancel(&self) -> bool {
        let mut state = self.state();
        if !state.busy {
            return false;
        }
        state.release();
        state.generation += 1;
        true
    }

    /// Cancel only if the call started under `generation` is still in flight
    pub fn cancel_generation(&self, generation: u64) -> bool {
        let mut state = self.state();
        if !state.busy || state.generation != generation {
            return false;
        }
        state.release();
        state.generation += 1;
        true
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }
}
