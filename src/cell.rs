//! The shared slot between a [`Promise`](crate::Promise) and its
//! [`Future`](crate::Future).
//!
//! Every read and write of the slot happens under `inner`'s lock. A blocking
//! reader parks on `ready`; an async reader leaves its waker in `inner`. The
//! writer wakes both after it leaves the critical section.

use std::mem;
use std::task::{Context, Poll, Waker};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace, warn};

use crate::{Error, Failure};

#[derive(Debug)]
enum Slot<T> {
    Empty,
    Value(T),
    Failure(Failure),
    Broken,
    Retrieved,
}

impl<T> Slot<T> {
    /// Move the outcome out, leaving `Retrieved` behind. `None` while empty.
    fn take(&mut self) -> Option<Result<T, Error>> {
        if matches!(self, Slot::Empty) {
            return None;
        }
        Some(match mem::replace(self, Slot::Retrieved) {
            Slot::Value(value) => Ok(value),
            Slot::Failure(failure) => Err(Error::Failed(failure)),
            Slot::Broken => Err(Error::BrokenPromise),
            Slot::Retrieved | Slot::Empty => Err(Error::FutureAlreadyRetrieved),
        })
    }
}

#[derive(Debug)]
struct Inner<T> {
    slot: Slot<T>,
    waker: Option<Waker>,
    future_claimed: bool,
}

#[derive(Debug)]
pub(crate) struct SharedCell<T> {
    inner: Mutex<Inner<T>>,
    ready: Condvar,
}

impl<T> SharedCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                slot: Slot::Empty,
                waker: None,
                future_claimed: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Record that the single consumer handle has been handed out.
    pub(crate) fn claim_future(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        if mem::replace(&mut inner.future_claimed, true) {
            warn!("future requested twice from the same promise");
            return Err(Error::FutureAlreadyRetrieved);
        }
        Ok(())
    }

    pub(crate) fn store_value(&self, value: T) -> Result<(), Error> {
        self.store(Slot::Value(value))
    }

    pub(crate) fn store_failure(&self, failure: Failure) -> Result<(), Error> {
        self.store(Slot::Failure(failure))
    }

    /// Mark the slot broken if the producer is leaving without an outcome.
    pub(crate) fn break_if_empty(&self) {
        let mut inner = self.inner.lock();
        if !matches!(inner.slot, Slot::Empty) {
            return;
        }
        inner.slot = Slot::Broken;
        if inner.future_claimed {
            warn!("promise dropped without a value; waiting future is broken");
        }
        let waker = inner.waker.take();
        drop(inner);
        self.wake(waker);
    }

    fn store(&self, outcome: Slot<T>) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        if !matches!(inner.slot, Slot::Empty) {
            warn!("promise fulfilled twice; keeping the first outcome");
            return Err(Error::AlreadySatisfied);
        }
        let failure = matches!(outcome, Slot::Failure(_));
        trace!(failure, "storing outcome");
        inner.slot = outcome;
        let waker = inner.waker.take();
        drop(inner);
        self.wake(waker);
        Ok(())
    }

    fn wake(&self, waker: Option<Waker>) {
        // At most one consumer exists, so one notification is enough.
        self.ready.notify_one();
        if let Some(waker) = waker {
            waker.wake();
        }
    }

    /// Block the calling thread until an outcome is stored, then move it out.
    pub(crate) fn await_and_read(&self) -> Result<T, Error> {
        let mut inner = self.inner.lock();
        if let Some(outcome) = inner.slot.take() {
            trace!("outcome already present");
            return outcome;
        }
        debug!("waiting for promise to be fulfilled");
        loop {
            self.ready.wait(&mut inner);
            if let Some(outcome) = inner.slot.take() {
                debug!("promise fulfilled, waiter resumed");
                return outcome;
            }
        }
    }

    /// Non-blocking counterpart of [`await_and_read`](Self::await_and_read)
    /// for async consumers.
    pub(crate) fn poll_read(&self, cx: &mut Context<'_>) -> Poll<Result<T, Error>> {
        let mut inner = self.inner.lock();
        match inner.slot.take() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                let stale = !matches!(&inner.waker, Some(w) if w.will_wake(cx.waker()));
                if stale {
                    inner.waker = Some(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }

    /// True once an outcome has been stored, even if already read.
    pub(crate) fn is_fulfilled(&self) -> bool {
        !matches!(self.inner.lock().slot, Slot::Empty)
    }

    /// True while an outcome is stored and not yet read.
    pub(crate) fn is_ready(&self) -> bool {
        matches!(
            self.inner.lock().slot,
            Slot::Value(_) | Slot::Failure(_) | Slot::Broken
        )
    }
}
