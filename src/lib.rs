//! A one-shot promise/future pair for handing a single outcome from a
//! producer thread to a consumer thread.
//!
//! The producer fulfills a [`Promise`] once, with a value or a [`Failure`].
//! The consumer holds the matching [`Future`] and blocks in
//! [`Future::get`] (or `.await`s it) until that happens. Both halves share
//! one reference-counted cell, so either can be dropped first.
//!
//! ```
//! use promise_cell::{Error, Failure, Promise};
//! use std::thread;
//!
//! let promise = Promise::<u32>::new();
//! let future = promise.get_future().unwrap();
//! thread::spawn(move || promise.set_exception(Failure::msg("boom")));
//! match future.get() {
//!     Err(Error::Failed(failure)) => assert_eq!(failure.to_string(), "boom"),
//!     other => panic!("expected a failure, got {:?}", other),
//! }
//! ```

mod cell;
mod failure;
mod future;
mod promise;

pub use failure::Failure;
pub use future::Future;
pub use promise::{channel, Promise};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// `set_value`/`set_exception` after the promise already holds an outcome.
    #[error("promise already satisfied")]
    AlreadySatisfied,
    /// The single future was already handed out or its outcome already taken.
    #[error("future already retrieved")]
    FutureAlreadyRetrieved,
    /// The promise was dropped without being fulfilled.
    #[error("broken promise")]
    BrokenPromise,
    /// The failure the producer stored with `set_exception`.
    #[error(transparent)]
    Failed(Failure),
}
