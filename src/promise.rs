use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::trace;

use crate::cell::SharedCell;
use crate::{Error, Failure, Future};

/// The producer half. Fulfill it exactly once with a value or a failure.
///
/// Dropping a `Promise` that was never fulfilled breaks it: the waiting
/// [`Future`] returns [`Error::BrokenPromise`] instead of blocking forever.
///
/// # Examples
///
/// ```
/// use promise_cell::Promise;
/// use std::thread;
///
/// let promise = Promise::<String>::new();
/// let future = promise.get_future().unwrap();
/// let consumer = thread::spawn(move || future.get());
/// promise.set_value("Hi".into()).unwrap();
/// assert_eq!(consumer.join().unwrap().unwrap(), "Hi");
/// ```
#[derive(Debug)]
pub struct Promise<T> {
    cell: Arc<SharedCell<T>>,
}

impl<T> Promise<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(SharedCell::new()),
        }
    }

    /// Hand out the consumer half bound to this promise.
    ///
    /// Only one consumer is supported; a second call returns
    /// [`Error::FutureAlreadyRetrieved`].
    pub fn get_future(&self) -> Result<Future<T>, Error> {
        self.cell.claim_future()?;
        trace!("future handed out");
        Ok(Future::new(self.cell.clone()))
    }

    /// Fulfill the promise with a value and wake the consumer.
    ///
    /// Returns [`Error::AlreadySatisfied`] if the promise already holds an
    /// outcome; the first outcome is kept.
    pub fn set_value(&self, value: T) -> Result<(), Error> {
        self.cell.store_value(value)
    }

    /// Fulfill the promise with a failure; `get()` on the consumer side
    /// returns it as [`Error::Failed`].
    pub fn set_exception(&self, failure: Failure) -> Result<(), Error> {
        self.cell.store_failure(failure)
    }

    /// `Ok` becomes the value, `Err` is wrapped into a [`Failure`].
    pub fn set_result<E>(&self, result: Result<T, E>) -> Result<(), Error>
    where
        E: StdError + Send + Sync + 'static,
    {
        match result {
            Ok(value) => self.set_value(value),
            Err(error) => self.set_exception(Failure::new(error)),
        }
    }

    /// Run `produce` on this thread and store what it returns. A panic inside
    /// `produce` is caught and stored as a failure instead of unwinding
    /// through the producer.
    ///
    /// ```
    /// use promise_cell::{Error, Promise};
    ///
    /// let promise = Promise::<u32>::new();
    /// let future = promise.get_future().unwrap();
    /// promise.set_with(|| panic!("no input")).unwrap();
    /// match future.get() {
    ///     Err(Error::Failed(failure)) => assert!(failure.is_panic()),
    ///     other => panic!("expected a failure, got {:?}", other),
    /// }
    /// ```
    pub fn set_with<F>(&self, produce: F) -> Result<(), Error>
    where
        F: FnOnce() -> T,
    {
        match panic::catch_unwind(AssertUnwindSafe(produce)) {
            Ok(value) => self.set_value(value),
            Err(payload) => self.set_exception(Failure::from_panic(payload)),
        }
    }

    pub fn is_fulfilled(&self) -> bool {
        self.cell.is_fulfilled()
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Promise<T> {
    /// If this is an unfulfilled promise, wake the consumer with an error.
    fn drop(&mut self) {
        self.cell.break_if_empty();
    }
}

/// Create a promise together with its only future.
///
/// ```
/// let (promise, future) = promise_cell::channel::<i32>();
/// promise.set_value(7).unwrap();
/// assert_eq!(future.get().unwrap(), 7);
/// ```
pub fn channel<T>() -> (Promise<T>, Future<T>) {
    let promise = Promise::new();
    let cell = promise.cell.clone();
    // A fresh cell has never handed out its future.
    let _ = cell.claim_future();
    (promise, Future::new(cell))
}
