use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use crate::cell::SharedCell;
use crate::Error;

/// The consumer half, obtained from [`Promise::get_future`](crate::Promise::get_future).
///
/// A `Future` can be moved to another thread but not cloned. Either block on
/// it with [`get`](Future::get) or `.await` it from async code; both yield
/// the value, the carried failure, or [`Error::BrokenPromise`].
///
/// # Examples
///
/// ```
/// use promise_cell::Promise;
/// use futures::executor::block_on;
/// use std::thread;
///
/// let promise = Promise::<String>::new();
/// let future = promise.get_future().unwrap();
/// let task = thread::spawn(move || block_on(async { future.await }));
/// promise.set_value("🍓".into()).unwrap();
/// assert_eq!(task.join().unwrap().unwrap(), "🍓");
/// ```
#[derive(Debug)]
pub struct Future<T> {
    cell: Arc<SharedCell<T>>,
}

impl<T> Future<T> {
    pub(crate) fn new(cell: Arc<SharedCell<T>>) -> Self {
        Self { cell }
    }

    /// Block until the promise is fulfilled and take the outcome.
    ///
    /// Returns at once if the promise was fulfilled before the call. A
    /// failure stored with `set_exception` comes back as [`Error::Failed`]
    /// holding the same [`Failure`](crate::Failure).
    pub fn get(self) -> Result<T, Error> {
        self.cell.await_and_read()
    }

    /// Whether `get` would return without blocking.
    pub fn is_ready(&self) -> bool {
        self.cell.is_ready()
    }
}

impl<T> std::future::Future for Future<T> {
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.cell.poll_read(cx)
    }
}
