//! The failure record a producer hands to its consumer instead of a value.

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An opaque failure carried from the producer thread to the consumer.
///
/// The wrapped error keeps its concrete type, so the consumer can recover it
/// with [`Failure::downcast_ref`] or [`Failure::downcast`] after `get()`
/// hands the failure back.
///
/// # Examples
///
/// ```
/// use promise_cell::Failure;
/// use std::io;
///
/// let failure = Failure::new(io::Error::new(io::ErrorKind::Other, "disk gone"));
/// assert!(failure.is::<io::Error>());
/// assert_eq!(failure.to_string(), "disk gone");
/// ```
pub struct Failure {
    inner: BoxError,
}

/// Plain message failure built by [`Failure::msg`].
#[derive(Debug)]
struct Message(String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// Panic payload captured on the producer thread.
#[derive(Debug)]
struct Panicked(String);

impl fmt::Display for Panicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "producer panicked: {}", self.0)
    }
}

impl StdError for Panicked {}

impl Failure {
    /// Wrap any error value.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(error),
        }
    }

    /// A failure that carries only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Turn the payload of a caught panic into a failure.
    ///
    /// `&str` and `String` payloads keep their text; anything else is
    /// reported as an opaque panic.
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let text = match payload.downcast::<String>() {
            Ok(s) => *s,
            Err(payload) => match payload.downcast_ref::<&'static str>() {
                Some(s) => (*s).to_owned(),
                None => String::from("non-string panic payload"),
            },
        };
        Self::new(Panicked(text))
    }

    /// Whether the failure was captured from a producer panic.
    pub fn is_panic(&self) -> bool {
        self.inner.is::<Panicked>()
    }

    /// Whether the wrapped error is an `E`.
    pub fn is<E>(&self) -> bool
    where
        E: StdError + 'static,
    {
        self.inner.is::<E>()
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// Take the wrapped error back out as an `E`, or return the failure
    /// untouched if it holds some other type.
    pub fn downcast<E>(self) -> Result<E, Self>
    where
        E: StdError + 'static,
    {
        self.inner
            .downcast::<E>()
            .map(|e| *e)
            .map_err(|inner| Self { inner })
    }

    /// The wrapped error as a boxed trait object.
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.inner
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Failure").field(&self.inner).finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}
