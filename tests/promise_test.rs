#[cfg(test)]
mod tests {
    use promise_cell::{Error, Failure, Promise};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::{thread, time::Duration, time::Instant};

    #[test]
    fn test_value_after_delay() {
        let promise = Promise::<i32>::new();
        let future = promise.get_future().unwrap();
        let start = Instant::now();

        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            promise.set_value(42).unwrap();
        });

        assert_eq!(future.get().unwrap(), 42);
        assert!(start.elapsed() >= Duration::from_millis(10));
        producer.join().expect("The producer thread has panicked");
    }

    #[test]
    fn test_exception_message_preserved() {
        let promise = Promise::<i32>::new();
        promise.set_exception(Failure::msg("boom")).unwrap();
        match promise.get_future().unwrap().get() {
            Err(Error::Failed(failure)) => assert_eq!(failure.to_string(), "boom"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_double_fulfillment_keeps_first_value() {
        let promise = Promise::<i32>::new();
        promise.set_value(1).unwrap();
        let second = promise.set_value(2);
        assert!(matches!(second, Err(Error::AlreadySatisfied)));
        assert_eq!(second.unwrap_err().to_string(), "promise already satisfied");
        assert_eq!(promise.get_future().unwrap().get().unwrap(), 1);
    }

    #[test]
    fn test_string_read_on_other_thread() {
        let promise = Promise::<String>::new();
        promise.set_value(String::from("hello")).unwrap();
        let future = promise.get_future().unwrap();
        let consumer = thread::spawn(move || future.get());
        assert_eq!(
            consumer.join().expect("The consumer thread has panicked").unwrap(),
            "hello"
        );
    }

    #[test]
    fn test_get_blocks_until_fulfilled() {
        let promise = Promise::<u32>::new();
        let future = promise.get_future().unwrap();
        let returned = Arc::new(AtomicBool::new(false));

        let consumer = {
            let returned = returned.clone();
            thread::spawn(move || {
                let value = future.get();
                returned.store(true, Ordering::SeqCst);
                value
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!returned.load(Ordering::SeqCst));
        promise.set_value(7).unwrap();
        assert_eq!(consumer.join().unwrap().unwrap(), 7);
        assert!(returned.load(Ordering::SeqCst));
    }

    #[test]
    fn test_get_after_fulfillment_does_not_block() {
        let promise = Promise::<u32>::new();
        let future = promise.get_future().unwrap();
        promise.set_value(11).unwrap();
        assert!(future.is_ready());
        let start = Instant::now();
        assert_eq!(future.get().unwrap(), 11);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_no_missed_wakeup_under_stress() {
        for round in 0..500u64 {
            let promise = Promise::<u64>::new();
            let future = promise.get_future().unwrap();
            let consumer = thread::spawn(move || future.get());
            let producer = thread::spawn(move || {
                // Spread fulfillment before and after the consumer parks.
                match round % 3 {
                    0 => {}
                    1 => thread::yield_now(),
                    _ => thread::sleep(Duration::from_micros(round % 200)),
                }
                promise.set_value(round).unwrap();
            });
            producer.join().expect("The producer thread has panicked");
            assert_eq!(consumer.join().unwrap().unwrap(), round);
        }
    }

    #[test]
    fn test_racing_producers_only_one_wins() {
        for _ in 0..100 {
            let promise = Arc::new(Promise::<usize>::new());
            let future = promise.get_future().unwrap();
            let producers: Vec<_> = (0..4)
                .map(|id| {
                    let promise = promise.clone();
                    thread::spawn(move || promise.set_value(id).is_ok())
                })
                .collect();
            let wins = producers
                .into_iter()
                .map(|p| p.join().unwrap())
                .filter(|won| *won)
                .count();
            assert_eq!(wins, 1);
            assert!(future.get().unwrap() < 4);
        }
    }

    #[test]
    fn test_producer_panic_becomes_failure() {
        let promise = Promise::<i32>::new();
        let future = promise.get_future().unwrap();
        let producer = thread::spawn(move || {
            promise
                .set_with(|| {
                    let input: Option<i32> = None;
                    input.expect("input missing")
                })
                .unwrap();
        });
        producer.join().expect("The producer thread has panicked");
        match future.get() {
            Err(Error::Failed(failure)) => {
                assert!(failure.is_panic());
                assert!(failure.to_string().contains("input missing"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_producer_returns_early_breaks_promise() {
        let promise = Promise::<i32>::new();
        let future = promise.get_future().unwrap();
        let consumer = thread::spawn(move || future.get());
        thread::spawn(move || {
            let _promise = promise;
            thread::sleep(Duration::from_millis(10));
        })
        .join()
        .expect("The producer thread has panicked");
        assert!(matches!(consumer.join().unwrap(), Err(Error::BrokenPromise)));
    }
}

#[cfg(test)]
mod properties {
    use promise_cell::{channel, Error, Failure};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn value_round_trips(v in any::<Vec<i64>>()) {
            let (promise, future) = channel();
            promise.set_value(v.clone()).unwrap();
            prop_assert_eq!(future.get().unwrap(), v);
        }

        #[test]
        fn failure_round_trips(message in ".*") {
            let (promise, future) = channel::<u8>();
            promise.set_exception(Failure::msg(message.clone())).unwrap();
            match future.get() {
                Err(Error::Failed(failure)) => prop_assert_eq!(failure.to_string(), message),
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }

        #[test]
        fn only_first_fulfillment_counts(first in any::<i32>(), rest in prop::collection::vec(any::<Option<i32>>(), 1..8)) {
            let (promise, future) = channel();
            promise.set_value(first).unwrap();
            for next in rest {
                let outcome = match next {
                    Some(v) => promise.set_value(v),
                    None => promise.set_exception(Failure::msg("late")),
                };
                prop_assert!(matches!(outcome, Err(Error::AlreadySatisfied)));
            }
            prop_assert_eq!(future.get().unwrap(), first);
        }
    }
}
