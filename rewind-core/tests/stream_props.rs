use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;
use rewind_core::{Chainable, HistoryError, Limiter, PullSource, PullSupplier, Sink};

struct Counting {
    next: u32,
    end: u32,
    pulls: Arc<Mutex<u32>>,
}

#[async_trait]
impl PullSource for Counting {
    type Item = u32;

    async fn next(&mut self) -> Result<Option<u32>, HistoryError> {
        *self.pulls.lock().unwrap() += 1;
        if self.next == self.end {
            return Ok(None);
        }
        self.next += 1;
        Ok(Some(self.next - 1))
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]

    #[test]
    fn each_branch_sees_a_prefix_until_it_stops(
        len in 0u32..60,
        stops in proptest::collection::vec(1u32..80, 1..5),
    ) {
        let pulls = Arc::new(Mutex::new(0));
        let mut supplier = PullSupplier::new(Counting { next: 0, end: len, pulls: Arc::clone(&pulls) });
        let seen: Vec<Arc<Mutex<Vec<u32>>>> =
            stops.iter().map(|_| Arc::new(Mutex::new(Vec::new()))).collect();

        for (stop, store) in stops.iter().copied().zip(&seen) {
            let store = Arc::clone(store);
            supplier.chain(Sink::new(move |i: u32| {
                let mut g = store.lock().unwrap();
                g.push(i);
                (g.len() as u32) < stop
            }));
        }

        tokio_test::block_on(supplier.start()).unwrap();

        for (stop, store) in stops.iter().copied().zip(&seen) {
            let want: Vec<u32> = (0..stop.min(len)).collect();
            prop_assert_eq!(&*store.lock().unwrap(), &want);
        }
        let longest = stops.iter().copied().max().unwrap_or(0);
        // one extra pull observes exhaustion unless every branch stopped first
        let expected_pulls = if longest <= len { longest } else { len + 1 };
        prop_assert_eq!(*pulls.lock().unwrap(), expected_pulls);
    }

    #[test]
    fn limiter_forwards_at_most_its_limit(len in 0u32..50, limit in 1usize..60) {
        let pulls = Arc::new(Mutex::new(0));
        let mut supplier = PullSupplier::new(Counting { next: 0, end: len, pulls: Arc::clone(&pulls) });
        let count = Arc::new(Mutex::new(0usize));
        let count_in = Arc::clone(&count);
        supplier.chain(Limiter::new(limit)).chain(Sink::new(move |_i: u32| {
            *count_in.lock().unwrap() += 1;
            true
        }));

        tokio_test::block_on(supplier.start()).unwrap();

        prop_assert_eq!(*count.lock().unwrap(), limit.min(len as usize));
    }
}
