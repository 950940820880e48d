//! Single-flight request sharing.
//!
//! Concurrent callers asking for the same `(collection, scope)` while a fetch is
//! outstanding await that fetch instead of issuing their own. The entry is dropped
//! as soon as the fetch settles, so the next caller after completion fetches again.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;

use crate::error::ApiError;

/// Identifies one logical fetch: the collection plus its scoping id (0 = unscoped).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlightKey {
    pub collection: &'static str,
    pub scope: i64,
}

impl FlightKey {
    pub fn new(collection: &'static str, scope: i64) -> Self {
        Self { collection, scope }
    }

    pub fn unscoped(collection: &'static str) -> Self {
        Self::new(collection, 0)
    }
}

type Cell<T> = Arc<OnceCell<Result<T, ApiError>>>;

pub struct SingleFlight<T> {
    in_flight: Mutex<HashMap<FlightKey, Cell<T>>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fetch` unless an identical fetch is already running, in which case wait
    /// for and share its result.
    pub async fn run<F, Fut>(&self, key: FlightKey, fetch: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let cell = {
            let mut map = self.lock();
            Arc::clone(map.entry(key.clone()).or_default())
        };

        let result = cell.get_or_init(fetch).await.clone();

        let mut map = self.lock();
        if map.get(&key).is_some_and(|current| Arc::ptr_eq(current, &cell)) {
            map.remove(&key);
        }
        result
    }

    /// Number of fetches currently outstanding.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<FlightKey, Cell<T>>> {
        // The map is only touched in short non-panicking sections.
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    async fn slow_fetch(calls: &AtomicUsize, value: i64) -> Result<i64, ApiError> {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(value)
    }

    #[tokio::test]
    async fn concurrent_identical_fetches_share_one_call() {
        let flight = SingleFlight::<i64>::new();
        let calls = AtomicUsize::new(0);
        let key = FlightKey::new("doctors", 5);

        let (a, b, c) = tokio::join!(
            flight.run(key.clone(), || slow_fetch(&calls, 1)),
            flight.run(key.clone(), || slow_fetch(&calls, 2)),
            flight.run(key.clone(), || slow_fetch(&calls, 3)),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!((a.unwrap(), b.unwrap(), c.unwrap()), (1, 1, 1));
        assert_eq!(flight.pending(), 0);
    }

    #[tokio::test]
    async fn different_scopes_do_not_share() {
        let flight = SingleFlight::<i64>::new();
        let calls = AtomicUsize::new(0);
        let (a, b) = tokio::join!(
            flight.run(FlightKey::new("doctors", 5), || slow_fetch(&calls, 5)),
            flight.run(FlightKey::new("doctors", 6), || slow_fetch(&calls, 6)),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!((a.unwrap(), b.unwrap()), (5, 6));
    }

    #[tokio::test]
    async fn completed_fetch_is_not_cached() {
        let flight = SingleFlight::<i64>::new();
        let calls = AtomicUsize::new(0);
        let key = FlightKey::unscoped("organizations");
        flight.run(key.clone(), || slow_fetch(&calls, 1)).await.unwrap();
        let second = flight.run(key, || slow_fetch(&calls, 2)).await.unwrap();
        assert_eq!(second, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_shared_too() {
        let flight = SingleFlight::<i64>::new();
        let key = FlightKey::new("caregivers", 1);
        let failing = || async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<i64, _>(ApiError::network("down"))
        };
        let (a, b) = tokio::join!(flight.run(key.clone(), failing), flight.run(key.clone(), failing));
        assert_eq!(a.unwrap_err(), ApiError::network("down"));
        assert_eq!(b.unwrap_err(), ApiError::network("down"));
        assert_eq!(flight.pending(), 0);
    }
}
