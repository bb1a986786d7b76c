use std::collections::HashMap;
use std::sync::{Arc, MutexGuard, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard, OwnedSemaphorePermit, Semaphore};

use pollgate_types::PollId;

type LockMap = HashMap<PollId, Arc<Mutex<()>>>;

/// Per-poll locks for the orchestrator.
/// Operations on different polls run concurrently.
/// Vote and Close on the same poll are serialized.
pub struct PollLocks {
    /// Per-poll mutexes, present only while someone holds or waits on them
    poll_locks: Arc<std::sync::Mutex<LockMap>>,
    /// Maximum concurrent mutating operations
    max_in_flight: usize,
    /// Semaphore for limiting total concurrency
    semaphore: Arc<Semaphore>,
}

/// Held for the whole read-check-act sequence on one poll.
///
/// Dropping it, including when the owning future is cancelled, releases
/// the poll and removes its lock entry once nobody else needs it.
pub struct PollGuard {
    id: PollId,
    map: Arc<std::sync::Mutex<LockMap>>,
    permit: Option<OwnedSemaphorePermit>,
    poll: Option<OwnedMutexGuard<()>>,
}

impl Drop for PollGuard {
    fn drop(&mut self) {
        self.permit.take();
        self.poll.take();
        let mut locks = lock_map(&self.map);
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

// The map is only touched in short non-async sections, so a poisoned lock
// still holds a consistent map.
fn lock_map(map: &std::sync::Mutex<LockMap>) -> MutexGuard<'_, LockMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PollLocks {
    pub fn new(max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            poll_locks: Arc::new(std::sync::Mutex::new(HashMap::new())),
            max_in_flight,
            semaphore: Arc::new(Semaphore::new(max_in_flight)),
        }
    }

    /// Get or create the lock for a specific poll.
    fn poll_lock(&self, id: PollId) -> Arc<Mutex<()>> {
        lock_map(&self.poll_locks)
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Take a slot for an operation that is not tied to an existing poll.
    ///
    /// The semaphore is never closed, so this only returns `None` if that
    /// changes; callers then proceed unthrottled.
    pub async fn admit(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.semaphore).acquire_owned().await.ok()
    }

    /// Take exclusive access to one poll, then a slot.
    ///
    /// Callers queued on a busy poll hold no slot while they wait.
    pub async fn acquire(&self, id: PollId) -> PollGuard {
        let mut guard = PollGuard {
            id,
            map: Arc::clone(&self.poll_locks),
            permit: None,
            poll: None,
        };
        let lock = self.poll_lock(id);
        guard.poll = Some(lock.lock_owned().await);
        guard.permit = self.admit().await;
        guard
    }

    /// Returns the concurrency limit.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Number of polls with a lock entry.
    pub fn tracked_polls(&self) -> usize {
        lock_map(&self.poll_locks).len()
    }
}
