//! Nullable store: thread-safe in-memory poll index for testing.

use pollgate_store::{check_immutable_fields, PollFilter, PollStore, StoreError};
use pollgate_types::{NewPoll, Poll, PollId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// An in-memory poll index for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullPollStore {
    polls: Mutex<BTreeMap<PollId, Poll>>,
    next_id: AtomicU64,
    fail_next_insert: AtomicBool,
    fail_next_put: AtomicBool,
    fail_queries: AtomicBool,
    puts: AtomicU64,
}

impl NullPollStore {
    pub fn new() -> Self {
        Self {
            polls: Mutex::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            fail_next_insert: AtomicBool::new(false),
            fail_next_put: AtomicBool::new(false),
            fail_queries: AtomicBool::new(false),
            puts: AtomicU64::new(0),
        }
    }

    /// Place a record directly, bypassing the create protocol. The id
    /// sequence moves past it.
    pub fn seed(&self, poll: Poll) {
        self.next_id.fetch_max(poll.id.as_u64() + 1, Ordering::SeqCst);
        self.polls.lock().unwrap().insert(poll.id, poll);
    }

    /// The next `insert_poll` fails with a backend error.
    pub fn fail_next_insert(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    /// The next `put_poll` fails with a backend error.
    pub fn fail_next_put(&self) {
        self.fail_next_put.store(true, Ordering::SeqCst);
    }

    /// Make every `query_polls` fail until called again with `false`.
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `put_poll` calls.
    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self, id: PollId) -> Option<Poll> {
        self.polls.lock().unwrap().get(&id).cloned()
    }
}

impl Default for NullPollStore {
    fn default() -> Self {
        Self::new()
    }
}

fn injected(op: &str) -> StoreError {
    StoreError::Backend(format!("injected {op} failure"))
}

impl PollStore for NullPollStore {
    fn insert_poll(&self, poll: NewPoll) -> Result<Poll, StoreError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Err(injected("insert"));
        }
        let id = PollId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = Poll::from_new(id, poll);
        self.polls.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    fn get_poll(&self, id: PollId) -> Result<Option<Poll>, StoreError> {
        Ok(self.polls.lock().unwrap().get(&id).cloned())
    }

    fn put_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        if self.fail_next_put.swap(false, Ordering::SeqCst) {
            return Err(injected("put"));
        }
        let mut polls = self.polls.lock().unwrap();
        let current = polls
            .get(&poll.id)
            .ok_or_else(|| StoreError::NotFound(poll.id.to_string()))?;
        check_immutable_fields(current, poll)?;
        polls.insert(poll.id, poll.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn query_polls(&self, filter: &PollFilter) -> Result<Vec<Poll>, StoreError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(injected("query"));
        }
        Ok(self
            .polls
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn poll_count(&self) -> Result<u64, StoreError> {
        Ok(self.polls.lock().unwrap().len() as u64)
    }
}
