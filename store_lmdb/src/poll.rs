//! LMDB implementation of PollStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use pollgate_store::{check_immutable_fields, PollFilter, PollStore, StoreError};
use pollgate_types::{NewPoll, Poll, PollId};

use crate::LmdbError;

const NEXT_POLL_ID_KEY: &[u8] = b"next_poll_id";

pub struct LmdbPollStore {
    pub(crate) env: Arc<Env>,
    pub(crate) polls_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbPollStore {
    fn next_id(&self, txn: &RoTxn) -> Result<PollId, LmdbError> {
        match self.meta_db.get(txn, NEXT_POLL_ID_KEY)? {
            Some(bytes) => {
                let arr: [u8; 8] = bytes
                    .try_into()
                    .map_err(|_| LmdbError::Serialization("next_poll_id has bad length".into()))?;
                Ok(PollId(u64::from_le_bytes(arr)))
            }
            None => Ok(PollId(1)),
        }
    }

    fn read_poll(&self, txn: &RoTxn, id: PollId) -> Result<Option<Poll>, LmdbError> {
        match self.polls_db.get(txn, &id.to_key()[..])? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }
}

impl PollStore for LmdbPollStore {
    fn insert_poll(&self, poll: NewPoll) -> Result<Poll, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = self.next_id(&wtxn)?;
        if self.read_poll(&wtxn, id)?.is_some() {
            return Err(StoreError::Duplicate(id.to_string()));
        }
        let record = Poll::from_new(id, poll);
        let bytes = bincode::serialize(&record).map_err(LmdbError::from)?;
        self.polls_db
            .put(&mut wtxn, &id.to_key()[..], &bytes)
            .map_err(LmdbError::from)?;
        let next = id.as_u64().saturating_add(1).to_le_bytes();
        self.meta_db
            .put(&mut wtxn, NEXT_POLL_ID_KEY, &next[..])
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(poll_id = %id, contract = %record.contract_address, "poll record inserted");
        Ok(record)
    }

    fn get_poll(&self, id: PollId) -> Result<Option<Poll>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_poll(&rtxn, id)?)
    }

    fn put_poll(&self, poll: &Poll) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let current = self
            .read_poll(&wtxn, poll.id)?
            .ok_or_else(|| StoreError::NotFound(poll.id.to_string()))?;
        check_immutable_fields(&current, poll)?;
        let bytes = bincode::serialize(poll).map_err(LmdbError::from)?;
        self.polls_db
            .put(&mut wtxn, &poll.id.to_key()[..], &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn query_polls(&self, filter: &PollFilter) -> Result<Vec<Poll>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut polls = Vec::new();
        let iter = self.polls_db.iter(&rtxn).map_err(LmdbError::from)?;
        for result in iter {
            let (_key, val) = result.map_err(LmdbError::from)?;
            let poll: Poll = bincode::deserialize(val).map_err(LmdbError::from)?;
            if filter.matches(&poll) {
                polls.push(poll);
            }
        }
        Ok(polls)
    }

    fn poll_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.polls_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
