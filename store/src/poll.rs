//! Poll index storage trait.

use pollgate_types::{NewPoll, Poll, PollId, PollStateKind, Timestamp, Usermail};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Filter for [`PollStore::query_polls`]. Unset fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollFilter {
    pub state: Option<PollStateKind>,
    /// Only polls whose `expiring` is set and strictly before this instant.
    pub expiring_before: Option<Timestamp>,
    pub creator: Option<Usermail>,
}

impl PollFilter {
    /// Every poll still open for votes.
    pub fn polling() -> Self {
        Self {
            state: Some(PollStateKind::Polling),
            ..Self::default()
        }
    }

    /// Every ended poll.
    pub fn ended() -> Self {
        Self {
            state: Some(PollStateKind::Ended),
            ..Self::default()
        }
    }

    /// Open polls whose expiry lies before `now`.
    pub fn expired_at(now: Timestamp) -> Self {
        Self {
            state: Some(PollStateKind::Polling),
            expiring_before: Some(now),
            ..Self::default()
        }
    }

    pub fn matches(&self, poll: &Poll) -> bool {
        if let Some(state) = self.state {
            if poll.state.kind() != state {
                return false;
            }
        }
        if let Some(before) = self.expiring_before {
            match poll.expiring {
                Some(at) if at < before => {}
                _ => return false,
            }
        }
        if let Some(creator) = &self.creator {
            if &poll.creator != creator {
                return false;
            }
        }
        true
    }
}

/// Check that an update leaves the write-once fields alone.
pub fn check_immutable_fields(current: &Poll, next: &Poll) -> Result<(), StoreError> {
    let field = if current.creator != next.creator {
        "creator"
    } else if current.contract_address != next.contract_address {
        "contract_address"
    } else if current.created_at != next.created_at {
        "created_at"
    } else {
        return Ok(());
    };
    Err(StoreError::ImmutableField {
        poll_id: current.id.to_string(),
        field,
    })
}

/// Trait for the off-chain poll index.
pub trait PollStore: Send + Sync {
    /// Create a poll record, assigning it a fresh id.
    fn insert_poll(&self, poll: NewPoll) -> Result<Poll, StoreError>;

    /// Exact lookup by id.
    fn get_poll(&self, id: PollId) -> Result<Option<Poll>, StoreError>;

    /// Overwrite an existing record (last writer wins).
    ///
    /// Fails with [`StoreError::NotFound`] for an unknown id and with
    /// [`StoreError::ImmutableField`] if a write-once field differs.
    fn put_poll(&self, poll: &Poll) -> Result<(), StoreError>;

    /// Filtered scan, ordered by ascending id.
    fn query_polls(&self, filter: &PollFilter) -> Result<Vec<Poll>, StoreError>;

    /// Total number of records.
    fn poll_count(&self) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollgate_types::{CandidateId, ContractAddress};

    fn poll(id: u64, expiring: Option<u64>) -> Poll {
        Poll::from_new(
            PollId(id),
            NewPoll {
                creator: Usermail::new("op@x.io").unwrap(),
                contract_address: ContractAddress::parse("0xabc").unwrap(),
                expiring: expiring.map(Timestamp::new),
                created_at: Timestamp::EPOCH,
            },
        )
    }

    #[test]
    fn expired_filter_skips_unset_and_future_expiry() {
        let filter = PollFilter::expired_at(Timestamp::new(50));
        assert!(filter.matches(&poll(1, Some(49))));
        assert!(!filter.matches(&poll(2, Some(50))));
        assert!(!filter.matches(&poll(3, Some(51))));
        assert!(!filter.matches(&poll(4, None)));
    }

    #[test]
    fn state_filter_separates_open_and_ended() {
        let open = poll(1, None);
        let mut ended = poll(2, None);
        ended.end(CandidateId::from("A")).unwrap();
        assert!(PollFilter::polling().matches(&open));
        assert!(!PollFilter::polling().matches(&ended));
        assert!(PollFilter::ended().matches(&ended));
        assert!(PollFilter::default().matches(&ended));
    }

    #[test]
    fn immutable_fields_are_guarded() {
        let current = poll(1, None);
        let mut next = current.clone();
        next.voters.insert(Usermail::new("a@x.io").unwrap());
        assert!(check_immutable_fields(&current, &next).is_ok());

        next.contract_address = ContractAddress::parse("0xdef").unwrap();
        assert!(matches!(
            check_immutable_fields(&current, &next),
            Err(StoreError::ImmutableField { field: "contract_address", .. })
        ));
    }
}
