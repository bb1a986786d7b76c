//! The poll record mirrored in the off-chain index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::{
    CandidateId, ContractAddress, PollRuleError, PollState, Timestamp, TypesError, Usermail,
};

/// Store-assigned poll identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(pub u64);

impl PollId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian key bytes, so that byte order matches numeric order.
    pub fn to_key(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PollId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidPollId(s.to_string()))
    }
}

/// Everything the store needs to create a poll record; the id is assigned
/// by the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPoll {
    pub creator: Usermail,
    pub contract_address: ContractAddress,
    pub expiring: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// An off-chain poll record.
///
/// Statement and candidates are deliberately absent: the canonical copy
/// lives on the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    /// Who deployed the contract. Never changes.
    pub creator: Usermail,
    /// Ledger handle. Never changes.
    pub contract_address: ContractAddress,
    pub state: PollState,
    /// Actors whose ledger vote has been recorded here.
    pub voters: BTreeSet<Usermail>,
    /// After this instant the poll is eligible for the expiry sweep.
    pub expiring: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Poll {
    /// Materialise a fresh `Polling` record from a store-assigned id.
    pub fn from_new(id: PollId, new: NewPoll) -> Self {
        Self {
            id,
            creator: new.creator,
            contract_address: new.contract_address,
            state: PollState::Polling,
            voters: BTreeSet::new(),
            expiring: new.expiring,
            created_at: new.created_at,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.state.is_polling()
    }

    pub fn result(&self) -> Option<&CandidateId> {
        self.state.result()
    }

    pub fn has_voted(&self, actor: &Usermail) -> bool {
        self.voters.contains(actor)
    }

    pub fn votes_count(&self) -> usize {
        self.voters.len()
    }

    /// Whether the expiry sweep should close this poll at `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.is_polling() && self.expiring.is_some_and(|at| at < now)
    }

    /// Check, without mutating, that `actor` may vote.
    pub fn check_vote_allowed(&self, actor: &Usermail) -> Result<(), PollRuleError> {
        if !self.is_polling() {
            return Err(PollRuleError::AlreadyEnded);
        }
        if &self.creator == actor {
            return Err(PollRuleError::SelfVote);
        }
        if self.has_voted(actor) {
            return Err(PollRuleError::DuplicateVote);
        }
        Ok(())
    }

    /// Record a voter whose ledger vote went through.
    pub fn record_voter(&mut self, actor: Usermail) -> Result<(), PollRuleError> {
        self.check_vote_allowed(&actor)?;
        self.voters.insert(actor);
        Ok(())
    }

    /// Move to `Ended` with the given winner. Fails if already ended.
    pub fn end(&mut self, result: CandidateId) -> Result<(), PollRuleError> {
        if !self.is_polling() {
            return Err(PollRuleError::AlreadyEnded);
        }
        self.state = PollState::Ended { result };
        Ok(())
    }
}
