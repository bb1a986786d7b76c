//! Vote tallies and winner selection.

use pollgate_types::CandidateId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vote counts per candidate as reported by the contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    counts: HashMap<CandidateId, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, candidate: CandidateId, count: u64) {
        self.counts.insert(candidate, count);
    }

    pub fn contains(&self, candidate: &CandidateId) -> bool {
        self.counts.contains_key(candidate)
    }

    /// Count for `candidate`; candidates the contract did not report count 0.
    pub fn count(&self, candidate: &CandidateId) -> u64 {
        self.counts.get(candidate).copied().unwrap_or(0)
    }

    /// Counts laid out in the given candidate order.
    pub fn counts_in_order(&self, candidates: &[CandidateId]) -> Vec<u64> {
        candidates.iter().map(|c| self.count(c)).collect()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, &n| acc.saturating_add(n))
    }
}

impl FromIterator<(CandidateId, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (CandidateId, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// The announced result of a poll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub candidate: CandidateId,
    pub count: u64,
    /// Other candidates that reached the same count, in contract order.
    pub tied_with: Vec<CandidateId>,
}

impl Winner {
    pub fn is_tie(&self) -> bool {
        !self.tied_with.is_empty()
    }
}

/// Pick the candidate with the highest count.
///
/// Ties go to the candidate that comes first in `candidates` (contract
/// order). Returns `None` when there are no candidates.
pub fn select_winner(candidates: &[CandidateId], tally: &Tally) -> Option<Winner> {
    let mut best: Option<(&CandidateId, u64)> = None;
    for candidate in candidates {
        let count = tally.count(candidate);
        match best {
            Some((_, top)) if count <= top => {}
            _ => best = Some((candidate, count)),
        }
    }
    let (candidate, count) = best?;
    let tied_with = candidates
        .iter()
        .filter(|c| *c != candidate && tally.count(c) == count)
        .cloned()
        .collect();
    Some(Winner {
        candidate: candidate.clone(),
        count,
        tied_with,
    })
}
