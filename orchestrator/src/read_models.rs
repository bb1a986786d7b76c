//! Read-only projections joining index records with contract state.

use serde::{Deserialize, Serialize};

use pollgate_identity::Actor;
use pollgate_ledger::{with_deadline, LedgerOp};
use pollgate_store::PollFilter;
use pollgate_types::{
    CandidateId, ContractAddress, PollId, PollStateKind, RoleId, Timestamp, Usermail,
};

use crate::error::PollError;
use crate::orchestrator::PollOrchestrator;

/// A poll record joined with its contract's statement and candidates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDetails {
    pub id: PollId,
    pub creator: Usermail,
    pub contract_address: ContractAddress,
    pub status: PollStateKind,
    pub statement: String,
    pub candidates: Vec<CandidateId>,
    /// Vote counts in candidate order, when a tally was requested.
    pub counts: Option<Vec<u64>>,
    pub votes_count: usize,
    /// Whether the requesting actor has voted, when one was given.
    pub voted: Option<bool>,
    pub result: Option<CandidateId>,
    pub expiring: Option<Timestamp>,
}

/// One entry of [`OpenPolls`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPoll {
    pub id: PollId,
    pub creator: Usermail,
    pub voted: bool,
    pub votes_count: usize,
    /// `None` when the contract could not be read.
    pub statement: Option<String>,
}

/// The polls an actor can still take part in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenPolls {
    pub role_id: Option<RoleId>,
    pub polls: Vec<OpenPoll>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateVotes {
    pub candidate: CandidateId,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedPoll {
    pub id: PollId,
    pub creator: Usermail,
    pub result: CandidateId,
    pub votes_count: usize,
    pub contract_address: ContractAddress,
}

impl PollOrchestrator {
    /// A poll with its contract content and, optionally, its tally.
    ///
    /// Reads are signed as `actor` when given, otherwise as the operator.
    pub async fn poll_details(
        &self,
        poll_id: PollId,
        with_tally: bool,
        actor: Option<&Actor>,
    ) -> Result<PollDetails, PollError> {
        let poll = self.load(poll_id)?;
        let reader = actor.cloned().unwrap_or_else(|| self.identity.operator());
        let client = self.client_for(&reader, &poll)?;

        let statement =
            with_deadline(LedgerOp::Statement, self.ledger_timeout, client.statement()).await?;
        let candidates =
            with_deadline(LedgerOp::Candidates, self.ledger_timeout, client.candidates()).await?;
        let counts = if with_tally {
            let tally = with_deadline(LedgerOp::Tally, self.ledger_timeout, client.tally()).await?;
            Some(tally.counts_in_order(&candidates))
        } else {
            None
        };

        Ok(PollDetails {
            id: poll.id,
            voted: actor.map(|a| poll.has_voted(a.usermail())),
            votes_count: poll.votes_count(),
            status: poll.state.kind(),
            result: poll.result().cloned(),
            creator: poll.creator,
            contract_address: poll.contract_address,
            statement,
            candidates,
            counts,
            expiring: poll.expiring,
        })
    }

    /// Every open poll with whether `actor` has voted in it.
    ///
    /// An actor without a role, or whose role cannot be looked up, sees
    /// nothing. A poll whose contract cannot be read is listed without its
    /// statement.
    pub async fn open_polls_for_actor(&self, actor: &Actor) -> Result<OpenPolls, PollError> {
        let role_id = match self.roles.role_of(actor.usermail()).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                tracing::debug!(actor = %actor.usermail(), "actor has no role");
                return Ok(OpenPolls::default());
            }
            Err(e) => {
                tracing::warn!(actor = %actor.usermail(), error = %e, "role lookup failed");
                return Ok(OpenPolls::default());
            }
        };

        let operator = self.identity.operator();
        let mut polls = Vec::new();
        for poll in self.store.query_polls(&PollFilter::polling())? {
            let statement = match self.client_for(&operator, &poll) {
                Ok(client) => {
                    match with_deadline(LedgerOp::Statement, self.ledger_timeout, client.statement())
                        .await
                    {
                        Ok(statement) => Some(statement),
                        Err(e) => {
                            tracing::warn!(poll_id = %poll.id, error = %e, "statement unavailable");
                            None
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(poll_id = %poll.id, error = %e, "statement unavailable");
                    None
                }
            };
            polls.push(OpenPoll {
                id: poll.id,
                voted: poll.has_voted(actor.usermail()),
                votes_count: poll.votes_count(),
                creator: poll.creator,
                statement,
            });
        }

        Ok(OpenPolls {
            role_id: Some(role_id),
            polls,
        })
    }

    /// Ledger vote count for one candidate.
    pub async fn candidate_votes(
        &self,
        poll_id: PollId,
        candidate: &CandidateId,
    ) -> Result<CandidateVotes, PollError> {
        let poll = self.load(poll_id)?;
        let client = self.client_for(&self.identity.operator(), &poll)?;
        let count =
            with_deadline(LedgerOp::Tally, self.ledger_timeout, client.votes_for(candidate))
                .await?;
        Ok(CandidateVotes {
            candidate: candidate.clone(),
            count,
        })
    }

    /// The actor's role, or `None` when the actor is unknown.
    pub async fn role_of(&self, actor: &Actor) -> Result<Option<RoleId>, PollError> {
        Ok(self.roles.role_of(actor.usermail()).await?)
    }

    /// Every ended poll with its recorded result, by ascending id.
    pub fn closed_polls(&self) -> Result<Vec<ClosedPoll>, PollError> {
        let closed = self
            .store
            .query_polls(&PollFilter::ended())?
            .into_iter()
            .filter_map(|poll| {
                let result = poll.result()?.clone();
                Some(ClosedPoll {
                    id: poll.id,
                    votes_count: poll.votes_count(),
                    creator: poll.creator,
                    contract_address: poll.contract_address,
                    result,
                })
            })
            .collect();
        Ok(closed)
    }
}
