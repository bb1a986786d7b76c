//! The create/vote/close/sweep protocols.
//!
//! The ledger and the poll index fail independently and share no
//! transaction. Each protocol orders its steps so that a failure leaves
//! the index describing a state the ledger has already reached:
//!
//! - create deploys first and indexes second; an index failure reports the
//!   orphaned contract address.
//! - vote submits to the ledger first and records the voter second; a
//!   ledger failure leaves the index untouched.
//! - close reads the tally and only then marks the poll ended.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::Instrument;

use pollgate_identity::{Actor, IdentityResolver, RoleLookup};
use pollgate_ledger::{
    select_winner, with_deadline, LedgerClient, LedgerConnector, LedgerError, LedgerOp, Winner,
};
use pollgate_store::{PollFilter, PollStore};
use pollgate_types::{CandidateId, Clock, ContractAddress, NewPoll, Poll, PollId, Timestamp};

use crate::config::OrchestratorConfig;
use crate::error::{ErrorKind, PollError};
use crate::locks::PollLocks;
use crate::spans;

/// Input of [`PollOrchestrator::create`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatePoll {
    pub statement: String,
    /// Candidates in the order the contract will report them.
    pub candidates: Vec<CandidateId>,
    pub expiring: Option<Timestamp>,
}

impl CreatePoll {
    fn validate(&self, now: Timestamp) -> Result<(), PollError> {
        if self.statement.trim().is_empty() {
            return Err(PollError::InvalidRequest("statement must not be empty".into()));
        }
        if self.candidates.is_empty() {
            return Err(PollError::InvalidRequest("at least one candidate is required".into()));
        }
        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if candidate.as_str().trim().is_empty() {
                return Err(PollError::InvalidRequest("candidate ids must not be empty".into()));
            }
            if !seen.insert(candidate) {
                return Err(PollError::InvalidRequest(format!(
                    "candidate {candidate} is listed twice"
                )));
            }
        }
        if let Some(expiring) = self.expiring {
            if expiring <= now {
                return Err(PollError::InvalidRequest(format!(
                    "expiry {expiring} is not in the future"
                )));
            }
        }
        Ok(())
    }
}

/// Output of [`PollOrchestrator::create`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPoll {
    pub poll_id: PollId,
    pub contract_address: ContractAddress,
}

/// One poll the expiry sweep could not close.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepFailure {
    pub poll_id: PollId,
    pub kind: ErrorKind,
    pub detail: String,
}

/// Outcome of one [`PollOrchestrator::sweep_expired`] run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    pub closed_count: usize,
    pub closed: Vec<PollId>,
    pub failed: Vec<SweepFailure>,
}

/// Coordinates the ledger and the poll index.
pub struct PollOrchestrator {
    pub(crate) store: Arc<dyn PollStore>,
    pub(crate) ledger: Arc<dyn LedgerConnector>,
    pub(crate) identity: IdentityResolver,
    pub(crate) roles: Arc<dyn RoleLookup>,
    pub(crate) clock: Arc<dyn Clock>,
    locks: PollLocks,
    /// Held for the duration of a sweep when single-flight is on.
    sweep_guard: Mutex<()>,
    pub(crate) ledger_timeout: Duration,
    sweep_single_flight: bool,
}

impl PollOrchestrator {
    pub fn new(
        config: &OrchestratorConfig,
        store: Arc<dyn PollStore>,
        ledger: Arc<dyn LedgerConnector>,
        identity: IdentityResolver,
        roles: Arc<dyn RoleLookup>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            ledger,
            identity,
            roles,
            clock,
            locks: PollLocks::new(config.max_in_flight),
            sweep_guard: Mutex::new(()),
            ledger_timeout: config.ledger_timeout(),
            sweep_single_flight: config.sweep_single_flight,
        }
    }

    pub fn locks(&self) -> &PollLocks {
        &self.locks
    }

    /// Deploy a contract for a new poll and index it.
    pub async fn create(&self, actor: &Actor, request: CreatePoll) -> Result<CreatedPoll, PollError> {
        let span = spans::create_span(actor.usermail().as_str());
        self.create_inner(actor, request).instrument(span).await
    }

    async fn create_inner(&self, actor: &Actor, request: CreatePoll) -> Result<CreatedPoll, PollError> {
        request.validate(self.clock.now())?;
        let _permit = self.locks.admit().await;

        // Step 1: Resolve the signing identity
        let identity = self.identity.resolve(actor)?;

        // Step 2: Deploy the contract
        let contract_address = with_deadline(
            LedgerOp::Deploy,
            self.ledger_timeout,
            self.ledger
                .deploy(&identity.credential, &request.statement, &request.candidates),
        )
        .await?;
        tracing::debug!(contract = %contract_address, "contract deployed");

        // Step 3: Index it
        let new_poll = NewPoll {
            creator: identity.usermail,
            contract_address: contract_address.clone(),
            expiring: request.expiring,
            created_at: self.clock.now(),
        };
        let poll = match self.store.insert_poll(new_poll) {
            Ok(poll) => poll,
            Err(source) => {
                tracing::error!(
                    contract = %contract_address,
                    error = %source,
                    "contract deployed but poll record not written"
                );
                return Err(PollError::OrphanedContract {
                    contract_address,
                    source,
                });
            }
        };

        tracing::info!(poll_id = %poll.id, contract = %contract_address, "poll created");
        Ok(CreatedPoll {
            poll_id: poll.id,
            contract_address,
        })
    }

    /// Cast `actor`'s vote for `candidate` and record it.
    pub async fn vote(
        &self,
        actor: &Actor,
        poll_id: PollId,
        candidate: &CandidateId,
    ) -> Result<(), PollError> {
        let span = spans::vote_span(poll_id, actor.usermail().as_str());
        self.vote_inner(actor, poll_id, candidate).instrument(span).await
    }

    async fn vote_inner(
        &self,
        actor: &Actor,
        poll_id: PollId,
        candidate: &CandidateId,
    ) -> Result<(), PollError> {
        let _guard = self.locks.acquire(poll_id).await;

        // Step 1: Load and check the poll rules
        let mut poll = self.load(poll_id)?;
        poll.check_vote_allowed(actor.usermail())
            .map_err(|rule| PollError::from_rule(poll_id, actor.usermail(), rule))?;

        // Step 2: Submit the vote
        let client = self.client_for(actor, &poll)?;
        with_deadline(LedgerOp::Vote, self.ledger_timeout, client.vote(candidate)).await?;

        // Step 3: Record the voter
        poll.record_voter(actor.usermail().clone())
            .map_err(|rule| PollError::from_rule(poll_id, actor.usermail(), rule))?;
        if let Err(source) = self.store.put_poll(&poll) {
            tracing::error!(error = %source, "vote confirmed on ledger but voter not recorded");
            return Err(PollError::VoteNotRecorded {
                poll_id,
                voter: actor.usermail().clone(),
                source,
            });
        }

        tracing::info!(votes = poll.votes_count(), "vote recorded");
        Ok(())
    }

    /// Compute the winner from the ledger tally and end the poll.
    pub async fn close(&self, actor: &Actor, poll_id: PollId) -> Result<Winner, PollError> {
        self.close_inner(actor, poll_id)
            .instrument(spans::close_span(poll_id))
            .await
    }

    async fn close_inner(&self, actor: &Actor, poll_id: PollId) -> Result<Winner, PollError> {
        let _guard = self.locks.acquire(poll_id).await;

        // Step 1: Load the poll
        let mut poll = self.load(poll_id)?;
        if !poll.is_polling() {
            return Err(PollError::AlreadyEnded(poll_id));
        }

        // Step 2: Read the contract
        let client = self.client_for(actor, &poll)?;
        let statement =
            with_deadline(LedgerOp::Statement, self.ledger_timeout, client.statement()).await?;
        let candidates =
            with_deadline(LedgerOp::Candidates, self.ledger_timeout, client.candidates()).await?;
        let tally = with_deadline(LedgerOp::Tally, self.ledger_timeout, client.tally()).await?;
        tracing::debug!(%statement, total = tally.total(), "tally read");

        // Step 3: Pick the winner
        let winner = select_winner(&candidates, &tally).ok_or_else(|| LedgerError::InvalidResponse {
            op: LedgerOp::Candidates,
            reason: "contract reports no candidates".into(),
        })?;
        if winner.is_tie() {
            tracing::warn!(
                winner = %winner.candidate,
                count = winner.count,
                tied_with = ?winner.tied_with,
                "tie broken by contract order"
            );
        }

        // Step 4: End the poll
        poll.end(winner.candidate.clone())
            .map_err(|rule| PollError::from_rule(poll_id, actor.usermail(), rule))?;
        self.store.put_poll(&poll)?;

        tracing::info!(result = %winner.candidate, count = winner.count, "poll ended");
        Ok(winner)
    }

    /// Close every open poll whose expiry has passed, as the operator.
    ///
    /// Polls are closed one after another; a failure is recorded in the
    /// report and the sweep moves on.
    pub async fn sweep_expired(&self) -> Result<SweepReport, PollError> {
        self.sweep_inner().instrument(spans::sweep_span()).await
    }

    async fn sweep_inner(&self) -> Result<SweepReport, PollError> {
        let _single_flight = if self.sweep_single_flight {
            match self.sweep_guard.try_lock() {
                Ok(guard) => Some(guard),
                Err(_) => {
                    tracing::warn!("expiry sweep already running");
                    return Err(PollError::SweepInProgress);
                }
            }
        } else {
            None
        };

        let now = self.clock.now();
        let expired = self.store.query_polls(&PollFilter::expired_at(now))?;
        tracing::debug!(%now, candidates = expired.len(), "expiry sweep started");

        let operator = self.identity.operator();
        let mut report = SweepReport::default();
        for poll in expired {
            match self.close(&operator, poll.id).await {
                Ok(_) => report.closed.push(poll.id),
                // Closed by someone else since the query.
                Err(PollError::AlreadyEnded(_)) => {}
                Err(e) => {
                    tracing::warn!(poll_id = %poll.id, error = %e, "sweep could not close poll");
                    report.failed.push(SweepFailure {
                        poll_id: poll.id,
                        kind: e.kind(),
                        detail: e.to_string(),
                    });
                }
            }
        }
        report.closed_count = report.closed.len();

        tracing::info!(
            closed = report.closed_count,
            failed = report.failed.len(),
            "expiry sweep finished"
        );
        Ok(report)
    }

    pub(crate) fn load(&self, poll_id: PollId) -> Result<Poll, PollError> {
        self.store.get_poll(poll_id)?.ok_or(PollError::NotFound(poll_id))
    }

    /// A ledger client for `poll`'s contract signing as `actor`.
    pub(crate) fn client_for(
        &self,
        actor: &Actor,
        poll: &Poll,
    ) -> Result<Box<dyn LedgerClient>, PollError> {
        let identity = self.identity.resolve(actor)?;
        Ok(self.ledger.connect(&identity.credential, &poll.contract_address)?)
    }
}
