//! Ledger client traits.

use async_trait::async_trait;
use pollgate_types::{CandidateId, ContractAddress, Credential};

use crate::{LedgerError, LedgerOp, Tally};

/// A signed connection to one deployed voting contract.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// The contract this client is bound to.
    fn contract_address(&self) -> &ContractAddress;

    /// The poll statement stored in the contract.
    async fn statement(&self) -> Result<String, LedgerError>;

    /// Candidates in contract order. Tie-breaking depends on this order.
    async fn candidates(&self) -> Result<Vec<CandidateId>, LedgerError>;

    /// Submit a vote and wait for confirmation. Not idempotent.
    async fn vote(&self, candidate: &CandidateId) -> Result<(), LedgerError>;

    /// Current vote counts for every candidate.
    async fn tally(&self) -> Result<Tally, LedgerError>;

    /// Votes recorded for a single candidate.
    ///
    /// Contracts with a per-candidate getter can override this; the default
    /// reads the full tally.
    async fn votes_for(&self, candidate: &CandidateId) -> Result<u64, LedgerError> {
        let tally = self.tally().await?;
        if !tally.contains(candidate) {
            return Err(LedgerError::InvalidResponse {
                op: LedgerOp::Tally,
                reason: format!("unknown candidate {candidate}"),
            });
        }
        Ok(tally.count(candidate))
    }
}

/// Factory side of the ledger: deploys new contracts and binds clients to
/// existing ones.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    /// Deploy a fresh voting contract and wait until it is mined.
    /// Not idempotent: a failed call may still have produced a contract.
    async fn deploy(
        &self,
        credential: &Credential,
        statement: &str,
        candidates: &[CandidateId],
    ) -> Result<ContractAddress, LedgerError>;

    /// Bind a client signing with `credential` to an existing contract.
    fn connect(
        &self,
        credential: &Credential,
        address: &ContractAddress,
    ) -> Result<Box<dyn LedgerClient>, LedgerError>;
}
