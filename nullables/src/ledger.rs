//! Nullable ledger: in-memory voting contracts for testing.

use async_trait::async_trait;
use pollgate_ledger::{LedgerClient, LedgerConnector, LedgerError, LedgerOp, Tally};
use pollgate_types::{CandidateId, ContractAddress, Credential};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Observable state of one in-memory contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractSnapshot {
    pub statement: String,
    pub candidates: Vec<CandidateId>,
    pub tally: Tally,
    pub deployer: [u8; 32],
    /// Signer key bytes of every confirmed vote, in order.
    pub signers: Vec<[u8; 32]>,
}

#[derive(Default)]
struct LedgerState {
    contracts: HashMap<ContractAddress, ContractSnapshot>,
    deployed: u64,
    queued_addresses: VecDeque<ContractAddress>,
    fail_deploy: Option<LedgerError>,
    fail_vote: Option<LedgerError>,
    fail_reads: Option<LedgerError>,
    vote_delay: Option<Duration>,
    deploy_delay: Option<Duration>,
    vote_attempts: u64,
}

/// An in-memory ledger: deploys contracts, records votes, reports tallies.
///
/// Every contract handed out by [`LedgerConnector::connect`] shares this
/// ledger's state, so votes are visible to later clients.
#[derive(Clone, Default)]
pub struct NullLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next deploy returns this address instead of a generated one.
    pub fn queue_address(&self, address: ContractAddress) {
        self.state.lock().unwrap().queued_addresses.push_back(address);
    }

    /// The next deploy fails with `error`.
    pub fn fail_next_deploy(&self, error: LedgerError) {
        self.state.lock().unwrap().fail_deploy = Some(error);
    }

    /// The next vote fails with `error` and is not counted.
    pub fn fail_next_vote(&self, error: LedgerError) {
        self.state.lock().unwrap().fail_vote = Some(error);
    }

    /// Every statement/candidates/tally read fails until cleared with `None`.
    pub fn set_read_failure(&self, error: Option<LedgerError>) {
        self.state.lock().unwrap().fail_reads = error;
    }

    /// Every vote waits this long before confirming.
    pub fn set_vote_delay(&self, delay: Duration) {
        self.state.lock().unwrap().vote_delay = Some(delay);
    }

    /// Every deploy waits this long before confirming.
    pub fn set_deploy_delay(&self, delay: Duration) {
        self.state.lock().unwrap().deploy_delay = Some(delay);
    }

    /// Overwrite the tally of a deployed contract.
    pub fn set_tally(&self, address: &ContractAddress, tally: Tally) {
        if let Some(contract) = self.state.lock().unwrap().contracts.get_mut(address) {
            contract.tally = tally;
        }
    }

    /// Place a contract at `address` without going through deploy.
    pub fn install(&self, address: ContractAddress, statement: &str, candidates: &[&str]) {
        let candidates: Vec<CandidateId> = candidates.iter().map(|c| CandidateId::from(*c)).collect();
        let tally = candidates.iter().cloned().map(|c| (c, 0)).collect();
        self.state.lock().unwrap().contracts.insert(
            address,
            ContractSnapshot {
                statement: statement.to_string(),
                candidates,
                tally,
                deployer: [0; 32],
                signers: Vec::new(),
            },
        );
    }

    pub fn contract(&self, address: &ContractAddress) -> Option<ContractSnapshot> {
        self.state.lock().unwrap().contracts.get(address).cloned()
    }

    pub fn deploy_count(&self) -> u64 {
        self.state.lock().unwrap().deployed
    }

    /// Votes submitted, including failed ones.
    pub fn vote_attempts(&self) -> u64 {
        self.state.lock().unwrap().vote_attempts
    }
}

#[async_trait]
impl LedgerConnector for NullLedger {
    async fn deploy(
        &self,
        credential: &Credential,
        statement: &str,
        candidates: &[CandidateId],
    ) -> Result<ContractAddress, LedgerError> {
        let delay = self.state.lock().unwrap().deploy_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_deploy.take() {
            return Err(error);
        }
        state.deployed += 1;
        let address = match state.queued_addresses.pop_front() {
            Some(address) => address,
            None => ContractAddress::parse(&format!("0x{:040x}", state.deployed)).map_err(|e| {
                LedgerError::InvalidResponse {
                    op: LedgerOp::Deploy,
                    reason: e.to_string(),
                }
            })?,
        };
        state.contracts.insert(
            address.clone(),
            ContractSnapshot {
                statement: statement.to_string(),
                candidates: candidates.to_vec(),
                tally: candidates.iter().cloned().map(|c| (c, 0)).collect(),
                deployer: *credential.as_bytes(),
                signers: Vec::new(),
            },
        );
        Ok(address)
    }

    fn connect(
        &self,
        credential: &Credential,
        address: &ContractAddress,
    ) -> Result<Box<dyn LedgerClient>, LedgerError> {
        Ok(Box::new(NullContract {
            address: address.clone(),
            signer: *credential.as_bytes(),
            state: Arc::clone(&self.state),
        }))
    }
}

struct NullContract {
    address: ContractAddress,
    signer: [u8; 32],
    state: Arc<Mutex<LedgerState>>,
}

impl NullContract {
    fn read<T>(
        &self,
        op: LedgerOp,
        f: impl FnOnce(&ContractSnapshot) -> T,
    ) -> Result<T, LedgerError> {
        let state = self.state.lock().unwrap();
        if let Some(error) = &state.fail_reads {
            return Err(error.clone());
        }
        state
            .contracts
            .get(&self.address)
            .map(f)
            .ok_or_else(|| LedgerError::Reverted {
                op,
                reason: format!("no contract at {}", self.address),
            })
    }
}

#[async_trait]
impl LedgerClient for NullContract {
    fn contract_address(&self) -> &ContractAddress {
        &self.address
    }

    async fn statement(&self) -> Result<String, LedgerError> {
        self.read(LedgerOp::Statement, |c| c.statement.clone())
    }

    async fn candidates(&self) -> Result<Vec<CandidateId>, LedgerError> {
        self.read(LedgerOp::Candidates, |c| c.candidates.clone())
    }

    async fn vote(&self, candidate: &CandidateId) -> Result<(), LedgerError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.vote_attempts += 1;
            state.vote_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_vote.take() {
            return Err(error);
        }
        let contract = state
            .contracts
            .get_mut(&self.address)
            .ok_or_else(|| LedgerError::Reverted {
                op: LedgerOp::Vote,
                reason: format!("no contract at {}", self.address),
            })?;
        if !contract.candidates.contains(candidate) {
            return Err(LedgerError::Reverted {
                op: LedgerOp::Vote,
                reason: format!("invalid candidate {candidate}"),
            });
        }
        let count = contract.tally.count(candidate);
        contract.tally.set(candidate.clone(), count + 1);
        contract.signers.push(self.signer);
        Ok(())
    }

    async fn tally(&self) -> Result<Tally, LedgerError> {
        self.read(LedgerOp::Tally, |c| c.tally.clone())
    }
}
