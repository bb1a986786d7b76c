//! RPC request and response payloads.

use pollgate_identity::Actor;
use pollgate_ledger::Winner;
use pollgate_orchestrator::{ClosedPoll, CreatePoll};
use pollgate_types::{CandidateId, PollId, RoleId, Timestamp, Usermail};
use serde::{Deserialize, Serialize};

// ── Actor ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActorPayload {
    pub usermail: Usermail,
    /// Hex signing key; the operator default is used when absent.
    #[serde(default)]
    pub privatekey: Option<String>,
}

impl From<ActorPayload> for Actor {
    fn from(p: ActorPayload) -> Self {
        let actor = Actor::new(p.usermail);
        match p.privatekey {
            Some(key) => actor.with_private_key(key),
            None => actor,
        }
    }
}

// ── Create ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRequest {
    pub actor: ActorPayload,
    pub statement: String,
    pub candidates: Vec<CandidateId>,
    /// Unix seconds after which the poll may be closed by the sweep.
    /// Must be later than the current time, or the request is rejected
    /// as `InvalidRequest`.
    #[serde(default)]
    pub expiring: Option<Timestamp>,
}

impl CreateRequest {
    pub fn into_parts(self) -> (Actor, CreatePoll) {
        (
            self.actor.into(),
            CreatePoll {
                statement: self.statement,
                candidates: self.candidates,
                expiring: self.expiring,
            },
        )
    }
}

// ── Vote ─────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub actor: ActorPayload,
    pub poll_id: PollId,
    pub candidate: CandidateId,
}

#[derive(Serialize)]
pub struct VoteResponse {
    pub status: bool,
}

// ── Poll details ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDetailsRequest {
    pub poll_id: PollId,
    #[serde(default)]
    pub with_tally: bool,
    #[serde(default)]
    pub actor: Option<ActorPayload>,
}

// ── Open polls / role ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActorRequest {
    pub actor: ActorPayload,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub role_id: Option<RoleId>,
}

// ── Close ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRequest {
    pub actor: ActorPayload,
    pub poll_id: PollId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseResponse {
    pub candidate: CandidateId,
    pub count: u64,
    pub tied_with: Vec<CandidateId>,
}

impl From<Winner> for CloseResponse {
    fn from(w: Winner) -> Self {
        Self {
            candidate: w.candidate,
            count: w.count,
            tied_with: w.tied_with,
        }
    }
}

// ── Candidate votes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateVotesRequest {
    pub poll_id: PollId,
    pub candidate: CandidateId,
}

// ── Closed polls ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ClosedPollsResponse {
    pub polls: Vec<ClosedPoll>,
}
