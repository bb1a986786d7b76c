//! Routes named actions with JSON bodies to the orchestrator.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::Instrument;

use pollgate_identity::Actor;
use pollgate_orchestrator::PollOrchestrator;

use crate::error::{ErrorEnvelope, RpcError};
use crate::handlers::{
    ActorRequest, CandidateVotesRequest, CloseRequest, CloseResponse, ClosedPollsResponse,
    CreateRequest, PollDetailsRequest, RoleResponse, VoteRequest, VoteResponse,
};

/// Every action the RPC surface accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RpcAction {
    Create,
    Vote,
    PollDetails,
    OpenPolls,
    Close,
    SweepExpired,
    CandidateVotes,
    RoleOf,
    ClosedPolls,
}

impl RpcAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Vote => "vote",
            Self::PollDetails => "poll_details",
            Self::OpenPolls => "open_polls",
            Self::Close => "close",
            Self::SweepExpired => "sweep_expired",
            Self::CandidateVotes => "candidate_votes",
            Self::RoleOf => "role_of",
            Self::ClosedPolls => "closed_polls",
        }
    }
}

impl FromStr for RpcAction {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "create" => Self::Create,
            "vote" => Self::Vote,
            "poll_details" => Self::PollDetails,
            "open_polls" => Self::OpenPolls,
            "close" => Self::Close,
            "sweep_expired" => Self::SweepExpired,
            "candidate_votes" => Self::CandidateVotes,
            "role_of" => Self::RoleOf,
            "closed_polls" => Self::ClosedPolls,
            other => return Err(RpcError::UnknownAction(other.to_string())),
        })
    }
}

fn parse<T: DeserializeOwned>(body: Value) -> Result<T, RpcError> {
    Ok(serde_json::from_value(body)?)
}

fn to_value<T: Serialize>(payload: &T) -> Result<Value, RpcError> {
    serde_json::to_value(payload).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}

/// Turns `(action, body)` pairs into orchestrator calls.
pub struct RpcHandler {
    orchestrator: Arc<PollOrchestrator>,
}

impl RpcHandler {
    pub fn new(orchestrator: Arc<PollOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Run `action` and return its success payload or an error envelope.
    pub async fn dispatch(&self, action: &str, body: Value) -> Value {
        let span = tracing::info_span!("rpc", action = %action);
        match self.handle(action, body).instrument(span).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::debug!(%action, error = %e, "rpc action failed");
                let envelope = ErrorEnvelope::from(&e);
                serde_json::to_value(&envelope).unwrap_or_else(|_| {
                    serde_json::json!({ "error": envelope.error, "detail": envelope.detail })
                })
            }
        }
    }

    /// Run `action`, keeping the typed error.
    pub async fn handle(&self, action: &str, body: Value) -> Result<Value, RpcError> {
        let orch = &self.orchestrator;
        match action.parse::<RpcAction>()? {
            RpcAction::Create => {
                let (actor, request) = parse::<CreateRequest>(body)?.into_parts();
                to_value(&orch.create(&actor, request).await?)
            }
            RpcAction::Vote => {
                let req: VoteRequest = parse(body)?;
                let actor: Actor = req.actor.into();
                orch.vote(&actor, req.poll_id, &req.candidate).await?;
                to_value(&VoteResponse { status: true })
            }
            RpcAction::PollDetails => {
                let req: PollDetailsRequest = parse(body)?;
                let actor: Option<Actor> = req.actor.map(Into::into);
                let details = orch
                    .poll_details(req.poll_id, req.with_tally, actor.as_ref())
                    .await?;
                to_value(&details)
            }
            RpcAction::OpenPolls => {
                let actor: Actor = parse::<ActorRequest>(body)?.actor.into();
                to_value(&orch.open_polls_for_actor(&actor).await?)
            }
            RpcAction::Close => {
                let req: CloseRequest = parse(body)?;
                let actor: Actor = req.actor.into();
                let winner = orch.close(&actor, req.poll_id).await?;
                to_value(&CloseResponse::from(winner))
            }
            RpcAction::SweepExpired => to_value(&orch.sweep_expired().await?),
            RpcAction::CandidateVotes => {
                let req: CandidateVotesRequest = parse(body)?;
                to_value(&orch.candidate_votes(req.poll_id, &req.candidate).await?)
            }
            RpcAction::RoleOf => {
                let actor: Actor = parse::<ActorRequest>(body)?.actor.into();
                let role_id = orch.role_of(&actor).await?;
                to_value(&RoleResponse { role_id })
            }
            RpcAction::ClosedPolls => to_value(&ClosedPollsResponse {
                polls: orch.closed_polls()?,
            }),
        }
    }
}
