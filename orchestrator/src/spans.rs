//! [`tracing::Span`] constructors for orchestrator operations.
//!
//! Every protocol step logged inside one of these spans carries the poll
//! id, so a single poll's history can be filtered out of the log stream.

use pollgate_types::PollId;
use tracing::{info_span, Span};

pub fn create_span(creator: &str) -> Span {
    info_span!("poll_create", creator = %creator)
}

pub fn vote_span(poll_id: PollId, voter: &str) -> Span {
    info_span!("poll_vote", poll_id = %poll_id, voter = %voter)
}

pub fn close_span(poll_id: PollId) -> Span {
    info_span!("poll_close", poll_id = %poll_id)
}

pub fn sweep_span() -> Span {
    info_span!("poll_sweep")
}
