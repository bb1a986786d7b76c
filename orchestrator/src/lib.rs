//! Poll orchestrator: keeps a voting ledger and the off-chain poll index
//! consistent across create, vote, close and expiry.

pub mod config;
pub mod error;
pub mod locks;
pub mod logging;
pub mod orchestrator;
pub mod read_models;
mod spans;

pub use config::OrchestratorConfig;
pub use error::{ErrorKind, PollError, SetupError};
pub use locks::{PollGuard, PollLocks};
pub use logging::{init_logging, LogFormat};
pub use orchestrator::{CreatePoll, CreatedPoll, PollOrchestrator, SweepFailure, SweepReport};
pub use read_models::{CandidateVotes, ClosedPoll, OpenPoll, OpenPolls, PollDetails};
