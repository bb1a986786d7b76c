//! Integration tests exercising the poll protocols end to end:
//! create → vote → close → sweep, against the in-memory ledger and index
//! and against the LMDB index.

use std::sync::Arc;
use std::time::Duration;

use pollgate_identity::{Actor, IdentityPolicy};
use pollgate_ledger::{LedgerError, LedgerOp, Tally};
use pollgate_nullables::{NullClock, NullLedger, NullPollStore, NullRoleLookup};
use pollgate_orchestrator::{
    CreatePoll, ErrorKind, OrchestratorConfig, PollError, PollOrchestrator,
};
use pollgate_store::PollStore;
use pollgate_types::{
    CandidateId, ContractAddress, Credential, NewPoll, Poll, PollId, PollState, RoleId, Timestamp,
    Usermail,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const OPERATOR: &str = "op@x.io";
const OPERATOR_KEY: [u8; 32] = [7; 32];
const START: u64 = 1_000;

struct Harness {
    orch: Arc<PollOrchestrator>,
    store: Arc<NullPollStore>,
    ledger: NullLedger,
    clock: Arc<NullClock>,
    roles: Arc<NullRoleLookup>,
}

fn mail(s: &str) -> Usermail {
    Usermail::new(s).unwrap()
}

fn actor(s: &str) -> Actor {
    Actor::new(mail(s))
}

fn cid(s: &str) -> CandidateId {
    CandidateId::from(s)
}

fn addr(s: &str) -> ContractAddress {
    ContractAddress::parse(s).unwrap()
}

fn harness() -> Harness {
    harness_with(OrchestratorConfig::default())
}

fn harness_with(config: OrchestratorConfig) -> Harness {
    let store = Arc::new(NullPollStore::new());
    let ledger = NullLedger::new();
    let clock = Arc::new(NullClock::new(START));
    let roles = Arc::new(
        NullRoleLookup::new()
            .with_role(&mail("a@x.io"), RoleId(2))
            .with_role(&mail("b@x.io"), RoleId(3)),
    );
    let identity = config.identity_resolver(mail(OPERATOR), Credential::from_bytes(OPERATOR_KEY));
    let orch = PollOrchestrator::new(
        &config,
        store.clone(),
        Arc::new(ledger.clone()),
        identity,
        roles.clone(),
        clock.clone(),
    );
    Harness {
        orch: Arc::new(orch),
        store,
        ledger,
        clock,
        roles,
    }
}

fn colours() -> CreatePoll {
    CreatePoll {
        statement: "Favourite colour?".into(),
        candidates: vec![cid("Red"), cid("Blue")],
        expiring: None,
    }
}

/// Index a poll directly, with its contract already on the ledger.
fn seed(h: &Harness, id: u64, address: &str, expiring: Option<u64>) -> PollId {
    h.ledger.install(addr(address), "Seeded", &["Yes", "No"]);
    h.store.seed(Poll::from_new(
        PollId(id),
        NewPoll {
            creator: mail(OPERATOR),
            contract_address: addr(address),
            expiring: expiring.map(Timestamp::new),
            created_at: Timestamp::new(1),
        },
    ));
    PollId(id)
}

async fn created_poll(h: &Harness) -> PollId {
    h.orch.create(&actor(OPERATOR), colours()).await.unwrap().poll_id
}

// ---------------------------------------------------------------------------
// 1. Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_vote_close_scenario() {
    let h = harness();
    h.ledger.queue_address(addr("0xabc"));

    let created = h.orch.create(&actor(OPERATOR), colours()).await.unwrap();
    assert_eq!(created.poll_id, PollId(1));
    assert_eq!(created.contract_address.as_str(), "0xabc");

    h.orch.vote(&actor("a@x.io"), PollId(1), &cid("Red")).await.unwrap();

    let again = h.orch.vote(&actor("a@x.io"), PollId(1), &cid("Blue")).await.unwrap_err();
    assert_eq!(again.kind(), ErrorKind::DuplicateVoteError);

    let winner = h.orch.close(&actor(OPERATOR), PollId(1)).await.unwrap();
    assert_eq!(winner.candidate, cid("Red"));
    assert_eq!(winner.count, 1);

    let poll = h.store.snapshot(PollId(1)).unwrap();
    assert_eq!(poll.state, PollState::Ended { result: cid("Red") });
    assert_eq!(poll.voters.len(), 1);
    assert_eq!(h.ledger.contract(&addr("0xabc")).unwrap().tally.total(), 1);
}

#[tokio::test]
async fn create_records_creator_and_expiry() {
    let h = harness();
    let mut request = colours();
    request.expiring = Some(Timestamp::new(START + 60));

    let created = h.orch.create(&actor("a@x.io"), request).await.unwrap();
    let poll = h.store.snapshot(created.poll_id).unwrap();
    assert_eq!(poll.creator, mail("a@x.io"));
    assert_eq!(poll.expiring, Some(Timestamp::new(START + 60)));
    assert_eq!(poll.created_at, Timestamp::new(START));
    assert!(poll.voters.is_empty());

    // Signed with the operator default, since the actor brought no key.
    let contract = h.ledger.contract(&created.contract_address).unwrap();
    assert_eq!(contract.deployer, OPERATOR_KEY);
    assert_eq!(contract.candidates, vec![cid("Red"), cid("Blue")]);
}

#[tokio::test]
async fn invalid_create_never_reaches_the_ledger() {
    let h = harness();
    let mut request = colours();
    request.candidates.push(cid("Red"));

    let err = h.orch.create(&actor(OPERATOR), request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    assert_eq!(h.ledger.deploy_count(), 0);
    assert_eq!(h.store.poll_count().unwrap(), 0);
}

// ---------------------------------------------------------------------------
// 2. Vote rules
// ---------------------------------------------------------------------------

#[tokio::test]
async fn creator_cannot_vote() {
    let h = harness();
    let id = created_poll(&h).await;

    let err = h.orch.vote(&actor(OPERATOR), id, &cid("Red")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SelfVoteError);
    assert!(h.store.snapshot(id).unwrap().voters.is_empty());
    assert_eq!(h.ledger.vote_attempts(), 0);
}

#[tokio::test]
async fn vote_on_unknown_poll_is_not_found() {
    let h = harness();
    let err = h.orch.vote(&actor("a@x.io"), PollId(99), &cid("Red")).await.unwrap_err();
    assert!(matches!(err, PollError::NotFound(PollId(99))));
    assert_eq!(err.kind(), ErrorKind::NotFoundError);
    assert_eq!(h.orch.locks().tracked_polls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_votes_by_one_actor_count_once() {
    let h = harness();
    let id = created_poll(&h).await;
    h.ledger.set_vote_delay(Duration::from_millis(20));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let orch = Arc::clone(&h.orch);
        handles.push(tokio::spawn(async move {
            orch.vote(&actor("a@x.io"), id, &cid("Blue")).await
        }));
    }
    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::DuplicateVoteError),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(h.ledger.vote_attempts(), 1);
    let poll = h.store.snapshot(id).unwrap();
    assert_eq!(poll.votes_count(), 1);
    let contract = h.ledger.contract(&poll.contract_address).unwrap();
    assert_eq!(contract.tally.count(&cid("Blue")), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn votes_by_different_actors_all_land() {
    let h = harness();
    let id = created_poll(&h).await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let orch = Arc::clone(&h.orch);
        handles.push(tokio::spawn(async move {
            orch.vote(&actor(&format!("voter{i}@x.io")), id, &cid("Red")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(h.store.snapshot(id).unwrap().votes_count(), 6);
}

#[tokio::test(start_paused = true)]
async fn votes_queued_on_one_poll_leave_other_polls_free() {
    let mut config = OrchestratorConfig::default();
    config.max_in_flight = 2;
    let h = harness_with(config);
    let busy = seed(&h, 1, "0x01", None);
    let free = seed(&h, 2, "0x02", None);
    h.ledger.set_vote_delay(Duration::from_millis(100));

    let mut handles = Vec::new();
    for i in 0..5 {
        let orch = Arc::clone(&h.orch);
        handles.push(tokio::spawn(async move {
            orch.vote(&actor(&format!("voter{i}@x.io")), busy, &cid("Yes")).await
        }));
    }
    tokio::time::sleep(Duration::from_millis(1)).await;

    let started = tokio::time::Instant::now();
    h.orch.vote(&actor("a@x.io"), free, &cid("No")).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(150));

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(h.store.snapshot(busy).unwrap().votes_count(), 5);
    assert_eq!(h.orch.locks().tracked_polls(), 0);
}

// ---------------------------------------------------------------------------
// 3. Ledger and index failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ledger_vote_failure_leaves_index_untouched() {
    let h = harness();
    let id = created_poll(&h).await;
    h.ledger.fail_next_vote(LedgerError::Reverted {
        op: LedgerOp::Vote,
        reason: "out of gas".into(),
    });

    let err = h.orch.vote(&actor("a@x.io"), id, &cid("Red")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerError);
    assert!(!err.outcome_unknown());
    assert!(h.store.snapshot(id).unwrap().voters.is_empty());
    assert_eq!(h.store.put_count(), 0);

    // Nothing was recorded, so the actor can try again.
    h.orch.vote(&actor("a@x.io"), id, &cid("Red")).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn vote_timeout_is_unknown_outcome_and_not_retried() {
    let h = harness_with(OrchestratorConfig {
        ledger_timeout_secs: 1,
        ..OrchestratorConfig::default()
    });
    let id = created_poll(&h).await;
    h.ledger.set_vote_delay(Duration::from_secs(30));

    let err = h.orch.vote(&actor("a@x.io"), id, &cid("Red")).await.unwrap_err();
    assert!(matches!(
        err,
        PollError::Ledger(LedgerError::Timeout { op: LedgerOp::Vote, .. })
    ));
    assert!(err.outcome_unknown());
    assert_eq!(h.ledger.vote_attempts(), 1);
    assert!(h.store.snapshot(id).unwrap().voters.is_empty());
}

#[tokio::test]
async fn deploy_failure_creates_no_record() {
    let h = harness();
    h.ledger.fail_next_deploy(LedgerError::Transport {
        op: LedgerOp::Deploy,
        reason: "connection refused".into(),
    });

    let err = h.orch.create(&actor(OPERATOR), colours()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerError);
    assert!(err.orphaned_contract().is_none());
    assert_eq!(h.store.poll_count().unwrap(), 0);
}

#[tokio::test]
async fn index_failure_after_deploy_reports_orphaned_contract() {
    let h = harness();
    h.ledger.queue_address(addr("0xdead"));
    h.store.fail_next_insert();

    let err = h.orch.create(&actor(OPERATOR), colours()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreError);
    assert_eq!(err.orphaned_contract(), Some(&addr("0xdead")));
    assert!(err.to_string().contains("0xdead"));
    assert_eq!(h.ledger.deploy_count(), 1);
    assert_eq!(h.store.poll_count().unwrap(), 0);
}

#[tokio::test]
async fn index_failure_after_vote_is_reported() {
    let h = harness();
    let id = created_poll(&h).await;
    h.store.fail_next_put();

    let err = h.orch.vote(&actor("a@x.io"), id, &cid("Blue")).await.unwrap_err();
    assert!(matches!(err, PollError::VoteNotRecorded { .. }));
    assert_eq!(err.kind(), ErrorKind::StoreError);

    let poll = h.store.snapshot(id).unwrap();
    assert!(poll.voters.is_empty());
    assert_eq!(h.ledger.contract(&poll.contract_address).unwrap().tally.total(), 1);
}

// ---------------------------------------------------------------------------
// 4. Close
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ended_poll_rejects_votes_and_second_close() {
    let h = harness();
    let id = created_poll(&h).await;
    h.orch.vote(&actor("a@x.io"), id, &cid("Blue")).await.unwrap();
    h.orch.close(&actor(OPERATOR), id).await.unwrap();

    let vote = h.orch.vote(&actor("b@x.io"), id, &cid("Red")).await.unwrap_err();
    assert_eq!(vote.kind(), ErrorKind::AlreadyEndedError);
    let close = h.orch.close(&actor(OPERATOR), id).await.unwrap_err();
    assert_eq!(close.kind(), ErrorKind::AlreadyEndedError);

    assert_eq!(h.store.snapshot(id).unwrap().result(), Some(&cid("Blue")));
}

#[tokio::test]
async fn tie_goes_to_first_candidate_in_contract_order() {
    let h = harness();
    h.ledger.queue_address(addr("0xabc"));
    let id = h
        .orch
        .create(
            &actor(OPERATOR),
            CreatePoll {
                statement: "Pick".into(),
                candidates: vec![cid("A"), cid("B"), cid("C")],
                expiring: None,
            },
        )
        .await
        .unwrap()
        .poll_id;
    let tally: Tally = [("A", 3), ("B", 3), ("C", 1)]
        .into_iter()
        .map(|(c, n)| (cid(c), n))
        .collect();
    h.ledger.set_tally(&addr("0xabc"), tally);

    let winner = h.orch.close(&actor(OPERATOR), id).await.unwrap();
    assert_eq!(winner.candidate, cid("A"));
    assert_eq!(winner.count, 3);
    assert_eq!(winner.tied_with, vec![cid("B")]);
    assert_eq!(h.store.snapshot(id).unwrap().result(), Some(&cid("A")));
}

#[tokio::test]
async fn close_with_unreadable_contract_keeps_poll_open() {
    let h = harness();
    let id = created_poll(&h).await;
    h.ledger.set_read_failure(Some(LedgerError::Transport {
        op: LedgerOp::Tally,
        reason: "node down".into(),
    }));

    let err = h.orch.close(&actor(OPERATOR), id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerError);
    assert!(h.store.snapshot(id).unwrap().is_polling());
}

// ---------------------------------------------------------------------------
// 5. Expiry sweep
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sweep_closes_only_expired_open_polls() {
    let h = harness();
    let p1 = seed(&h, 1, "0x01", Some(START - 100));
    let p2 = seed(&h, 2, "0x02", Some(START - 100));
    let p3 = seed(&h, 3, "0x03", Some(START + 100));
    let p4 = seed(&h, 4, "0x04", None);
    let mut ended = h.store.snapshot(p2).unwrap();
    ended.end(cid("No")).unwrap();
    h.store.put_poll(&ended).unwrap();

    let report = h.orch.sweep_expired().await.unwrap();
    assert_eq!(report.closed_count, 1);
    assert_eq!(report.closed, vec![p1]);
    assert!(report.failed.is_empty());

    assert!(!h.store.snapshot(p1).unwrap().is_polling());
    assert_eq!(h.store.snapshot(p2).unwrap().result(), Some(&cid("No")));
    assert!(h.store.snapshot(p3).unwrap().is_polling());
    assert!(h.store.snapshot(p4).unwrap().is_polling());
}

#[tokio::test]
async fn sweep_picks_up_polls_once_the_clock_passes_expiry() {
    let h = harness();
    let id = seed(&h, 1, "0x01", Some(START + 10));
    assert_eq!(h.orch.sweep_expired().await.unwrap().closed_count, 0);

    h.clock.advance(11);
    let report = h.orch.sweep_expired().await.unwrap();
    assert_eq!(report.closed, vec![id]);
}

#[tokio::test]
async fn sweep_isolates_per_poll_failures() {
    let h = harness();
    seed(&h, 1, "0x01", Some(START - 1));
    // Indexed, but no contract behind it.
    h.store.seed(Poll::from_new(
        PollId(2),
        NewPoll {
            creator: mail(OPERATOR),
            contract_address: addr("0x02"),
            expiring: Some(Timestamp::new(START - 1)),
            created_at: Timestamp::new(1),
        },
    ));
    seed(&h, 3, "0x03", Some(START - 1));

    let report = h.orch.sweep_expired().await.unwrap();
    assert_eq!(report.closed_count, 2);
    assert_eq!(report.closed, vec![PollId(1), PollId(3)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].poll_id, PollId(2));
    assert_eq!(report.failed[0].kind, ErrorKind::LedgerError);
    assert!(h.store.snapshot(PollId(2)).unwrap().is_polling());
}

#[tokio::test]
async fn overlapping_sweep_is_rejected() {
    let h = harness();
    let id = seed(&h, 1, "0x01", Some(START - 1));

    // Park the first sweep on the poll lock.
    let held = h.orch.locks().acquire(id).await;
    let orch = Arc::clone(&h.orch);
    let first = tokio::spawn(async move { orch.sweep_expired().await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let second = h.orch.sweep_expired().await.unwrap_err();
    assert_eq!(second.kind(), ErrorKind::SweepInProgress);

    drop(held);
    let report = first.await.unwrap().unwrap();
    assert_eq!(report.closed, vec![id]);
}

#[tokio::test]
async fn sweep_query_failure_is_a_store_error() {
    let h = harness();
    h.store.set_fail_queries(true);
    let err = h.orch.sweep_expired().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StoreError);
}

// ---------------------------------------------------------------------------
// 6. Identity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn own_credential_signs_the_vote() {
    let h = harness();
    let id = created_poll(&h).await;
    let voter = actor("a@x.io").with_private_key(hex_key(0x11));

    h.orch.vote(&voter, id, &cid("Red")).await.unwrap();
    let poll = h.store.snapshot(id).unwrap();
    let contract = h.ledger.contract(&poll.contract_address).unwrap();
    assert_eq!(contract.signers, vec![[0x11; 32]]);
}

#[tokio::test]
async fn malformed_credential_is_an_identity_error() {
    let h = harness();
    let id = created_poll(&h).await;
    let voter = actor("a@x.io").with_private_key("not-hex");

    let err = h.orch.vote(&voter, id, &cid("Red")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentityError);
    assert_eq!(h.ledger.vote_attempts(), 0);
}

#[tokio::test]
async fn strict_policy_requires_own_credential() {
    let h = harness_with(OrchestratorConfig {
        allow_operator_fallback: false,
        ..OrchestratorConfig::default()
    });
    assert_eq!(
        OrchestratorConfig {
            allow_operator_fallback: false,
            ..OrchestratorConfig::default()
        }
        .identity_policy(),
        IdentityPolicy::RequireOwnCredential
    );
    // The operator itself may still fall back to the default credential.
    let id = created_poll(&h).await;

    let err = h.orch.vote(&actor("a@x.io"), id, &cid("Red")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IdentityError);

    let voter = actor("a@x.io").with_private_key(hex_key(0x22));
    h.orch.vote(&voter, id, &cid("Red")).await.unwrap();
}

fn hex_key(byte: u8) -> String {
    format!("0x{}", format!("{byte:02x}").repeat(32))
}

// ---------------------------------------------------------------------------
// 7. Read models
// ---------------------------------------------------------------------------

#[tokio::test]
async fn poll_details_joins_index_and_contract() {
    let h = harness();
    let id = created_poll(&h).await;
    h.orch.vote(&actor("a@x.io"), id, &cid("Blue")).await.unwrap();

    let details = h.orch.poll_details(id, true, Some(&actor("a@x.io"))).await.unwrap();
    assert_eq!(details.statement, "Favourite colour?");
    assert_eq!(details.candidates, vec![cid("Red"), cid("Blue")]);
    assert_eq!(details.counts, Some(vec![0, 1]));
    assert_eq!(details.voted, Some(true));
    assert_eq!(details.votes_count, 1);
    assert!(details.result.is_none());

    let plain = h.orch.poll_details(id, false, None).await.unwrap();
    assert!(plain.counts.is_none());
    assert!(plain.voted.is_none());
}

#[tokio::test]
async fn open_polls_mark_where_the_actor_voted() {
    let h = harness();
    let first = created_poll(&h).await;
    let second = created_poll(&h).await;
    let closed = created_poll(&h).await;
    h.orch.vote(&actor("a@x.io"), first, &cid("Red")).await.unwrap();
    h.orch.close(&actor(OPERATOR), closed).await.unwrap();

    let open = h.orch.open_polls_for_actor(&actor("a@x.io")).await.unwrap();
    assert_eq!(open.role_id, Some(RoleId(2)));
    let ids: Vec<PollId> = open.polls.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(open.polls[0].voted);
    assert_eq!(open.polls[0].votes_count, 1);
    assert!(!open.polls[1].voted);
    assert_eq!(open.polls[1].statement.as_deref(), Some("Favourite colour?"));
}

#[tokio::test]
async fn open_polls_fail_closed_without_a_role() {
    let h = harness();
    created_poll(&h).await;

    let stranger = h.orch.open_polls_for_actor(&actor("nobody@x.io")).await.unwrap();
    assert!(stranger.role_id.is_none());
    assert!(stranger.polls.is_empty());

    h.roles.set_unavailable(true);
    let unavailable = h.orch.open_polls_for_actor(&actor("a@x.io")).await.unwrap();
    assert!(unavailable.polls.is_empty());
}

#[tokio::test]
async fn open_polls_survive_unreadable_contracts() {
    let h = harness();
    created_poll(&h).await;
    h.ledger.set_read_failure(Some(LedgerError::Transport {
        op: LedgerOp::Statement,
        reason: "node down".into(),
    }));

    let open = h.orch.open_polls_for_actor(&actor("b@x.io")).await.unwrap();
    assert_eq!(open.polls.len(), 1);
    assert!(open.polls[0].statement.is_none());
}

#[tokio::test]
async fn candidate_votes_role_and_closed_polls() {
    let h = harness();
    let id = created_poll(&h).await;
    h.orch.vote(&actor("a@x.io"), id, &cid("Red")).await.unwrap();
    h.orch.vote(&actor("b@x.io"), id, &cid("Red")).await.unwrap();

    let red = h.orch.candidate_votes(id, &cid("Red")).await.unwrap();
    assert_eq!(red.count, 2);
    let unknown = h.orch.candidate_votes(id, &cid("Green")).await.unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::LedgerError);

    assert_eq!(h.orch.role_of(&actor("b@x.io")).await.unwrap(), Some(RoleId(3)));
    assert_eq!(h.orch.role_of(&actor("nobody@x.io")).await.unwrap(), None);

    assert!(h.orch.closed_polls().unwrap().is_empty());
    h.orch.close(&actor(OPERATOR), id).await.unwrap();
    let closed = h.orch.closed_polls().unwrap();
    assert_eq!(closed.len(), 1);
    assert_eq!(closed[0].result, cid("Red"));
    assert_eq!(closed[0].votes_count, 2);
}

// ---------------------------------------------------------------------------
// 8. LMDB-backed index
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lmdb_index_backs_the_full_protocol() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = OrchestratorConfig {
        data_dir: dir.path().join("index"),
        lmdb_map_size: 16 * 1024 * 1024,
        ..OrchestratorConfig::default()
    };
    let store = Arc::new(config.open_poll_index().expect("open index"));
    let ledger = NullLedger::new();
    let orch = PollOrchestrator::new(
        &config,
        store.clone(),
        Arc::new(ledger.clone()),
        config.identity_resolver(mail(OPERATOR), Credential::from_bytes(OPERATOR_KEY)),
        Arc::new(NullRoleLookup::new()),
        Arc::new(NullClock::new(START)),
    );

    let first = orch.create(&actor(OPERATOR), colours()).await.unwrap();
    let second = orch.create(&actor(OPERATOR), colours()).await.unwrap();
    assert_eq!(first.poll_id, PollId(1));
    assert_eq!(second.poll_id, PollId(2));

    orch.vote(&actor("a@x.io"), first.poll_id, &cid("Blue")).await.unwrap();
    orch.close(&actor(OPERATOR), first.poll_id).await.unwrap();

    let stored = store.get_poll(first.poll_id).unwrap().unwrap();
    assert_eq!(stored.result(), Some(&cid("Blue")));
    assert!(stored.has_voted(&mail("a@x.io")));
    assert_eq!(orch.closed_polls().unwrap().len(), 1);
}
