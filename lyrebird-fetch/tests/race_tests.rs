//! Race coordinator integration tests
//!
//! The scenarios that matter: a wrong early answer must never preempt a
//! correct later one, every dispatched task must settle into exactly one
//! attempt, and cancelled tasks must not leak attempt records.

mod helpers;

use helpers::*;
use lyrebird_common::config::MatchConfig;
use lyrebird_common::types::{AttemptOutcome, FetchRequest};
use lyrebird_fetch::services::{MatchValidator, RaceCoordinator};
use std::sync::Arc;
use std::time::Duration;

fn coordinator(registry: Arc<lyrebird_fetch::services::FetcherRegistry>) -> RaceCoordinator {
    RaceCoordinator::new(
        registry,
        MatchValidator::new(&MatchConfig::default()),
        Duration::from_secs(12),
    )
}

#[tokio::test(start_paused = true)]
async fn wrong_fast_answer_does_not_preempt_valid_slow_answer() {
    init_tracing();
    // Provider A answers quickly with an unrelated song; provider B
    // answers 350ms later with the correctly-localized Gurmukhi title.
    let fast_wrong = ScriptedFetcher::new(
        Duration::from_millis(50),
        Some(lyrics("FastWrong", "Ed Sheeran", "Shape of You")),
    );
    let slow_right = ScriptedFetcher::new(
        Duration::from_millis(400),
        Some(lyrics("SlowRight", "ਤਲਵਿੰਦਰ", "ਨਸ਼ਾ")),
    );
    let registry = registry_of(vec![
        (1, "FastWrong", fast_wrong.clone()),
        (2, "SlowRight", slow_right.clone()),
    ]);

    let request = FetchRequest::new("Various", "Nasha");
    let (result, attempts) = coordinator(registry).race(&request, &[1, 2]).await;

    let winner = result.expect("slow valid result should win");
    assert_eq!(winner.source, "SlowRight");

    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].api, "FastWrong");
    assert_eq!(attempts[0].outcome, AttemptOutcome::ValidationFailed);
    assert!(attempts[0].verdict.as_ref().unwrap().reason.contains("song score"));
    assert_eq!(attempts[1].api, "SlowRight");
    assert_eq!(attempts[1].outcome, AttemptOutcome::Success);
    assert!(attempts[1].verdict.as_ref().unwrap().script_mismatch);
}

#[tokio::test(start_paused = true)]
async fn winner_cancels_pending_tasks_without_extra_attempts() {
    init_tracing();
    let quick_right = ScriptedFetcher::new(
        Duration::from_millis(10),
        Some(lyrics("QuickRight", "Adele", "Hello")),
    );
    let slow = ScriptedFetcher::new(
        Duration::from_millis(500),
        Some(lyrics("Slow", "Adele", "Hello")),
    );
    let registry = registry_of(vec![
        (1, "QuickRight", quick_right.clone()),
        (2, "Slow", slow.clone()),
    ]);

    let request = FetchRequest::new("Adele", "Hello");
    let (result, attempts) = coordinator(registry).race(&request, &[1, 2]).await;

    assert_eq!(result.unwrap().source, "QuickRight");
    // The cancelled task produces no attempt record.
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].api, "QuickRight");
    assert_eq!(attempts[0].outcome, AttemptOutcome::Success);
    // Both were dispatched exactly once, though.
    assert_eq!(quick_right.calls(), 1);
    assert_eq!(slow.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_dispatched_task_settles_into_exactly_one_attempt() {
    init_tracing();
    let empty = ScriptedFetcher::new(Duration::from_millis(20), None);
    let registry = registry_of(vec![
        (1, "Empty", empty.clone()),
        (2, "Failing", FailingFetcher::new("connection refused")),
        (3, "Hanging", Arc::new(NeverFetcher)),
    ]);

    let request = FetchRequest::new("Adele", "Hello");
    let (result, attempts) = coordinator(registry).race(&request, &[1, 2, 3]).await;

    assert!(result.is_none());
    assert_eq!(attempts.len(), 3);

    let outcome_of = |api: &str| {
        attempts
            .iter()
            .find(|a| a.api == api)
            .unwrap_or_else(|| panic!("missing attempt for {}", api))
            .outcome
    };
    assert_eq!(outcome_of("Empty"), AttemptOutcome::NoLyrics);
    assert_eq!(outcome_of("Failing"), AttemptOutcome::Error);
    assert_eq!(outcome_of("Hanging"), AttemptOutcome::Timeout);
    assert_eq!(empty.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn all_rejected_results_exhaust_the_race() {
    init_tracing();
    let wrong_a = ScriptedFetcher::new(
        Duration::from_millis(30),
        Some(lyrics("WrongA", "Queen", "Bohemian Rhapsody")),
    );
    let wrong_b = ScriptedFetcher::new(
        Duration::from_millis(60),
        Some(lyrics("WrongB", "Toto", "Africa")),
    );
    let registry = registry_of(vec![(1, "WrongA", wrong_a), (2, "WrongB", wrong_b)]);

    let request = FetchRequest::new("Adele", "Hello");
    let (result, attempts) = coordinator(registry).race(&request, &[1, 2]).await;

    assert!(result.is_none());
    assert_eq!(attempts.len(), 2);
    assert!(attempts
        .iter()
        .all(|a| a.outcome == AttemptOutcome::ValidationFailed));
    // Rejected raw results are kept for diagnostics
    assert!(attempts.iter().all(|a| a.result.is_some()));
}

#[tokio::test(start_paused = true)]
async fn panicking_adapter_becomes_an_error_attempt() {
    init_tracing();
    let registry = registry_of(vec![(1, "Panicking", Arc::new(PanickingFetcher))]);

    let request = FetchRequest::new("Adele", "Hello");
    let (result, attempts) = coordinator(registry).race(&request, &[1]).await;

    assert!(result.is_none());
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].outcome, AttemptOutcome::Error);
    assert!(attempts[0].message.as_ref().unwrap().contains("task failed"));
}

#[tokio::test(start_paused = true)]
async fn unconfigured_slot_is_recorded_without_dispatch() {
    init_tracing();
    let configured = ScriptedFetcher::new(
        Duration::from_millis(10),
        Some(lyrics("Configured", "Adele", "Hello")),
    );
    let mut registry = lyrebird_fetch::services::FetcherRegistry::new();
    registry.register(1, "Unconfigured", None);
    registry.register(2, "Configured", Some(configured.clone()));

    let request = FetchRequest::new("Adele", "Hello");
    let (result, attempts) = coordinator(Arc::new(registry)).race(&request, &[1, 2]).await;

    assert_eq!(result.unwrap().source, "Configured");
    assert_eq!(attempts[0].api, "Unconfigured");
    assert_eq!(attempts[0].outcome, AttemptOutcome::NotConfigured);
}

#[tokio::test(start_paused = true)]
async fn untimed_result_downgrades_when_timestamps_requested() {
    init_tracing();
    let untimed = ScriptedFetcher::new(
        Duration::from_millis(10),
        Some(lyrics("Untimed", "Adele", "Hello")),
    );
    let timed = ScriptedFetcher::new(
        Duration::from_millis(50),
        Some(timed_lyrics("Timed", "Adele", "Hello")),
    );
    let registry = registry_of(vec![(1, "Untimed", untimed), (2, "Timed", timed)]);

    let mut request = FetchRequest::new("Adele", "Hello");
    request.want_timestamps = true;
    let (result, attempts) = coordinator(registry).race(&request, &[1, 2]).await;

    let winner = result.unwrap();
    assert_eq!(winner.source, "Timed");
    assert!(winner.has_timestamps);
    assert_eq!(attempts[0].api, "Untimed");
    assert_eq!(attempts[0].outcome, AttemptOutcome::NoLyrics);
    assert_eq!(
        attempts[0].message.as_deref(),
        Some("result has no timestamps")
    );
}

#[tokio::test(start_paused = true)]
async fn race_latency_is_bounded_by_slowest_needed_task_not_the_sum() {
    init_tracing();
    let slow_valid = ScriptedFetcher::new(
        Duration::from_millis(300),
        Some(lyrics("SlowValid", "Adele", "Hello")),
    );
    let slower_unneeded = ScriptedFetcher::new(
        Duration::from_millis(5000),
        Some(lyrics("Slower", "Adele", "Hello")),
    );
    let registry = registry_of(vec![
        (1, "SlowValid", slow_valid),
        (2, "Slower", slower_unneeded),
    ]);

    let start = tokio::time::Instant::now();
    let request = FetchRequest::new("Adele", "Hello");
    let (result, _) = coordinator(registry).race(&request, &[1, 2]).await;

    assert!(result.is_some());
    let elapsed = start.elapsed();
    assert!(
        elapsed < Duration::from_millis(400),
        "race took {:?}, should return at first valid completion",
        elapsed
    );
}
