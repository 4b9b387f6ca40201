//! Contract Test: Record Set Replacement
//!
//! The registrar only accepts whole record sets. This test verifies the set
//! the hook submits:
//! - start appends exactly one challenge TXT entry after the existing ones
//! - stop removes every `_acme-challenge*` entry and keeps the rest in order
//! - stop is idempotent across runs
//!
//! If this test fails, the hook is corrupting or reordering unrelated records.

mod common;

use common::*;
use dnshook_core::{DnsEntry, DnsEntryType, HookExitCode, HookOutcome};

#[tokio::test]
async fn start_appends_challenge_entry() {
    let state = FakeRegistrarState::with_entries(vec![www()]);
    let runner = fake_runner(&state);

    let outcome = runner.run(start_args("example.com", "abc123")).await;

    assert_eq!(outcome.exit_code(), HookExitCode::Success);
    assert!(matches!(outcome, HookOutcome::Success { submitted: 2 }));
    assert_eq!(
        state.submissions(),
        vec![vec![
            DnsEntry::new("www", 300, DnsEntryType::A, "1.2.3.4"),
            DnsEntry::new(
                "_acme-challenge.example.com",
                3600,
                DnsEntryType::Txt,
                "abc123"
            ),
        ]]
    );
}

#[tokio::test]
async fn start_preserves_order_of_existing_entries() {
    let txt = DnsEntry::new("@", 3600, DnsEntryType::Txt, "v=spf1 -all");
    let state = FakeRegistrarState::with_entries(vec![mx(), www(), txt.clone()]);
    let runner = fake_runner(&state);

    let outcome = runner.run(start_args("example.com", "token")).await;

    assert!(outcome.is_success());
    assert_eq!(
        state.entries(),
        vec![
            mx(),
            www(),
            txt,
            challenge("example.com", "token"),
        ]
    );
    assert_eq!(state.submit_calls(), 1);
}

#[tokio::test]
async fn start_keeps_unknown_record_types() {
    let exotic = DnsEntry::new("host", 60, DnsEntryType::Other("HINFO".into()), "x86 linux");
    let state = FakeRegistrarState::with_entries(vec![exotic.clone()]);
    let runner = fake_runner(&state);

    runner.run(start_args("example.com", "v")).await;

    assert_eq!(state.entries()[0], exotic);
}

#[tokio::test]
async fn stop_removes_all_challenge_entries() {
    for leftover in 0..=2 {
        let mut entries = vec![www()];
        for i in 0..leftover {
            entries.push(challenge("example.com", format!("old-{}", i)));
        }
        entries.push(mx());

        let state = FakeRegistrarState::with_entries(entries);
        let runner = fake_runner(&state);

        let outcome = runner.run(stop_args("example.com")).await;

        assert_eq!(outcome.exit_code(), HookExitCode::Success);
        assert_eq!(
            state.submissions(),
            vec![vec![www(), mx()]],
            "{} challenge entries should all be removed",
            leftover
        );
    }
}

#[tokio::test]
async fn stop_matches_by_prefix() {
    let bare = DnsEntry::new("_acme-challenge", 60, DnsEntryType::Txt, "a");
    let other_host = challenge("other.example.com", "b");
    let lookalike = DnsEntry::new("acme-challenge", 60, DnsEntryType::Txt, "c");
    let state = FakeRegistrarState::with_entries(vec![bare, www(), other_host, lookalike.clone()]);
    let runner = fake_runner(&state);

    runner.run(stop_args("example.com")).await;

    assert_eq!(state.entries(), vec![www(), lookalike]);
}

#[tokio::test]
async fn stop_without_challenge_submits_unchanged_set() {
    let state = FakeRegistrarState::with_entries(vec![www(), mx()]);
    let runner = fake_runner(&state);

    let outcome = runner.run(stop_args("example.com")).await;

    assert!(outcome.is_success());
    assert_eq!(state.submissions(), vec![vec![www(), mx()]]);
}

#[tokio::test]
async fn stop_twice_equals_stop_once() {
    let state = FakeRegistrarState::with_entries(vec![
        www(),
        challenge("example.com", "abc123"),
        mx(),
    ]);
    let runner = fake_runner(&state);

    assert!(runner.run(stop_args("example.com")).await.is_success());
    let after_first = state.entries();

    assert!(runner.run(stop_args("example.com")).await.is_success());
    let after_second = state.entries();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second, vec![www(), mx()]);
}

#[tokio::test]
async fn start_then_stop_restores_original_set() {
    let state = FakeRegistrarState::with_entries(vec![www(), mx()]);
    let runner = fake_runner(&state);

    assert!(runner.run(start_args("example.com", "abc123")).await.is_success());
    assert_eq!(state.entries().len(), 3);

    assert!(runner.run(stop_args("example.com")).await.is_success());
    assert_eq!(state.entries(), vec![www(), mx()]);
}
