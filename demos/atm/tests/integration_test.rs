//! End-to-end tests for the ATM demo.
//!
//! Each test drives a real store through the full pipeline: tracking →
//! validation (with simulated latency) → navigation → reducer.

#![allow(clippy::unwrap_used)]

use atm::validator::LatencyValidator;
use atm::{
    AtmAction, AtmState, AtmStore, Navigator, Screen, Telemetry, TransactionId, TransactionKind,
    atm_store_with,
};
use ledgerflow_testing::test_clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct RecordingTelemetry {
    seen: Arc<Mutex<Vec<AtmAction>>>,
}

impl Telemetry for RecordingTelemetry {
    fn record(&self, action: &AtmAction, _state: &AtmState) {
        self.seen.lock().unwrap().push(action.clone());
    }
}

struct RecordingNavigator {
    screens: Arc<Mutex<Vec<Screen>>>,
}

impl Navigator for RecordingNavigator {
    fn go_to(&self, screen: Screen) {
        self.screens.lock().unwrap().push(screen);
    }
}

struct Harness {
    store: AtmStore,
    seen: Arc<Mutex<Vec<AtmAction>>>,
    screens: Arc<Mutex<Vec<Screen>>>,
}

fn harness_with_latency(latency: Duration) -> Harness {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let screens = Arc::new(Mutex::new(Vec::new()));

    let store = atm_store_with(
        LatencyValidator::new(latency),
        RecordingTelemetry {
            seen: Arc::clone(&seen),
        },
        RecordingNavigator {
            screens: Arc::clone(&screens),
        },
        Arc::new(test_clock()),
    );

    Harness {
        store,
        seen,
        screens,
    }
}

fn harness() -> Harness {
    harness_with_latency(Duration::from_millis(5))
}

async fn deposit(store: &AtmStore, amount: &str) {
    store
        .dispatch(AtmAction::Deposit {
            amount: amount.to_string(),
        })
        .unwrap();
    store.settled().await;
}

#[tokio::test]
async fn deposit_of_100_lands_in_balance_and_ledger() {
    let h = harness();

    deposit(&h.store, "100").await;

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.balance, 100);
    assert!(state.is_idle());
    assert_eq!(state.count(), 1);
    assert_eq!(state.transactions[0].kind, TransactionKind::Income);
    assert_eq!(state.transactions[0].amount, 100);
}

#[tokio::test]
async fn withdrawal_of_40_from_100_leaves_60() {
    let h = harness();

    deposit(&h.store, "100").await;
    h.store
        .dispatch(AtmAction::Withdraw {
            amount: "40".to_string(),
        })
        .unwrap();
    h.store.settled().await;

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.balance, 60);
    assert_eq!(state.count(), 2);
    assert_eq!(state.transactions[1].kind, TransactionKind::Expense);
    assert_eq!(state.transactions[1].amount, 40);
}

#[tokio::test]
async fn invalid_deposit_errors_and_retry_recovers() {
    let h = harness();

    deposit(&h.store, "abc").await;

    let state = h.store.state(Clone::clone).await;
    assert!(state.error);
    assert!(!state.loading);
    assert_eq!(state.balance, 0);
    assert_eq!(state.count(), 0);

    h.store.dispatch(AtmAction::Retry).unwrap();
    h.store.settled().await;

    let state = h.store.state(Clone::clone).await;
    assert!(state.is_idle());
    assert_eq!(state.balance, 0);
}

#[tokio::test]
async fn removing_a_deposit_restores_the_previous_balance() {
    let h = harness();

    deposit(&h.store, "100").await;
    let id = h.store.state(|s| s.transactions[0].id.clone()).await;

    h.store
        .dispatch(AtmAction::RemoveTransaction { id })
        .unwrap();
    h.store.settled().await;

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.balance, 0);
    assert_eq!(state.count(), 0);
}

#[tokio::test]
async fn removing_a_withdrawal_restores_the_previous_balance() {
    let h = harness();

    deposit(&h.store, "100").await;
    h.store
        .dispatch(AtmAction::Withdraw {
            amount: "40".to_string(),
        })
        .unwrap();
    h.store.settled().await;

    let id = h.store.state(|s| s.transactions[1].id.clone()).await;
    h.store
        .dispatch(AtmAction::RemoveTransaction { id })
        .unwrap();
    h.store.settled().await;

    assert_eq!(h.store.state(|s| s.balance).await, 100);
    assert_eq!(h.store.state(AtmState::count).await, 1);
}

#[tokio::test]
async fn removing_an_unknown_transaction_is_a_noop() {
    let h = harness();

    deposit(&h.store, "100").await;
    let before = h.store.state(Clone::clone).await;

    h.store
        .dispatch(AtmAction::RemoveTransaction {
            id: TransactionId::new(),
        })
        .unwrap();
    h.store.settled().await;

    assert_eq!(h.store.state(Clone::clone).await, before);
}

#[tokio::test]
async fn concurrent_deposits_lose_no_updates() {
    // Both requests are in flight before either validator resolves.
    let h = harness_with_latency(Duration::from_millis(50));

    h.store
        .dispatch(AtmAction::Deposit {
            amount: "100".to_string(),
        })
        .unwrap();
    h.store
        .dispatch(AtmAction::Deposit {
            amount: "200".to_string(),
        })
        .unwrap();
    h.store.settled().await;

    let state = h.store.state(Clone::clone).await;
    assert_eq!(state.balance, 300);
    assert_eq!(state.count(), 2);
}

#[tokio::test]
async fn transaction_ids_stay_unique_across_the_ledger() {
    let h = harness();

    for amount in ["10", "20", "30"] {
        deposit(&h.store, amount).await;
    }

    let ids = h
        .store
        .state(|s| s.transactions.iter().map(|t| t.id.clone()).collect::<Vec<_>>())
        .await;
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn observers_see_the_loading_snapshot() {
    let h = harness_with_latency(Duration::from_millis(50));
    let mut observer = h.store.observe();

    h.store
        .dispatch(AtmAction::Deposit {
            amount: "100".to_string(),
        })
        .unwrap();

    // First publish is the Validating reduction; the raw request is
    // swallowed by validation and never reaches the reducer.
    observer.changed().await.unwrap();
    {
        let snapshot = observer.borrow_and_update();
        assert!(snapshot.loading);
        assert!(!snapshot.error);
        assert_eq!(snapshot.balance, 0);
    }

    h.store.settled().await;
    assert_eq!(h.store.state(|s| s.balance).await, 100);
}

#[tokio::test]
async fn tracking_sees_raw_requests_but_not_derived_actions() {
    let h = harness();

    deposit(&h.store, "100").await;
    h.store.dispatch(AtmAction::Retry).unwrap();
    h.store.settled().await;

    let seen = h.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], AtmAction::Deposit { .. }));
    assert_eq!(seen[1], AtmAction::Retry);
}

#[tokio::test]
async fn edit_transaction_requests_the_transaction_screen() {
    let h = harness();

    deposit(&h.store, "100").await;
    let id = h.store.state(|s| s.transactions[0].id.clone()).await;

    h.store
        .dispatch(AtmAction::EditTransaction { id })
        .unwrap();
    h.store.settled().await;

    assert_eq!(*h.screens.lock().unwrap(), vec![Screen::Transaction]);
    // Navigation does not touch the account.
    assert_eq!(h.store.state(|s| s.balance).await, 100);
}

#[tokio::test]
async fn every_validation_cycle_ends_with_loading_cleared() {
    let h = harness();

    let requests = [
        AtmAction::Deposit {
            amount: "100".to_string(),
        },
        AtmAction::Withdraw {
            amount: "40".to_string(),
        },
        AtmAction::Deposit {
            amount: "abc".to_string(),
        },
        AtmAction::Retry,
        AtmAction::Withdraw {
            amount: "10".to_string(),
        },
    ];

    for request in requests {
        h.store.dispatch(request).unwrap();
        h.store.settled().await;
        assert!(!h.store.state(|s| s.loading).await);
    }
}

#[tokio::test]
async fn error_state_only_retry_recovers() {
    let h = harness();

    deposit(&h.store, "  ").await;
    assert!(h.store.state(|s| s.error).await);

    // A failure never blocks the pipeline itself; a fresh valid request
    // after retry goes through normally.
    h.store.dispatch(AtmAction::Retry).unwrap();
    h.store.settled().await;
    deposit(&h.store, "25").await;

    let state = h.store.state(Clone::clone).await;
    assert!(state.is_idle());
    assert_eq!(state.balance, 25);
}
