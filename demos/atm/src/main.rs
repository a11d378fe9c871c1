//! ATM example binary
//!
//! Runs a short scripted session against the store and prints the state
//! after each step.

use atm::validator::LatencyValidator;
use atm::{AtmAction, atm_store};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn show(store: &atm::AtmStore, label: &str) {
    store.settled().await;
    let (balance, count, error, loading) = store
        .state(|s| (s.balance, s.count(), s.error, s.loading))
        .await;
    println!("{label}: balance={balance} transactions={count} error={error} loading={loading}");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atm=debug,ledgerflow_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== ATM Example: Ledgerflow Architecture ===\n");

    let store = atm_store(LatencyValidator::new(Duration::from_millis(200)));

    show(&store, "initial").await;

    println!("\n>>> Deposit \"100\"");
    let _ = store.dispatch(AtmAction::Deposit {
        amount: "100".to_string(),
    });
    show(&store, "after deposit").await;

    println!("\n>>> Withdraw \"40\"");
    let _ = store.dispatch(AtmAction::Withdraw {
        amount: "40".to_string(),
    });
    show(&store, "after withdrawal").await;

    println!("\n>>> Deposit \"not a number\"");
    let _ = store.dispatch(AtmAction::Deposit {
        amount: "not a number".to_string(),
    });
    show(&store, "after invalid deposit").await;

    println!("\n>>> Retry");
    let _ = store.dispatch(AtmAction::Retry);
    show(&store, "after retry").await;

    let first = store.state(|s| s.transactions.first().map(|t| t.id.clone())).await;
    if let Some(id) = first {
        println!("\n>>> RemoveTransaction {id}");
        let _ = store.dispatch(AtmAction::RemoveTransaction { id });
        show(&store, "after removal").await;
    }

    if let Err(error) = store.shutdown(Duration::from_secs(5)).await {
        eprintln!("shutdown failed: {error}");
    }
}
