//! End-to-end exercise of the balance subsystem against the in-memory store:
//! transfers, auth round trip, and the queued mass reset.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use balance_gateway::account::{AccountStore, MemoryAccountStore};
use balance_gateway::admin_balance::{AdminBalanceService, register_reset_handler};
use balance_gateway::balance::{BalanceError, BalanceService};
use balance_gateway::config::ResetQueueConfig;
use balance_gateway::jobs::{JobQueue, JobStatus};
use balance_gateway::money::Amount;
use balance_gateway::user_auth::{LoginRequest, RegisterRequest, UserAuthService};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn amount(s: &str) -> Amount {
    Amount::try_from_decimal(dec(s)).unwrap()
}

#[tokio::test]
async fn transfer_then_query_reflects_both_sides() {
    let store = Arc::new(MemoryAccountStore::new());
    let alice = store.insert_with_balance("alice", dec("100.00"));
    let bob = store.insert_with_balance("bob", dec("50.00"));

    let balance = BalanceService::new(store.clone());

    let new_sender_balance = balance.transfer(alice, bob, amount("30.30")).await.unwrap();
    assert_eq!(new_sender_balance, dec("69.70"));

    assert_eq!(balance.get_balance(alice).await.unwrap(), dec("69.70"));
    assert_eq!(balance.get_balance(bob).await.unwrap(), dec("80.30"));
}

#[tokio::test]
async fn failed_transfer_changes_nothing() {
    let store = Arc::new(MemoryAccountStore::new());
    let alice = store.insert_with_balance("alice", dec("10.00"));
    let bob = store.insert_with_balance("bob", dec("0.00"));

    let balance = BalanceService::new(store.clone());

    let err = balance.transfer(alice, bob, amount("10.01")).await.unwrap_err();
    assert!(matches!(err, BalanceError::InsufficientFunds));

    assert_eq!(balance.get_balance(alice).await.unwrap(), dec("10.00"));
    assert_eq!(balance.get_balance(bob).await.unwrap(), dec("0.00"));

    let err = balance.transfer(alice, alice, amount("1.00")).await.unwrap_err();
    assert!(matches!(err, BalanceError::SelfTransfer));
}

#[tokio::test]
async fn registered_account_can_login_and_receive_funds() {
    let store = Arc::new(MemoryAccountStore::new());
    let auth = UserAuthService::new(store.clone(), "integration-secret".to_string());
    let balance = BalanceService::new(store.clone());

    let alice_id = auth
        .register(RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            age: 30,
            bio: Some("first account".to_string()),
        })
        .await
        .unwrap();

    let login = auth
        .login(LoginRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();
    let claims = auth.verify_token(&login.token).unwrap();
    assert_eq!(claims.account_id().unwrap(), alice_id);

    // New accounts start at 0.00
    assert_eq!(balance.get_balance(alice_id).await.unwrap(), dec("0.00"));

    let funder = store.insert_with_balance("treasury", dec("500.00"));
    balance.transfer(funder, alice_id, amount("120.00")).await.unwrap();
    assert_eq!(balance.get_balance(alice_id).await.unwrap(), dec("120.00"));
}

#[tokio::test]
async fn mass_reset_job_runs_to_completion() {
    let store = Arc::new(MemoryAccountStore::new());
    let alice = store.insert_with_balance("alice", dec("100.00"));
    let bob = store.insert_with_balance("bob", dec("250.75"));
    let deleted = store.insert_with_balance("ghost", dec("33.00"));
    store.soft_delete(deleted).await.unwrap();

    let queue = Arc::new(JobQueue::new());
    let admin = Arc::new(AdminBalanceService::new(
        queue.clone(),
        store.clone(),
        ResetQueueConfig::default(),
    ));
    register_reset_handler(&queue, admin.clone());
    tokio::spawn(queue.clone().run_worker());

    let scheduled = admin.schedule_reset(1, Some("integration".to_string())).unwrap();

    let mut snapshot = admin.job_status(&scheduled.job_id);
    for _ in 0..200 {
        snapshot = admin.job_status(&scheduled.job_id);
        if snapshot.status == JobStatus::Completed || snapshot.status == JobStatus::Failed {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(snapshot.status, JobStatus::Completed);
    assert_eq!(snapshot.progress, 100);
    let result = snapshot.result.expect("completed job carries a result");
    assert_eq!(result["success"], true);
    // Soft-deleted account is not counted or touched
    assert_eq!(result["accounts_processed"], 2);

    assert_eq!(store.balance_of(alice).unwrap(), dec("0"));
    assert_eq!(store.balance_of(bob).unwrap(), dec("0"));
    assert_eq!(store.balance_of(deleted).unwrap(), dec("33.00"));

    // Unknown job ids report not_found instead of erroring
    let missing = admin.job_status("999999");
    assert_eq!(missing.status, JobStatus::NotFound);
    assert_eq!(missing.progress, 0);
}
