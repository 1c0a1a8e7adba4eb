//! Peer-to-peer balance transfers and balance queries

use rust_decimal::Decimal;
use std::sync::Arc;

use super::error::BalanceError;
use crate::account::{AccountStore, StoreError};
use crate::money::Amount;

pub struct BalanceService {
    store: Arc<dyn AccountStore>,
}

impl BalanceService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Transfer `amount` from sender to recipient.
    ///
    /// Validates the request, then delegates the atomic two-row update to the
    /// store. On any error nothing is applied: the store rolls the
    /// transaction back entirely. Returns the sender's new balance.
    pub async fn transfer(
        &self,
        sender_id: i64,
        recipient_id: i64,
        amount: Amount,
    ) -> Result<Decimal, BalanceError> {
        if sender_id == recipient_id {
            tracing::warn!(sender_id, "Self-transfer attempt rejected");
            return Err(BalanceError::SelfTransfer);
        }

        let sender = self
            .store
            .find_active(sender_id)
            .await?
            .ok_or(BalanceError::SenderNotFound)?;
        self.store
            .find_active(recipient_id)
            .await?
            .ok_or(BalanceError::RecipientNotFound)?;

        // Early check for a clean error message; the store re-checks under
        // the row lock, so a concurrent transfer cannot slip past this.
        if sender.balance < *amount {
            tracing::warn!(
                sender_id,
                available = %sender.balance,
                required = %amount,
                "Transfer rejected: insufficient funds"
            );
            return Err(BalanceError::InsufficientFunds);
        }

        let (sender_balance, recipient_balance) = self
            .store
            .transfer_balances(sender_id, recipient_id, amount.inner())
            .await
            .map_err(|e| match e {
                // Store-level NotFound means a row vanished between the
                // checks above and the locked read
                StoreError::NotFound => BalanceError::RecipientNotFound,
                other => other.into(),
            })?;

        tracing::info!(
            sender_id,
            recipient_id,
            amount = %amount,
            sender_balance = %sender_balance,
            recipient_balance = %recipient_balance,
            "Transfer completed"
        );

        Ok(sender_balance)
    }

    /// Current balance of a non-deleted account
    pub async fn get_balance(&self, user_id: i64) -> Result<Decimal, BalanceError> {
        let account = self
            .store
            .find_active(user_id)
            .await?
            .ok_or(BalanceError::NotFound)?;
        Ok(account.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::MemoryAccountStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::try_from_decimal(dec(s)).unwrap()
    }

    fn service_with_store() -> (BalanceService, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        (BalanceService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_exact_transfer() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("100.00"));
        let bob = store.insert_with_balance("bob", dec("0.00"));

        let sender_balance = svc.transfer(alice, bob, amount("25.50")).await.unwrap();

        assert_eq!(sender_balance, dec("74.50"));
        assert_eq!(store.balance_of(alice).unwrap(), dec("74.50"));
        assert_eq!(store.balance_of(bob).unwrap(), dec("25.50"));
    }

    #[tokio::test]
    async fn test_self_transfer_rejected() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("100.00"));

        let err = svc.transfer(alice, alice, amount("10.00")).await.unwrap_err();

        assert!(matches!(err, BalanceError::SelfTransfer));
        assert_eq!(store.balance_of(alice).unwrap(), dec("100.00"));
    }

    #[tokio::test]
    async fn test_insufficient_funds_one_cent_over() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("10.00"));
        let bob = store.insert_with_balance("bob", dec("0.00"));

        let err = svc.transfer(alice, bob, amount("10.01")).await.unwrap_err();

        assert!(matches!(err, BalanceError::InsufficientFunds));
        assert_eq!(store.balance_of(alice).unwrap(), dec("10.00"));
        assert_eq!(store.balance_of(bob).unwrap(), dec("0.00"));
    }

    #[tokio::test]
    async fn test_transfer_entire_balance() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("10.00"));
        let bob = store.insert_with_balance("bob", dec("0.00"));

        svc.transfer(alice, bob, amount("10.00")).await.unwrap();

        assert_eq!(store.balance_of(alice).unwrap(), dec("0.00"));
        assert_eq!(store.balance_of(bob).unwrap(), dec("10.00"));
    }

    #[tokio::test]
    async fn test_sender_not_found() {
        let (svc, store) = service_with_store();
        let bob = store.insert_with_balance("bob", dec("0.00"));

        let err = svc.transfer(9999, bob, amount("1.00")).await.unwrap_err();
        assert!(matches!(err, BalanceError::SenderNotFound));
    }

    #[tokio::test]
    async fn test_recipient_not_found() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("50.00"));

        let err = svc.transfer(alice, 9999, amount("1.00")).await.unwrap_err();
        assert!(matches!(err, BalanceError::RecipientNotFound));
        assert_eq!(store.balance_of(alice).unwrap(), dec("50.00"));
    }

    #[tokio::test]
    async fn test_soft_deleted_recipient_not_found() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("50.00"));
        let bob = store.insert_with_balance("bob", dec("0.00"));
        store.soft_delete(bob).await.unwrap();

        let err = svc.transfer(alice, bob, amount("1.00")).await.unwrap_err();
        assert!(matches!(err, BalanceError::RecipientNotFound));
    }

    #[tokio::test]
    async fn test_get_balance() {
        let (svc, store) = service_with_store();
        let alice = store.insert_with_balance("alice", dec("150.75"));

        assert_eq!(svc.get_balance(alice).await.unwrap(), dec("150.75"));
        assert!(matches!(
            svc.get_balance(9999).await.unwrap_err(),
            BalanceError::NotFound
        ));
    }

    /// Total money in the system is invariant over any number of transfers.
    #[tokio::test]
    async fn test_concurrent_transfers_conserve_total() {
        let (svc, store) = service_with_store();
        let svc = Arc::new(svc);
        let alice = store.insert_with_balance("alice", dec("500.00"));
        let bob = store.insert_with_balance("bob", dec("500.00"));

        let mut handles = Vec::new();
        for i in 0..20 {
            let svc = svc.clone();
            // Mix of directions, some of which may legitimately fail
            let (from, to) = if i % 2 == 0 { (alice, bob) } else { (bob, alice) };
            handles.push(tokio::spawn(async move {
                let _ = svc.transfer(from, to, amount("37.37")).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let total = store.balance_of(alice).unwrap() + store.balance_of(bob).unwrap();
        assert_eq!(total, dec("1000.00"));
    }
}
