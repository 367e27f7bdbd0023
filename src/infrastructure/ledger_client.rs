use crate::domain::{errors::LedgerClientError, models::TransactionRecord};
use solana_sdk::signature::Signature;

/// A trait representing a read-only client of the ledger RPC.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LedgerClient {
    /// Retrieves a confirmed transaction by its signature.
    ///
    /// # Arguments
    ///
    /// * `signature` - The signature identifying the transaction.
    ///
    /// # Returns
    ///
    /// * `Result<Option<TransactionRecord>, LedgerClientError>` - The transaction if the node
    ///   knows it, `None` if it does not exist or is not yet confirmed, or an error if the
    ///   request fails.
    async fn get_transaction(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionRecord>, LedgerClientError>;
}
