use solana_sdk::{pubkey::Pubkey, signature::ParseSignatureError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerClientError {
    #[error("Failed solana rpc client")]
    FailedSolanaRpcClient(#[from] solana_client::client_error::ClientError),
    #[error("Transaction {0} could not be decoded from the rpc payload")]
    InvalidTransaction(String),
    #[error("Transaction {0} has no status meta")]
    MissingMeta(String),
    #[error("Invalid address {0} in loaded addresses")]
    InvalidAddress(String),
}

/// Why an instruction could not be decoded. Always recoverable: the report
/// falls back to the raw instruction.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Program {0} is not supported by this decoder")]
    UnsupportedProgram(Pubkey),
    #[error("Invalid instruction data: {0}")]
    InvalidData(String),
    #[error("Instruction expects {expected} accounts, got {actual}")]
    MissingAccounts { expected: usize, actual: usize },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid transaction signature {0}")]
    InvalidSignature(String, #[source] ParseSignatureError),
    #[error("Failed to fetch transaction")]
    FailedToFetchTransaction(#[from] LedgerClientError),
    #[error("Account index {0} is out of range")]
    AccountIndexOutOfRange(u8),
    #[error("Failed to write report")]
    FailedToWriteReport(#[from] std::io::Error),
}
