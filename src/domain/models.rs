use super::errors::DecodeError;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::collections::BTreeMap;

/// A confirmed transaction as fetched from the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionRecord {
    /// First signature of the transaction
    pub signature: Signature,
    /// Slot in which the transaction was included
    pub slot: u64,
    /// Unix timestamp of the block, when the node knows it
    pub block_time: Option<i64>,
    /// Fee charged to the fee payer, in lamports
    pub fee: u64,
    pub status: TransactionStatus,
    /// `legacy` or the message version number
    pub version: Option<String>,
    /// Static keys of the message followed by lookup table addresses
    pub accounts: Vec<AccountEntry>,
    pub instructions: Vec<InstructionRecord>,
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
    pub pre_token_balances: Option<Vec<TokenBalance>>,
    pub post_token_balances: Option<Vec<TokenBalance>>,
    pub log_messages: Option<Vec<String>>,
    pub compute_units_consumed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatus {
    Success,
    /// Runtime error rendered as text
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountSource {
    /// Listed in the message itself
    Static,
    /// Loaded from an address lookup table
    Lookup,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountEntry {
    pub address: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
    pub source: AccountSource,
}

/// A compiled instruction: everything is an index into the account list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionRecord {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// Token account state before or after execution.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenBalance {
    pub account_index: u8,
    pub mint: String,
    pub owner: Option<String>,
    /// Raw integer amount
    pub amount: String,
    pub ui_amount_string: String,
    pub decimals: u8,
}

/// Pre and post snapshots of one token account. Either side may be missing,
/// e.g. when the account is created or closed by the transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenBalanceChange {
    pub pre: Option<TokenBalance>,
    pub post: Option<TokenBalance>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LamportChange {
    pub address: Pubkey,
    pub pre: u64,
    pub post: u64,
}

impl LamportChange {
    pub fn delta(&self) -> i128 {
        self.post as i128 - self.pre as i128
    }
}

impl TransactionRecord {
    /// The account charged the fee, always the first account.
    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.accounts.first().map(|account| &account.address)
    }

    pub fn account_address(&self, index: u8) -> Option<&Pubkey> {
        self.accounts
            .get(index as usize)
            .map(|account| &account.address)
    }

    /// Groups token balances by account index, in ascending index order.
    pub fn token_balance_changes(&self) -> BTreeMap<u8, TokenBalanceChange> {
        let mut changes: BTreeMap<u8, TokenBalanceChange> = BTreeMap::new();
        for balance in self.pre_token_balances.iter().flatten() {
            changes.entry(balance.account_index).or_default().pre = Some(balance.clone());
        }
        for balance in self.post_token_balances.iter().flatten() {
            changes.entry(balance.account_index).or_default().post = Some(balance.clone());
        }
        changes
    }

    /// Accounts whose lamport balance moved during execution.
    pub fn lamport_changes(&self) -> Vec<LamportChange> {
        self.pre_balances
            .iter()
            .zip(self.post_balances.iter())
            .zip(self.accounts.iter())
            .filter(|((pre, post), _)| pre != post)
            .map(|((pre, post), account)| LamportChange {
                address: account.address,
                pre: *pre,
                post: *post,
            })
            .collect()
    }
}

/// An instruction decoded against a known program layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub program_id: Pubkey,
    /// Instruction name and fields
    pub instruction: String,
    /// Accounts labelled with the role the instruction gives them
    pub accounts: Vec<(&'static str, Pubkey)>,
}

/// Trait for best-effort instruction decoding.
#[cfg_attr(test, mockall::automock)]
pub trait InstructionDecoder {
    /// Decodes `data` for `program_id`, given the accounts the instruction
    /// references in order.
    fn decode(
        &self,
        program_id: &Pubkey,
        accounts: &[Pubkey],
        data: &[u8],
    ) -> Result<DecodedInstruction, DecodeError>;
}
