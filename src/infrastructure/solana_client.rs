use serde_json::json;
use solana_client::{
    nonblocking::rpc_client::RpcClient, rpc_config::RpcTransactionConfig,
    rpc_request::RpcRequest,
};
use solana_sdk::{
    commitment_config::CommitmentConfig, message::VersionedMessage, pubkey::Pubkey,
    signature::Signature, transaction::TransactionVersion,
};
use solana_transaction_status::{
    option_serializer::OptionSerializer, EncodedConfirmedTransactionWithStatusMeta,
    UiLoadedAddresses, UiTransactionEncoding, UiTransactionTokenBalance,
};
use std::{str::FromStr, sync::Arc};

use crate::application::config::ReporterConfig;
use crate::domain::{
    errors::LedgerClientError,
    models::{
        AccountEntry, AccountSource, InstructionRecord, TokenBalance, TransactionRecord,
        TransactionStatus,
    },
};

use super::ledger_client::LedgerClient;

/// A client for reading transactions from a Solana RPC endpoint.
#[derive(Clone)]
pub struct SolanaClient {
    rpc_client: Arc<RpcClient>,
    commitment: CommitmentConfig,
    max_supported_transaction_version: u8,
}

impl SolanaClient {
    /// Creates a new `SolanaClient` for the endpoint and commitment level in `config`.
    pub fn from_config(config: &ReporterConfig) -> Self {
        Self {
            rpc_client: Arc::new(RpcClient::new_with_commitment(
                config.rpc_url.clone(),
                config.commitment,
            )),
            commitment: config.commitment,
            max_supported_transaction_version: config.max_supported_transaction_version,
        }
    }
}

#[async_trait::async_trait]
impl LedgerClient for SolanaClient {
    /// Retrieves a transaction with `getTransaction`, base64 encoded so the
    /// message can be decoded locally.
    async fn get_transaction(
        &self,
        signature: &Signature,
    ) -> Result<Option<TransactionRecord>, LedgerClientError> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Base64),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(self.max_supported_transaction_version),
        };

        // The node answers `null` for unknown or not yet confirmed signatures.
        let result: Option<EncodedConfirmedTransactionWithStatusMeta> = self
            .rpc_client
            .send(
                RpcRequest::GetTransaction,
                json!([signature.to_string(), config]),
            )
            .await?;

        result.map(|tx| into_record(signature, tx)).transpose()
    }
}

fn into_record(
    signature: &Signature,
    tx: EncodedConfirmedTransactionWithStatusMeta,
) -> Result<TransactionRecord, LedgerClientError> {
    let meta = tx
        .transaction
        .meta
        .ok_or_else(|| LedgerClientError::MissingMeta(signature.to_string()))?;
    let decoded = tx
        .transaction
        .transaction
        .decode()
        .ok_or_else(|| LedgerClientError::InvalidTransaction(signature.to_string()))?;

    let mut accounts = static_accounts(&decoded.message);
    if let Some(loaded) = Option::<UiLoadedAddresses>::from(meta.loaded_addresses) {
        accounts.extend(lookup_accounts(&loaded)?);
    }

    let instructions = decoded
        .message
        .instructions()
        .iter()
        .map(|instruction| InstructionRecord {
            program_id_index: instruction.program_id_index,
            accounts: instruction.accounts.clone(),
            data: instruction.data.clone(),
        })
        .collect();

    let status = match meta.err {
        None => TransactionStatus::Success,
        Some(err) => TransactionStatus::Failed(err.to_string()),
    };

    let version = tx.transaction.version.map(|version| match version {
        TransactionVersion::Legacy(_) => "legacy".to_string(),
        TransactionVersion::Number(number) => number.to_string(),
    });

    Ok(TransactionRecord {
        signature: *signature,
        slot: tx.slot,
        block_time: tx.block_time,
        fee: meta.fee,
        status,
        version,
        accounts,
        instructions,
        pre_balances: meta.pre_balances,
        post_balances: meta.post_balances,
        pre_token_balances: into_token_balances(meta.pre_token_balances),
        post_token_balances: into_token_balances(meta.post_token_balances),
        log_messages: meta.log_messages.into(),
        compute_units_consumed: meta.compute_units_consumed.into(),
    })
}

/// Signer and writable flags follow the message header layout:
/// `[writable signers | readonly signers | writable non-signers | readonly non-signers]`.
fn static_accounts(message: &VersionedMessage) -> Vec<AccountEntry> {
    let header = message.header();
    let keys = message.static_account_keys();
    let signers = header.num_required_signatures as usize;
    let writable_signers = signers.saturating_sub(header.num_readonly_signed_accounts as usize);
    let writable_non_signers = keys
        .len()
        .saturating_sub(signers)
        .saturating_sub(header.num_readonly_unsigned_accounts as usize);

    keys.iter()
        .enumerate()
        .map(|(index, address)| AccountEntry {
            address: *address,
            is_signer: index < signers,
            is_writable: if index < signers {
                index < writable_signers
            } else {
                index - signers < writable_non_signers
            },
            source: AccountSource::Static,
        })
        .collect()
}

/// Lookup table addresses come after the static keys, writable ones first.
fn lookup_accounts(loaded: &UiLoadedAddresses) -> Result<Vec<AccountEntry>, LedgerClientError> {
    let writable = loaded.writable.iter().map(|address| (address, true));
    let readonly = loaded.readonly.iter().map(|address| (address, false));

    writable
        .chain(readonly)
        .map(|(address, is_writable)| {
            let address = Pubkey::from_str(address)
                .map_err(|_| LedgerClientError::InvalidAddress(address.clone()))?;
            Ok(AccountEntry {
                address,
                is_signer: false,
                is_writable,
                source: AccountSource::Lookup,
            })
        })
        .collect()
}

fn into_token_balances(
    balances: OptionSerializer<Vec<UiTransactionTokenBalance>>,
) -> Option<Vec<TokenBalance>> {
    Option::<Vec<UiTransactionTokenBalance>>::from(balances).map(|balances| {
        balances
            .into_iter()
            .map(|balance| TokenBalance {
                account_index: balance.account_index,
                mint: balance.mint,
                owner: balance.owner.into(),
                amount: balance.ui_token_amount.amount,
                ui_amount_string: balance.ui_token_amount.ui_amount_string,
                decimals: balance.ui_token_amount.decimals,
            })
            .collect()
    })
}
