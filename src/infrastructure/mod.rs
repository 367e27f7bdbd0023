pub mod ledger_client;
pub mod solana_client;
pub mod token_decoder;
