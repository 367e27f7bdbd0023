use anyhow::Result;
use clap::Parser;
use sol_tx_inspector::application::config::ReporterConfig;
use sol_tx_inspector::application::reporter::TransactionReporter;
use sol_tx_inspector::cli::{self, Cli};
use sol_tx_inspector::infrastructure::solana_client::SolanaClient;
use sol_tx_inspector::infrastructure::token_decoder::SplTokenDecoder;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging on stderr, stdout carries the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Cli::parse();
    let config = ReporterConfig::default();
    let mut stdout = std::io::stdout();

    cli::run(
        args,
        || {
            TransactionReporter::builder()
                .ledger_client(SolanaClient::from_config(&config))
                .decoder(SplTokenDecoder)
                .config(config.clone())
                .build()
        },
        &mut stdout,
    )
    .await?;

    Ok(())
}
