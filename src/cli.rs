use clap::Parser;
use std::io::Write;

use crate::application::{ReportOutcome, Reporter};
use crate::domain::errors::ReportError;

pub const USAGE: &str = "Usage: sol-tx-inspector <signature>";

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Prints a human-readable report of a confirmed Solana transaction"
)]
pub struct Cli {
    /// Transaction signature, base58 encoded
    pub signature: Option<String>,
}

/// Runs one report for the parsed arguments.
///
/// Without a signature only the usage text is written and `make_reporter` is
/// never called, so no RPC client gets built.
pub async fn run<R, F, W>(
    cli: Cli,
    make_reporter: F,
    out: &mut W,
) -> Result<Option<ReportOutcome>, ReportError>
where
    R: Reporter,
    F: FnOnce() -> R,
    W: Write + Send,
{
    let Some(signature) = cli.signature else {
        writeln!(out, "{}", USAGE)?;
        return Ok(None);
    };

    let reporter = make_reporter();
    reporter.report(&signature, out).await.map(Some)
}
