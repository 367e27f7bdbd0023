use crate::domain::errors::ReportError;
use std::io::Write;

pub mod config;
pub mod render;
pub mod reporter;

/// How a report run ended, when it did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The transaction was found and printed
    Reported,
    /// The node has no confirmed transaction for the signature
    NotFound,
}

/// The `Reporter` trait fetches one transaction and writes a human-readable
/// report of it.
///
/// # Errors
///
/// A missing transaction is not an error, it yields `ReportOutcome::NotFound`.
/// Invalid signatures, RPC failures and write failures are returned as
/// `ReportError`.
#[async_trait::async_trait]
pub trait Reporter {
    async fn report<W>(&self, signature: &str, out: &mut W) -> Result<ReportOutcome, ReportError>
    where
        W: Write + Send;
}
