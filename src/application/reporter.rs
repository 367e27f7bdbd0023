use super::config::ReporterConfig;
use super::render::{self, InstructionView};
use super::{ReportOutcome, Reporter};
use crate::domain::{
    errors::ReportError,
    models::{InstructionDecoder, InstructionRecord, TransactionRecord},
};
use crate::infrastructure::ledger_client::LedgerClient;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::io::Write;
use std::str::FromStr;
use typed_builder::TypedBuilder;

#[derive(Clone, TypedBuilder)]
pub struct TransactionReporter<C, D> {
    ledger_client: C,
    decoder: D,
    config: ReporterConfig,
}

#[async_trait::async_trait]
impl<C, D> Reporter for TransactionReporter<C, D>
where
    C: LedgerClient + Send + Sync,
    D: InstructionDecoder + Send + Sync,
{
    async fn report<W>(&self, signature: &str, out: &mut W) -> Result<ReportOutcome, ReportError>
    where
        W: Write + Send,
    {
        let parsed = Signature::from_str(signature)
            .map_err(|e| ReportError::InvalidSignature(signature.to_string(), e))?;

        writeln!(out, "Fetching transaction: {}", signature)?;
        tracing::info!("Fetching transaction {} from {}", signature, self.config.rpc_url);

        let Some(record) = self.ledger_client.get_transaction(&parsed).await? else {
            tracing::warn!("Transaction {} not found on {}", signature, self.config.cluster);
            writeln!(out, "Transaction not found on {}.", self.config.cluster)?;
            return Ok(ReportOutcome::NotFound);
        };

        self.write_report(&record, out)?;
        Ok(ReportOutcome::Reported)
    }
}

impl<C, D> TransactionReporter<C, D>
where
    D: InstructionDecoder,
{
    fn write_report<W: Write>(
        &self,
        record: &TransactionRecord,
        out: &mut W,
    ) -> Result<(), ReportError> {
        render::write_basic_info(out, record)?;
        render::write_accounts(out, record)?;

        render::write_section_title(out, "INSTRUCTIONS (decoded)")?;
        for (i, instruction) in record.instructions.iter().enumerate() {
            let program_id = resolve(record, instruction.program_id_index)?;
            let view = self.view_instruction(record, i + 1, &program_id, instruction)?;
            render::write_instruction(out, i + 1, &program_id, &view)?;
        }

        let token_changes = record.token_balance_changes();
        if !token_changes.is_empty() {
            render::write_token_balances(out, &token_changes)?;
        }

        let lamport_changes = record.lamport_changes();
        if !lamport_changes.is_empty() {
            render::write_lamport_changes(out, &lamport_changes)?;
        }

        if let Some(logs) = &record.log_messages {
            render::write_logs(out, logs)?;
        }

        Ok(())
    }

    /// Decoded when the decoder understands the instruction, raw otherwise.
    fn view_instruction(
        &self,
        record: &TransactionRecord,
        number: usize,
        program_id: &Pubkey,
        instruction: &InstructionRecord,
    ) -> Result<InstructionView, ReportError> {
        let accounts = instruction
            .accounts
            .iter()
            .map(|index| resolve(record, *index))
            .collect::<Result<Vec<_>, _>>()?;

        match self
            .decoder
            .decode(program_id, &accounts, &instruction.data)
        {
            Ok(decoded) => Ok(InstructionView::Decoded(decoded)),
            Err(e) => {
                tracing::debug!("Instruction #{} left undecoded: {}", number, e);
                Ok(InstructionView::Raw {
                    accounts,
                    data: instruction.data.clone(),
                })
            }
        }
    }
}

fn resolve(record: &TransactionRecord, index: u8) -> Result<Pubkey, ReportError> {
    record
        .account_address(index)
        .copied()
        .ok_or(ReportError::AccountIndexOutOfRange(index))
}
