use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, SecondsFormat, Utc};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::domain::models::{
    AccountSource, DecodedInstruction, LamportChange, TokenBalance,
    TokenBalanceChange, TransactionRecord, TransactionStatus,
};

const BANNER: &str = "==============================";

/// What gets printed for one instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstructionView {
    Decoded(DecodedInstruction),
    /// Fallback when no decoder understood the instruction
    Raw { accounts: Vec<Pubkey>, data: Vec<u8> },
}

pub fn write_section_title<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", BANNER)
}

pub fn write_basic_info<W: Write>(out: &mut W, record: &TransactionRecord) -> io::Result<()> {
    write_section_title(out, "BASIC INFO")?;
    writeln!(out, "Slot: {}", record.slot)?;
    writeln!(out, "Block Time: {}", format_block_time(record.block_time))?;
    writeln!(out, "Fee: {}", record.fee)?;
    match &record.status {
        TransactionStatus::Success => writeln!(out, "Status: SUCCESS")?,
        TransactionStatus::Failed(err) => writeln!(out, "Status: FAILED ({})", err)?,
    }
    if let Some(version) = &record.version {
        writeln!(out, "Version: {}", version)?;
    }
    if let Some(units) = record.compute_units_consumed {
        writeln!(out, "Compute Units: {}", units)?;
    }
    Ok(())
}

pub fn write_accounts<W: Write>(out: &mut W, record: &TransactionRecord) -> io::Result<()> {
    write_section_title(out, "ACCOUNTS (with signer + writable)")?;
    for (index, account) in record.accounts.iter().enumerate() {
        let suffix = match account.source {
            AccountSource::Static => "",
            AccountSource::Lookup => " (lookup)",
        };
        writeln!(
            out,
            "{}. {} | signer: {} | writable: {}{}",
            index, account.address, account.is_signer, account.is_writable, suffix
        )?;
    }
    if let Some(fee_payer) = record.fee_payer() {
        writeln!(out)?;
        writeln!(out, "Fee Payer: {}", fee_payer)?;
    }
    Ok(())
}

pub fn write_instruction<W: Write>(
    out: &mut W,
    number: usize,
    program_id: &Pubkey,
    view: &InstructionView,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Instruction #{}", number)?;
    writeln!(out, "Program ID: {}", program_id)?;
    match view {
        InstructionView::Decoded(decoded) => {
            writeln!(out, "Decoded SPL Token Instruction: {}", decoded.instruction)?;
            for (role, account) in &decoded.accounts {
                writeln!(out, "  {}: {}", role, account)?;
            }
        }
        InstructionView::Raw { accounts, data } => {
            let accounts: Vec<String> = accounts.iter().map(ToString::to_string).collect();
            writeln!(out, "Accounts: [{}]", accounts.join(", "))?;
            writeln!(
                out,
                "Raw Data (base64): {}",
                general_purpose::STANDARD.encode(data)
            )?;
        }
    }
    Ok(())
}

pub fn write_token_balances<W: Write>(
    out: &mut W,
    changes: &BTreeMap<u8, TokenBalanceChange>,
) -> io::Result<()> {
    write_section_title(out, "TOKEN BALANCES (pre/post)")?;
    for (index, change) in changes {
        writeln!(out, "Account #{}", index)?;
        writeln!(out, " PRE: {}", format_token_balance(change.pre.as_ref()))?;
        writeln!(out, " POST: {}", format_token_balance(change.post.as_ref()))?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_lamport_changes<W: Write>(out: &mut W, changes: &[LamportChange]) -> io::Result<()> {
    write_section_title(out, "SOL BALANCE CHANGES")?;
    for change in changes {
        writeln!(
            out,
            "{}: {} -> {} ({:+})",
            change.address,
            change.pre,
            change.post,
            change.delta()
        )?;
    }
    Ok(())
}

pub fn write_logs<W: Write>(out: &mut W, logs: &[String]) -> io::Result<()> {
    write_section_title(out, "RUNTIME LOGS")?;
    for line in logs {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// ISO-8601 in UTC with millisecond precision, `N/A` when unknown.
pub fn format_block_time(block_time: Option<i64>) -> String {
    block_time
        .and_then(|timestamp| DateTime::<Utc>::from_timestamp(timestamp, 0))
        .map(|time| time.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "N/A".to_string())
}

fn format_token_balance(balance: Option<&TokenBalance>) -> String {
    match balance {
        Some(balance) => format!(
            "mint {} | owner {} | amount {} ({} with {} decimals)",
            balance.mint,
            balance.owner.as_deref().unwrap_or("unknown"),
            balance.amount,
            balance.ui_amount_string,
            balance.decimals
        ),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::fixtures::{record, token_balance};
    use crate::domain::models::AccountEntry;

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn block_time_is_iso_8601() {
        assert_eq!(
            format_block_time(Some(1_700_000_000)),
            "2023-11-14T22:13:20.000Z"
        );
        assert_eq!(format_block_time(None), "N/A");
    }

    #[test]
    fn basic_info_of_failed_transaction() {
        let mut record = record(vec![Pubkey::new_unique()]);
        record.status = TransactionStatus::Failed("insufficient funds".to_string());
        record.block_time = None;
        record.compute_units_consumed = Some(300);

        let text = render(|out| write_basic_info(out, &record));

        assert!(text.contains("Slot: 250000000\n"));
        assert!(text.contains("Block Time: N/A\n"));
        assert!(text.contains("Status: FAILED (insufficient funds)\n"));
        assert!(text.contains("Version: legacy\n"));
        assert!(text.contains("Compute Units: 300\n"));
    }

    #[test]
    fn lookup_accounts_are_marked() {
        let payer = Pubkey::new_unique();
        let lookup = Pubkey::new_unique();
        let mut record = record(vec![payer]);
        record.accounts.push(AccountEntry {
            address: lookup,
            is_signer: false,
            is_writable: true,
            source: AccountSource::Lookup,
        });

        let text = render(|out| write_accounts(out, &record));

        assert!(text.contains(&format!(
            "1. {} | signer: false | writable: true (lookup)\n",
            lookup
        )));
    }

    #[test]
    fn fee_payer_follows_account_list() {
        let payer = Pubkey::new_unique();
        let record = record(vec![payer, Pubkey::new_unique()]);

        let text = render(|out| write_accounts(out, &record));

        assert!(text.contains(&format!(
            "0. {} | signer: true | writable: true\n",
            payer
        )));
        assert!(text.ends_with(&format!("\nFee Payer: {}\n", payer)));
    }

    #[test]
    fn empty_account_list_has_no_fee_payer() {
        let record = record(vec![]);

        let text = render(|out| write_accounts(out, &record));

        assert!(!text.contains("Fee Payer"));
    }

    #[test]
    fn raw_instruction_shows_accounts_and_base64_data() {
        let program_id = Pubkey::new_unique();
        let account = Pubkey::new_unique();
        let view = InstructionView::Raw {
            accounts: vec![account],
            data: b"hello".to_vec(),
        };

        let text = render(|out| write_instruction(out, 3, &program_id, &view));

        assert!(text.contains("Instruction #3\n"));
        assert!(text.contains(&format!("Program ID: {}\n", program_id)));
        assert!(text.contains(&format!("Accounts: [{}]\n", account)));
        assert!(text.contains("Raw Data (base64): aGVsbG8=\n"));
    }

    #[test]
    fn token_balance_with_one_side_prints_none() {
        let mut changes = BTreeMap::new();
        changes.insert(
            4,
            TokenBalanceChange {
                pre: None,
                post: Some(token_balance(4, "12")),
            },
        );

        let text = render(|out| write_token_balances(out, &changes));

        assert!(text.contains("Account #4\n PRE: none\n POST: mint "));
        assert!(text.contains("amount 12 (12 with 0 decimals)"));
    }

    #[test]
    fn lamport_changes_are_signed() {
        let address = Pubkey::new_unique();
        let changes = vec![LamportChange {
            address,
            pre: 10,
            post: 4,
        }];

        let text = render(|out| write_lamport_changes(out, &changes));

        assert!(text.contains(&format!("{}: 10 -> 4 (-6)\n", address)));
    }
}
