use solana_sdk::pubkey::Pubkey;
use spl_token::instruction::TokenInstruction;

use crate::domain::{
    errors::DecodeError,
    models::{DecodedInstruction, InstructionDecoder},
};

/// Decodes instructions of the SPL Token program.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplTokenDecoder;

impl InstructionDecoder for SplTokenDecoder {
    fn decode(
        &self,
        program_id: &Pubkey,
        accounts: &[Pubkey],
        data: &[u8],
    ) -> Result<DecodedInstruction, DecodeError> {
        if *program_id != spl_token::id() {
            return Err(DecodeError::UnsupportedProgram(*program_id));
        }

        let instruction = TokenInstruction::unpack(data)
            .map_err(|e| DecodeError::InvalidData(e.to_string()))?;

        let roles = account_roles(&instruction);
        if accounts.len() < roles.len() {
            return Err(DecodeError::MissingAccounts {
                expected: roles.len(),
                actual: accounts.len(),
            });
        }

        // Accounts past the named ones are multisig signers.
        let accounts = accounts
            .iter()
            .enumerate()
            .map(|(i, account)| (roles.get(i).copied().unwrap_or("signer"), *account))
            .collect();

        Ok(DecodedInstruction {
            program_id: *program_id,
            instruction: format!("{:?}", instruction),
            accounts,
        })
    }
}

fn account_roles(instruction: &TokenInstruction) -> &'static [&'static str] {
    match instruction {
        TokenInstruction::InitializeMint { .. } => &["mint", "rent_sysvar"],
        TokenInstruction::InitializeAccount => &["account", "mint", "owner", "rent_sysvar"],
        TokenInstruction::InitializeMultisig { .. } => &["multisig", "rent_sysvar"],
        TokenInstruction::Transfer { .. } => &["source", "destination", "owner"],
        TokenInstruction::Approve { .. } => &["source", "delegate", "owner"],
        TokenInstruction::Revoke => &["source", "owner"],
        TokenInstruction::SetAuthority { .. } => &["account", "current_authority"],
        TokenInstruction::MintTo { .. } => &["mint", "destination", "authority"],
        TokenInstruction::Burn { .. } => &["account", "mint", "owner"],
        TokenInstruction::CloseAccount => &["account", "destination", "owner"],
        TokenInstruction::FreezeAccount | TokenInstruction::ThawAccount => {
            &["account", "mint", "authority"]
        }
        TokenInstruction::TransferChecked { .. } => &["source", "mint", "destination", "owner"],
        TokenInstruction::ApproveChecked { .. } => &["source", "mint", "delegate", "owner"],
        TokenInstruction::MintToChecked { .. } => &["mint", "destination", "authority"],
        TokenInstruction::BurnChecked { .. } => &["account", "mint", "owner"],
        TokenInstruction::InitializeAccount2 { .. } => &["account", "mint", "rent_sysvar"],
        TokenInstruction::SyncNative => &["account"],
        TokenInstruction::InitializeAccount3 { .. } => &["account", "mint"],
        TokenInstruction::InitializeMultisig2 { .. } => &["multisig"],
        TokenInstruction::InitializeMint2 { .. } => &["mint"],
        TokenInstruction::GetAccountDataSize => &["mint"],
        TokenInstruction::InitializeImmutableOwner => &["account"],
        TokenInstruction::AmountToUiAmount { .. } | TokenInstruction::UiAmountToAmount { .. } => {
            &["mint"]
        }
        #[allow(unreachable_patterns)]
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spl_token::instruction as token_instruction;

    fn keys(count: usize) -> Vec<Pubkey> {
        (0..count).map(|_| Pubkey::new_unique()).collect()
    }

    #[test]
    fn token_program_id_is_an_sdk_pubkey() {
        let program_id: Pubkey =
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".parse().unwrap();
        let data = TokenInstruction::SyncNative.pack();

        assert_eq!(spl_token::id(), program_id);
        assert!(SplTokenDecoder
            .decode(&program_id, &keys(1), &data)
            .is_ok());
    }

    #[test]
    fn decodes_transfer_with_account_roles() {
        let [source, destination, owner] = [
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        ];
        let instruction = token_instruction::transfer(
            &spl_token::id(),
            &source,
            &destination,
            &owner,
            &[],
            1_000,
        )
        .unwrap();

        let decoded = SplTokenDecoder
            .decode(
                &spl_token::id(),
                &[source, destination, owner],
                &instruction.data,
            )
            .unwrap();

        assert_eq!(decoded.program_id, spl_token::id());
        assert_eq!(decoded.instruction, "Transfer { amount: 1000 }");
        assert_eq!(
            decoded.accounts,
            vec![
                ("source", source),
                ("destination", destination),
                ("owner", owner)
            ]
        );
    }

    #[test]
    fn labels_extra_accounts_as_multisig_signers() {
        let accounts = keys(5);
        let data = TokenInstruction::TransferChecked {
            amount: 5,
            decimals: 2,
        }
        .pack();

        let decoded = SplTokenDecoder
            .decode(&spl_token::id(), &accounts, &data)
            .unwrap();

        let roles: Vec<_> = decoded.accounts.iter().map(|(role, _)| *role).collect();
        assert_eq!(
            roles,
            vec!["source", "mint", "destination", "owner", "signer"]
        );
    }

    #[test]
    fn rejects_other_programs() {
        let program_id = Pubkey::new_unique();
        let data = TokenInstruction::SyncNative.pack();

        let result = SplTokenDecoder.decode(&program_id, &keys(1), &data);

        assert_eq!(result, Err(DecodeError::UnsupportedProgram(program_id)));
    }

    #[test]
    fn rejects_unknown_instruction_data() {
        let result = SplTokenDecoder.decode(&spl_token::id(), &keys(3), &[0xff, 1, 2]);

        assert!(matches!(result, Err(DecodeError::InvalidData(_))));
    }

    #[test]
    fn rejects_too_few_accounts() {
        let data = TokenInstruction::Transfer { amount: 1 }.pack();

        let result = SplTokenDecoder.decode(&spl_token::id(), &keys(2), &data);

        assert_eq!(
            result,
            Err(DecodeError::MissingAccounts {
                expected: 3,
                actual: 2
            })
        );
    }
}
