use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

/// Wire format of the external farm program's instructions. The farm is an
/// opaque collaborator; deposits and withdrawals are verified by token
/// balance diffs, never by trusting its return data.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub enum FarmInstruction {
    Deposit { pool_id: u64, amount: u64 },
    Withdraw { pool_id: u64, amount: u64 },
    Claim { pool_id: u64 },
}

#[allow(clippy::too_many_arguments)]
pub fn deposit_to<'info>(
    farm_program: &AccountInfo<'info>,
    farm_pool: &AccountInfo<'info>,
    farm_pool_token_account: &AccountInfo<'info>,
    strategy_token_account: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    seeds: &[&[u8]],
    pool_id: u64,
    amount: u64,
) -> Result<()> {
    invoke_farm(
        farm_program,
        &[
            farm_pool,
            farm_pool_token_account,
            strategy_token_account,
            authority,
            token_program,
        ],
        seeds,
        FarmInstruction::Deposit { pool_id, amount },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw_from<'info>(
    farm_program: &AccountInfo<'info>,
    farm_pool: &AccountInfo<'info>,
    farm_pool_token_account: &AccountInfo<'info>,
    strategy_token_account: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    seeds: &[&[u8]],
    pool_id: u64,
    amount: u64,
) -> Result<()> {
    invoke_farm(
        farm_program,
        &[
            farm_pool,
            farm_pool_token_account,
            strategy_token_account,
            authority,
            token_program,
        ],
        seeds,
        FarmInstruction::Withdraw { pool_id, amount },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn claim<'info>(
    farm_program: &AccountInfo<'info>,
    farm_pool: &AccountInfo<'info>,
    farm_pool_reward_account: &AccountInfo<'info>,
    strategy_reward_account: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    token_program: &AccountInfo<'info>,
    seeds: &[&[u8]],
    pool_id: u64,
) -> Result<()> {
    invoke_farm(
        farm_program,
        &[
            farm_pool,
            farm_pool_reward_account,
            strategy_reward_account,
            authority,
            token_program,
        ],
        seeds,
        FarmInstruction::Claim { pool_id },
    )
}

fn invoke_farm<'info>(
    farm_program: &AccountInfo<'info>,
    accounts: &[&AccountInfo<'info>],
    seeds: &[&[u8]],
    data: FarmInstruction,
) -> Result<()> {
    let mut metas: Vec<AccountMeta> = accounts
        .iter()
        .map(|acc| AccountMeta::new(acc.key(), false))
        .collect();
    // second-to-last account is the strategy PDA authority, last the token
    // program; both are read-only, the authority signs
    let len = metas.len();
    metas[len - 2] = AccountMeta::new_readonly(accounts[len - 2].key(), true);
    metas[len - 1] = AccountMeta::new_readonly(accounts[len - 1].key(), false);

    let instruction = Instruction {
        program_id: farm_program.key(),
        accounts: metas,
        data: data.try_to_vec()?,
    };

    let mut account_infos: Vec<AccountInfo<'info>> =
        accounts.iter().map(|acc| (*acc).clone()).collect();
    account_infos.push(farm_program.clone());

    invoke_signed(&instruction, &account_infos, &[seeds])?;

    Ok(())
}
