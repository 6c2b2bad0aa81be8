use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;

use crate::errors::ErrorCode;

/// Wire format of the external swap router's instruction. The router
/// guarantees at least `minimum_amount_out` or fails; the caller still
/// verifies the received amount by balance diff.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub enum RouterInstruction {
    Swap {
        amount_in: u64,
        minimum_amount_out: u64,
    },
}

/// Collects the hop pool account infos declared by a swap path from the
/// instruction's remaining accounts. Every configured hop must be present.
pub fn resolve_hops<'a, 'info>(
    hops: &[Pubkey],
    remaining: &'a [AccountInfo<'info>],
) -> Result<Vec<&'a AccountInfo<'info>>> {
    let mut infos = Vec::with_capacity(hops.len());
    for hop in hops {
        let info = remaining
            .iter()
            .find(|acc| acc.key == hop)
            .ok_or_else(|| error!(ErrorCode::MissingSwapPath))?;
        infos.push(info);
    }
    Ok(infos)
}

#[allow(clippy::too_many_arguments)]
pub fn swap<'info>(
    swap_router: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    src_token_account: &AccountInfo<'info>,
    dst_token_account: &AccountInfo<'info>,
    hop_pools: &[&AccountInfo<'info>],
    token_program: &AccountInfo<'info>,
    seeds: &[&[u8]],
    amount_in: u64,
    minimum_amount_out: u64,
) -> Result<()> {
    let mut metas = vec![
        AccountMeta::new_readonly(authority.key(), true),
        AccountMeta::new(src_token_account.key(), false),
        AccountMeta::new(dst_token_account.key(), false),
    ];
    for hop in hop_pools {
        metas.push(AccountMeta::new(hop.key(), false));
    }
    metas.push(AccountMeta::new_readonly(token_program.key(), false));

    let instruction = Instruction {
        program_id: swap_router.key(),
        accounts: metas,
        data: RouterInstruction::Swap {
            amount_in,
            minimum_amount_out,
        }
        .try_to_vec()?,
    };

    let mut account_infos = vec![
        authority.clone(),
        src_token_account.clone(),
        dst_token_account.clone(),
    ];
    for hop in hop_pools {
        account_infos.push((*hop).clone());
    }
    account_infos.push(token_program.clone());
    account_infos.push(swap_router.clone());

    invoke_signed(&instruction, &account_infos, &[seeds])?;

    Ok(())
}
