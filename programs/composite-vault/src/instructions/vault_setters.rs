use anchor_lang::prelude::*;

use crate::constants::ROLES_SEED;
use crate::errors::ErrorCode;
use crate::events::{ControllerSetEvent, DepositLimitSetEvent};
use crate::state::{Controller, Roles, Vault};

#[derive(Accounts)]
pub struct SetController<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.governance @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

/// Swaps the routing controller. Capital deployed under the previous
/// controller's strategies does not migrate; that is an explicit operation
/// run before the swap.
pub fn handle_set_controller(ctx: Context<SetController>) -> Result<()> {
    ctx.accounts.vault.controller = ctx.accounts.controller.key();

    emit!(ControllerSetEvent {
        vault_key: ctx.accounts.vault.key(),
        controller_key: ctx.accounts.controller.key(),
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetDepositLimit<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.governance @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

pub fn handle_set_deposit_limit(ctx: Context<SetDepositLimit>, limit: u64) -> Result<()> {
    ctx.accounts.vault.deposit_limit = limit;

    emit!(DepositLimitSetEvent {
        vault_key: ctx.accounts.vault.key(),
        deposit_limit: limit,
    });

    Ok(())
}
