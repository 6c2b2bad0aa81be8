use anchor_lang::prelude::*;

use crate::constants::{CONTROLLER_SEED, ROLES_SEED};
use crate::errors::ErrorCode;
use crate::events::ControllerInitEvent;
use crate::state::{Controller, Roles, Vault};

#[derive(Accounts)]
#[instruction(index: u64)]
pub struct InitializeController<'info> {
    #[account(
        init,
        payer = signer,
        space = 8 + Controller::INIT_SPACE,
        seeds = [
            CONTROLLER_SEED.as_bytes(),
            vault.key().as_ref(),
            index.to_le_bytes().as_ref()
        ],
        bump,
    )]
    pub controller: Account<'info, Controller>,

    pub vault: Account<'info, Vault>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.governance @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handle_initialize_controller(
    ctx: Context<InitializeController>,
    index: u64,
    name: String,
) -> Result<()> {
    require!(name.len() <= 32, ErrorCode::InvalidVaultConfig);

    let controller_key = ctx.accounts.controller.key();
    ctx.accounts.controller.init(
        ctx.bumps.controller,
        index,
        controller_key,
        ctx.accounts.vault.key(),
        name,
    )?;

    emit!(ControllerInitEvent {
        controller_key,
        vault_key: ctx.accounts.vault.key(),
    });

    Ok(())
}
