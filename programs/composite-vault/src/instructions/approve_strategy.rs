use anchor_lang::prelude::*;

use crate::constants::{ROLES_SEED, STRATEGY_DATA_SEED};
use crate::errors::ErrorCode;
use crate::events::StrategyApprovedEvent;
use crate::state::{Controller, Roles, StrategyData, Vault};
use crate::utils::strategy as strategy_utils;

#[derive(Accounts)]
pub struct ApproveStrategy<'info> {
    pub vault: Account<'info, Vault>,

    #[account(constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(
        init_if_needed,
        payer = signer,
        space = 8 + StrategyData::INIT_SPACE,
        seeds = [
            STRATEGY_DATA_SEED.as_bytes(),
            controller.key().as_ref(),
            strategy.key().as_ref()
        ],
        bump,
    )]
    pub strategy_data: Account<'info, StrategyData>,

    /// CHECK: dispatched by discriminator
    pub strategy: UncheckedAccount<'info>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.governance @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Idempotent: approving an already approved or active strategy changes
/// nothing; approving a retired one resets it to approved once its debt is
/// written off.
pub fn handle_approve_strategy(ctx: Context<ApproveStrategy>) -> Result<()> {
    let strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(
        strat.controller() == ctx.accounts.controller.key(),
        ErrorCode::InvalidStrategyData
    );
    require!(
        strat.vault() == ctx.accounts.vault.key(),
        ErrorCode::InvalidStrategyData
    );
    // the strategy's want must be the vault's base asset
    require!(
        strat.underlying_mint() == ctx.accounts.vault.underlying_mint,
        ErrorCode::InvalidStrategyData
    );

    let data = &mut ctx.accounts.strategy_data;
    if data.strategy == Pubkey::default() {
        data.init(ctx.accounts.controller.key(), ctx.accounts.strategy.key())?;
    } else {
        data.reapprove()?;
    }

    emit!(StrategyApprovedEvent {
        controller_key: ctx.accounts.controller.key(),
        strategy_key: ctx.accounts.strategy.key(),
    });

    Ok(())
}
