use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::constants::{ROLES_SEED, SWAP_PATH_SEED};
use crate::errors::ErrorCode;
use crate::events::SwapPathSetEvent;
use crate::state::{Controller, Roles, SwapPath, Vault};
use crate::utils::strategy as strategy_utils;

#[derive(Accounts)]
pub struct SetSwapPath<'info> {
    pub vault: Account<'info, Vault>,

    #[account(constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    /// CHECK: dispatched by discriminator
    pub strategy: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = signer,
        space = 8 + SwapPath::INIT_SPACE,
        seeds = [
            SWAP_PATH_SEED.as_bytes(),
            strategy.key().as_ref(),
            src_mint.key().as_ref(),
            dst_mint.key().as_ref()
        ],
        bump,
    )]
    pub swap_path: Account<'info, SwapPath>,

    pub src_mint: Account<'info, Mint>,
    pub dst_mint: Account<'info, Mint>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Declares the hop list for one (src, dst) conversion of one strategy.
/// Harvest fails closed for conversions with no configured path, so paths
/// are set before the first harvest that needs them.
pub fn handle_set_swap_path(ctx: Context<SetSwapPath>, hops: Vec<Pubkey>) -> Result<()> {
    let strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(
        strat.controller() == ctx.accounts.controller.key(),
        ErrorCode::InvalidStrategyData
    );

    let path = &mut ctx.accounts.swap_path;
    if path.strategy == Pubkey::default() {
        path.init(
            ctx.accounts.strategy.key(),
            ctx.accounts.src_mint.key(),
            ctx.accounts.dst_mint.key(),
        )?;
    }
    path.set_hops(hops)?;

    emit!(SwapPathSetEvent {
        strategy_key: ctx.accounts.strategy.key(),
        src_mint: ctx.accounts.src_mint.key(),
        dst_mint: ctx.accounts.dst_mint.key(),
        hops: path.hops.len() as u8,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct ConfigureStrategy<'info> {
    pub vault: Account<'info, Vault>,

    #[account(constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    /// CHECK: dispatched by discriminator
    #[account(mut)]
    pub strategy: UncheckedAccount<'info>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

pub fn handle_set_swap_router(ctx: Context<ConfigureStrategy>, router: Pubkey) -> Result<()> {
    let mut strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(
        strat.controller() == ctx.accounts.controller.key(),
        ErrorCode::InvalidStrategyData
    );

    strat.set_swap_router(router)?;
    strategy_utils::save_changes(&ctx.accounts.strategy, strat.as_ref())?;

    Ok(())
}

pub fn handle_set_harvest_policy(ctx: Context<ConfigureStrategy>, compound: bool) -> Result<()> {
    let mut strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(
        strat.controller() == ctx.accounts.controller.key(),
        ErrorCode::InvalidStrategyData
    );

    strat.set_harvest_policy(compound)?;
    strategy_utils::save_changes(&ctx.accounts.strategy, strat.as_ref())?;

    Ok(())
}
