use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{ROLES_SEED, STRATEGY_DATA_SEED};
use crate::errors::ErrorCode;
use crate::events::{StrategyRetiredEvent, StrategyWithdrawAllEvent};
use crate::state::strategy::RouteAccounts;
use crate::state::{Controller, Roles, StrategyData, Vault};
use crate::utils::strategy as strategy_utils;

#[derive(Accounts)]
pub struct UnwindStrategy<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.controller @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(
        mut,
        seeds = [
            STRATEGY_DATA_SEED.as_bytes(),
            controller.key().as_ref(),
            strategy.key().as_ref()
        ],
        bump,
    )]
    pub strategy_data: Account<'info, StrategyData>,

    /// CHECK: dispatched by discriminator
    #[account(mut)]
    pub strategy: UncheckedAccount<'info>,

    #[account(mut)]
    pub strategy_token_account: Account<'info, TokenAccount>,

    /// CHECK: external farm program, validated against strategy config
    pub farm_program: UncheckedAccount<'info>,

    /// CHECK: farm pool state, validated against strategy config
    #[account(mut)]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: farm-side stake vault
    #[account(mut)]
    pub farm_pool_token_account: UncheckedAccount<'info>,

    #[account(mut, address = vault.underlying_token_acc)]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

fn unwind(ctx: &Context<UnwindStrategy>) -> Result<u64> {
    let mut strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(
        strat.controller() == ctx.accounts.controller.key(),
        ErrorCode::InvalidAccountPairs
    );
    require!(
        strat.token_account() == ctx.accounts.strategy_token_account.key(),
        ErrorCode::InvalidAccountPairs
    );

    let strategy_info = ctx.accounts.strategy.to_account_info();
    let strategy_token_info = ctx.accounts.strategy_token_account.to_account_info();
    let farm_program_info = ctx.accounts.farm_program.to_account_info();
    let farm_pool_info = ctx.accounts.farm_pool.to_account_info();
    let farm_pool_token_info = ctx.accounts.farm_pool_token_account.to_account_info();
    let vault_token_info = ctx.accounts.vault_token_account.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();

    let route = RouteAccounts {
        strategy: &strategy_info,
        strategy_token_account: &strategy_token_info,
        farm_program: &farm_program_info,
        farm_pool: &farm_pool_info,
        farm_pool_token_account: &farm_pool_token_info,
    };

    let freed = strat.release_all(&route, &vault_token_info, &token_program_info)?;
    strategy_utils::save_changes(&ctx.accounts.strategy, strat.as_ref())?;

    Ok(freed)
}

/// Pulls the strategy's entire position back into vault idle without
/// retiring it; the slot keeps its configuration.
pub fn handle_withdraw_all_from_strategy(ctx: Context<UnwindStrategy>) -> Result<()> {
    let freed = unwind(&ctx)?;

    let data = &mut ctx.accounts.strategy_data;
    data.reduce_debt(freed);
    ctx.accounts.vault.handle_strategy_return(freed, freed)?;

    emit!(StrategyWithdrawAllEvent {
        vault_key: ctx.accounts.vault.key,
        strategy_key: ctx.accounts.strategy.key(),
        freed,
    });

    Ok(())
}

/// Empties the strategy and marks it retired: it accepts no further
/// deposits and its slot must be reassigned before receiving capital
/// again. The difference between recorded debt and what the farm actually
/// returned is realized against vault assets here.
pub fn handle_retire_strategy(ctx: Context<UnwindStrategy>) -> Result<()> {
    let freed = unwind(&ctx)?;

    let mut strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    strat.mark_retired();
    strategy_utils::save_changes(&ctx.accounts.strategy, strat.as_ref())?;

    let data = &mut ctx.accounts.strategy_data;
    let outstanding_debt = data.current_debt;
    data.current_debt = 0;
    data.retire();

    ctx.accounts
        .vault
        .handle_strategy_return(freed, outstanding_debt)?;

    emit!(StrategyRetiredEvent {
        vault_key: ctx.accounts.vault.key,
        strategy_key: ctx.accounts.strategy.key(),
        freed,
        outstanding_debt,
    });

    Ok(())
}
