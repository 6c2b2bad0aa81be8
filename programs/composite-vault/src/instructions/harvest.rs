use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{ROLES_SEED, STRATEGY_DATA_SEED};
use crate::errors::ErrorCode;
use crate::events::StrategyReportedEvent;
use crate::state::strategy::HarvestAccounts;
use crate::state::{Controller, Roles, StrategyData, Vault};
use crate::utils::strategy as strategy_utils;

#[derive(Accounts)]
pub struct Harvest<'info> {
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

    #[account(mut)]
    pub strategy_reward_account: Account<'info, TokenAccount>,

    /// CHECK: validated against the strategy's configured conversion
    pub swap_path: UncheckedAccount<'info>,

    /// CHECK: external router program, validated against strategy config
    pub swap_router: UncheckedAccount<'info>,

    /// CHECK: external farm program, validated against strategy config
    pub farm_program: UncheckedAccount<'info>,

    /// CHECK: farm pool state, validated against strategy config
    #[account(mut)]
    pub farm_pool: UncheckedAccount<'info>,

    /// CHECK: farm-side reward vault
    #[account(mut)]
    pub farm_pool_reward_account: UncheckedAccount<'info>,

    /// CHECK: farm-side stake vault
    #[account(mut)]
    pub farm_pool_token_account: UncheckedAccount<'info>,

    #[account(mut, address = vault.underlying_token_acc)]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.harvester @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Remaining accounts: the hop pool accounts of the reward-to-want swap
/// path. Harvesting one strategy per transaction isolates a hard external
/// failure to that strategy.
pub fn handle_harvest<'info>(
    ctx: Context<'_, '_, '_, 'info, Harvest<'info>>,
    min_want_out: u64,
) -> Result<()> {
    let mut strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(
        strat.controller() == ctx.accounts.controller.key(),
        ErrorCode::InvalidAccountPairs
    );
    require!(
        strat.token_account() == ctx.accounts.strategy_token_account.key(),
        ErrorCode::InvalidAccountPairs
    );
    require!(
        strat.reward_token_account() == ctx.accounts.strategy_reward_account.key(),
        ErrorCode::InvalidAccountPairs
    );

    let strategy_info = ctx.accounts.strategy.to_account_info();
    let strategy_token_info = ctx.accounts.strategy_token_account.to_account_info();
    let strategy_reward_info = ctx.accounts.strategy_reward_account.to_account_info();
    let swap_path_info = ctx.accounts.swap_path.to_account_info();
    let swap_router_info = ctx.accounts.swap_router.to_account_info();
    let farm_program_info = ctx.accounts.farm_program.to_account_info();
    let farm_pool_info = ctx.accounts.farm_pool.to_account_info();
    let farm_pool_reward_info = ctx.accounts.farm_pool_reward_account.to_account_info();
    let farm_pool_token_info = ctx.accounts.farm_pool_token_account.to_account_info();
    let vault_token_info = ctx.accounts.vault_token_account.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();

    let accounts = HarvestAccounts {
        strategy: &strategy_info,
        strategy_token_account: &strategy_token_info,
        strategy_reward_account: &strategy_reward_info,
        swap_path: &swap_path_info,
        swap_router: &swap_router_info,
        farm_program: &farm_program_info,
        farm_pool: &farm_pool_info,
        farm_pool_reward_account: &farm_pool_reward_info,
        farm_pool_token_account: &farm_pool_token_info,
        vault_token_account: &vault_token_info,
        token_program: &token_program_info,
    };

    let outcome = strat.harvest(&accounts, ctx.remaining_accounts, min_want_out)?;
    strategy_utils::save_changes(&ctx.accounts.strategy, strat.as_ref())?;

    let data = &mut ctx.accounts.strategy_data;
    if outcome.compounded {
        data.add_debt(outcome.want_gained)?;
        ctx.accounts.vault.handle_compounded_profit(outcome.want_gained)?;
    } else if outcome.want_gained > 0 {
        ctx.accounts.vault.handle_realized_profit(outcome.want_gained)?;
    }
    ctx.accounts.strategy_data.last_report = Clock::get()?.unix_timestamp;

    let vault = &ctx.accounts.vault;
    emit!(StrategyReportedEvent {
        vault_key: vault.key,
        strategy_key: ctx.accounts.strategy.key(),
        claimed_reward: outcome.claimed_reward,
        want_gained: outcome.want_gained,
        compounded: outcome.compounded,
        total_shares: vault.total_shares,
        share_price: vault.price_per_full_share()?,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
