use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::events::VaultWithdrawEvent;
use crate::state::{Controller, Vault};
use crate::utils::{strategy as strategy_utils, token};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.controller @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(mut, address = vault.underlying_token_acc)]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(mut, address = vault.shares_mint)]
    pub shares_mint: Account<'info, Mint>,

    #[account(mut, constraint = user_token_account.mint == vault.underlying_mint)]
    pub user_token_account: Account<'info, TokenAccount>,

    #[account(mut, constraint = user_shares_account.mint == shares_mint.key())]
    pub user_shares_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Remaining accounts: one route group per configured slot, in slot order
/// (see `utils::strategy::RouteGroup`). Groups are only consumed while the
/// requested amount exceeds what idle plus earlier pulls cover.
pub fn handle_withdraw<'info>(
    ctx: Context<'_, '_, '_, 'info, Withdraw<'info>>,
    shares: u64,
    min_amount_out: u64,
) -> Result<()> {
    require!(shares > 0, ErrorCode::ZeroValue);
    require!(
        ctx.accounts.user_shares_account.amount >= shares,
        ErrorCode::InsufficientShares
    );

    let gross = ctx.accounts.vault.convert_to_underlying(shares)?;
    require!(gross > 0, ErrorCode::ZeroValue);

    // burn before any value moves; a reentrant call during a strategy's
    // external withdrawal cannot spend these shares twice
    token::burn_from_user(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.shares_mint.to_account_info(),
        ctx.accounts.user_shares_account.to_account_info(),
        ctx.accounts.user.to_account_info(),
        shares,
    )?;
    ctx.accounts.vault.burn_shares(shares)?;

    // pull the shortfall from strategies in slot order, best effort: one
    // illiquid strategy must not freeze the liquidity the others hold
    let mut pulled_total: u64 = 0;
    if gross > ctx.accounts.vault.total_idle {
        let groups = strategy_utils::parse_route_groups(ctx.remaining_accounts)?;
        let mut group_iter = groups.iter();
        let vault_token_info = ctx.accounts.vault_token_account.to_account_info();
        let token_program_info = ctx.accounts.token_program.to_account_info();
        let controller_key = ctx.accounts.controller.key();

        for slot in ctx.accounts.controller.active_slots() {
            if !slot.is_configured() {
                continue;
            }

            let covered = ctx
                .accounts
                .vault
                .total_idle
                .checked_add(pulled_total)
                .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
            if covered >= gross {
                break;
            }

            let group = group_iter
                .next()
                .ok_or_else(|| error!(ErrorCode::InvalidAccountPairs))?;
            let mut data =
                strategy_utils::check_route_group(group, controller_key, slot.strategy)?;
            if !data.can_allocate() {
                continue;
            }

            let mut strat = strategy_utils::from_account_info(group.strategy_acc)?;
            let to_pull = std::cmp::min(gross - covered, strat.available_withdraw());
            if to_pull == 0 {
                continue;
            }

            // `actual < to_pull` is an expected shortfall, not an error
            let actual = strat.free(
                &group.as_route(),
                &vault_token_info,
                &token_program_info,
                to_pull,
            )?;
            strategy_utils::save_changes(group.strategy_acc, strat.as_ref())?;

            data.reduce_debt(actual);
            strategy_utils::store_strategy_data(group.strategy_data_acc, &data)?;

            pulled_total = pulled_total
                .checked_add(actual)
                .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        }
    }

    let available = ctx
        .accounts
        .vault
        .total_idle
        .checked_add(pulled_total)
        .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
    let gross_collected = std::cmp::min(gross, available);

    let fee = ctx.accounts.controller.withdrawal_fee(gross_collected)?;
    let net = gross_collected - fee;
    require!(net >= min_amount_out, ErrorCode::SlippageExceeded);
    require!(net > 0, ErrorCode::InsufficientLiquidity);

    // settle the book before paying out; the fee stays in idle for the
    // remaining holders
    let vault = &mut ctx.accounts.vault;
    vault.handle_strategy_return(pulled_total, pulled_total)?;
    vault.total_idle = vault
        .total_idle
        .checked_sub(net)
        .ok_or_else(|| error!(ErrorCode::InsufficientLiquidity))?;

    let seeds = ctx.accounts.vault.seeds();
    token::transfer_with_signer(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        net,
        &seeds,
    )?;

    let vault = &ctx.accounts.vault;
    emit!(VaultWithdrawEvent {
        vault_key: vault.key,
        authority: ctx.accounts.user.key(),
        shares,
        gross_amount: gross_collected,
        fee,
        net_amount: net,
        total_idle: vault.total_idle,
        total_deployed: vault.total_deployed,
        total_shares: vault.total_shares,
        share_price: vault.price_per_full_share()?,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
