use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::ROLES_SEED;
use crate::errors::ErrorCode;
use crate::events::{EarnEvent, EarnSkippedEvent};
use crate::state::{Controller, Roles, Vault};
use crate::utils::{strategy as strategy_utils, token};

#[derive(Accounts)]
pub struct Earn<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.controller @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(mut, address = vault.underlying_token_acc)]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Remaining accounts: one route group per active slot, in slot order.
/// Pushes idle vault capital toward each strategy's allocation target,
/// never past its hard cap; retired strategies are skipped with an event
/// rather than failing the batch.
pub fn handle_earn<'info>(ctx: Context<'_, '_, '_, 'info, Earn<'info>>) -> Result<()> {
    let groups = strategy_utils::parse_route_groups(ctx.remaining_accounts)?;
    let controller = &ctx.accounts.controller;
    require!(
        groups.len() == controller.strategy_length as usize,
        ErrorCode::InvalidAccountPairs
    );

    let vault_key = ctx.accounts.vault.key;
    let controller_key = controller.key();

    // first pass: load every strategy and its registry entry
    let mut datas = Vec::with_capacity(groups.len());
    let mut strats = Vec::with_capacity(groups.len());
    let mut balances = Vec::with_capacity(groups.len());
    let mut eligible = Vec::with_capacity(groups.len());

    for (i, slot) in controller.active_slots().iter().enumerate() {
        let group = &groups[i];
        let data = strategy_utils::check_route_group(group, controller_key, slot.strategy)?;
        let strat = strategy_utils::from_account_info(group.strategy_acc)?;

        let ok = data.can_allocate() && !strat.is_retired();
        if !ok {
            emit!(EarnSkippedEvent {
                vault_key,
                strategy_key: slot.strategy,
            });
        }

        balances.push(strat.balance_of());
        eligible.push(ok && strat.available_deposit() > 0);
        datas.push(data);
        strats.push(strat);
    }

    let controller_assets = ctx.accounts.vault.total_assets()?;
    let plan = controller.plan_earn(
        controller_assets,
        ctx.accounts.vault.total_idle,
        &balances,
        &eligible,
    )?;

    let token_program_info = ctx.accounts.token_program.to_account_info();

    for alloc in plan {
        let group = &groups[alloc.index];
        let amount = std::cmp::min(alloc.amount, strats[alloc.index].available_deposit());
        if amount == 0 {
            continue;
        }

        // debit the vault book before the external transfer
        ctx.accounts.vault.handle_allocation(amount)?;

        let seeds = ctx.accounts.vault.seeds();
        token::transfer_with_signer(
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.vault_token_account.to_account_info(),
            group.strategy_token_account.clone(),
            ctx.accounts.vault.to_account_info(),
            amount,
            &seeds,
        )?;

        let strat = &mut strats[alloc.index];
        strat.deploy(&group.as_route(), &token_program_info, amount)?;
        strategy_utils::save_changes(group.strategy_acc, strat.as_ref())?;

        let data = &mut datas[alloc.index];
        data.add_debt(amount)?;
        data.activate();
        strategy_utils::store_strategy_data(group.strategy_data_acc, data)?;

        emit!(EarnEvent {
            vault_key,
            strategy_key: alloc.strategy,
            target: alloc.target,
            allocated: amount,
            strategy_balance: strat.balance_of(),
        });
    }

    Ok(())
}
