use anchor_lang::prelude::*;

use crate::constants::{ROLES_SEED, STRATEGY_DATA_SEED};
use crate::errors::ErrorCode;
use crate::events::{StrategyInfoSetEvent, StrategyLengthSetEvent, WithdrawalFeeSetEvent};
use crate::state::{Controller, Roles, StrategyData, StrategySlot, Vault};
use crate::utils::strategy as strategy_utils;

#[derive(Accounts)]
pub struct SetStrategyInfo<'info> {
    pub vault: Account<'info, Vault>,

    #[account(mut, constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    /// The registry entry doubles as the approval proof: the PDA only
    /// exists for approved strategies.
    #[account(
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

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

pub fn handle_set_strategy_info(
    ctx: Context<SetStrategyInfo>,
    index: u8,
    cap_max: u64,
    allocation_bps: u64,
) -> Result<()> {
    require!(
        ctx.accounts.strategy_data.can_allocate(),
        ErrorCode::StrategyRetired
    );

    let strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(!strat.is_retired(), ErrorCode::StrategyRetired);

    ctx.accounts.controller.set_slot(
        index as usize,
        StrategySlot {
            strategy: ctx.accounts.strategy.key(),
            cap_max,
            allocation_bps,
        },
    )?;

    emit!(StrategyInfoSetEvent {
        controller_key: ctx.accounts.controller.key(),
        index,
        strategy_key: ctx.accounts.strategy.key(),
        cap_max,
        allocation_bps,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetUseSingleStrategy<'info> {
    pub vault: Account<'info, Vault>,

    #[account(mut, constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(
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

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

/// Slot 0 at full allocation with no cap, routing length one: the common
/// single-strategy configuration in one call.
pub fn handle_set_use_single_strategy(ctx: Context<SetUseSingleStrategy>) -> Result<()> {
    require!(
        ctx.accounts.strategy_data.can_allocate(),
        ErrorCode::StrategyRetired
    );

    let strat = strategy_utils::from_account_info(&ctx.accounts.strategy)?;
    require!(!strat.is_retired(), ErrorCode::StrategyRetired);

    ctx.accounts
        .controller
        .set_single_strategy(ctx.accounts.strategy.key())?;

    emit!(StrategyInfoSetEvent {
        controller_key: ctx.accounts.controller.key(),
        index: 0,
        strategy_key: ctx.accounts.strategy.key(),
        cap_max: u64::MAX,
        allocation_bps: crate::constants::MAX_BPS,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetStrategyLength<'info> {
    pub vault: Account<'info, Vault>,

    #[account(mut, constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

pub fn handle_set_strategy_length(ctx: Context<SetStrategyLength>, length: u8) -> Result<()> {
    ctx.accounts.controller.set_strategy_length(length)?;

    emit!(StrategyLengthSetEvent {
        controller_key: ctx.accounts.controller.key(),
        strategy_length: length,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SetWithdrawalFee<'info> {
    pub vault: Account<'info, Vault>,

    #[account(mut, constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.governance @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,
}

pub fn handle_set_withdrawal_fee(ctx: Context<SetWithdrawalFee>, bps: u64) -> Result<()> {
    ctx.accounts.controller.set_withdrawal_fee(bps)?;

    emit!(WithdrawalFeeSetEvent {
        controller_key: ctx.accounts.controller.key(),
        withdrawal_fee_bps: bps,
    });

    Ok(())
}
