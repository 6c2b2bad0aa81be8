pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("J1GmVbeYEBzMMxv8oiuSCYSR4AjG6r6zKbK7sgSYVLTC");

#[program]
pub mod composite_vault {
    use super::*;

    pub fn initialize_vault(ctx: Context<InitializeVault>, config: VaultConfig) -> Result<()> {
        handle_initialize_vault(ctx, config)
    }

    pub fn initialize_controller(
        ctx: Context<InitializeController>,
        index: u64,
        name: String,
    ) -> Result<()> {
        handle_initialize_controller(ctx, index, name)
    }

    pub fn deposit(ctx: Context<Deposit>, amount: u64, min_shares_out: u64) -> Result<()> {
        handle_deposit(ctx, amount, min_shares_out)
    }

    pub fn withdraw<'info>(
        ctx: Context<'_, '_, '_, 'info, Withdraw<'info>>,
        shares: u64,
        min_amount_out: u64,
    ) -> Result<()> {
        handle_withdraw(ctx, shares, min_amount_out)
    }

    pub fn earn<'info>(ctx: Context<'_, '_, '_, 'info, Earn<'info>>) -> Result<()> {
        handle_earn(ctx)
    }

    pub fn harvest<'info>(
        ctx: Context<'_, '_, '_, 'info, Harvest<'info>>,
        min_want_out: u64,
    ) -> Result<()> {
        handle_harvest(ctx, min_want_out)
    }

    pub fn harvest_all_strategies<'info>(
        ctx: Context<'_, '_, '_, 'info, HarvestAll<'info>>,
        min_want_out: u64,
    ) -> Result<()> {
        handle_harvest_all(ctx, min_want_out)
    }

    pub fn init_strategy(
        ctx: Context<InitStrategy>,
        strategy_type: StrategyType,
        index: u64,
        config_bytes: Vec<u8>,
    ) -> Result<()> {
        handle_init_strategy(ctx, strategy_type, index, config_bytes)
    }

    pub fn approve_strategy(ctx: Context<ApproveStrategy>) -> Result<()> {
        handle_approve_strategy(ctx)
    }

    pub fn set_strategy_info(
        ctx: Context<SetStrategyInfo>,
        index: u8,
        cap_max: u64,
        allocation_bps: u64,
    ) -> Result<()> {
        handle_set_strategy_info(ctx, index, cap_max, allocation_bps)
    }

    pub fn set_strategy_length(ctx: Context<SetStrategyLength>, length: u8) -> Result<()> {
        handle_set_strategy_length(ctx, length)
    }

    pub fn set_use_single_strategy(ctx: Context<SetUseSingleStrategy>) -> Result<()> {
        handle_set_use_single_strategy(ctx)
    }

    pub fn set_withdrawal_fee(ctx: Context<SetWithdrawalFee>, bps: u64) -> Result<()> {
        handle_set_withdrawal_fee(ctx, bps)
    }

    pub fn set_controller(ctx: Context<SetController>) -> Result<()> {
        handle_set_controller(ctx)
    }

    pub fn set_deposit_limit(ctx: Context<SetDepositLimit>, limit: u64) -> Result<()> {
        handle_set_deposit_limit(ctx, limit)
    }

    pub fn set_swap_path(ctx: Context<SetSwapPath>, hops: Vec<Pubkey>) -> Result<()> {
        handle_set_swap_path(ctx, hops)
    }

    pub fn set_swap_router(ctx: Context<ConfigureStrategy>, router: Pubkey) -> Result<()> {
        handle_set_swap_router(ctx, router)
    }

    pub fn set_harvest_policy(ctx: Context<ConfigureStrategy>, compound: bool) -> Result<()> {
        handle_set_harvest_policy(ctx, compound)
    }

    pub fn withdraw_all_from_strategy(ctx: Context<UnwindStrategy>) -> Result<()> {
        handle_withdraw_all_from_strategy(ctx)
    }

    pub fn retire_strategy(ctx: Context<UnwindStrategy>) -> Result<()> {
        handle_retire_strategy(ctx)
    }
}
