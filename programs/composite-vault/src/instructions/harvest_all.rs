use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::{ACCOUNTS_PER_HARVEST, ROLES_SEED};
use crate::errors::ErrorCode;
use crate::events::{HarvestSkippedEvent, StrategyReportedEvent};
use crate::state::strategy::HarvestAccounts;
use crate::state::{Controller, Roles, Vault};
use crate::utils::strategy as strategy_utils;

#[derive(Accounts)]
pub struct HarvestAll<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.controller @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(mut, address = vault.underlying_token_acc)]
    pub vault_token_account: Account<'info, TokenAccount>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.harvester @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

/// Remaining accounts: one harvest group per active slot in slot order
/// (strategy_data, strategy, strategy token account, strategy reward
/// account, swap path, swap router, farm program, farm pool, farm reward
/// vault, farm stake vault), followed by every hop pool account any of the
/// swap paths references.
///
/// A strategy failing its eligibility checks (retired, missing swap path,
/// bad pairing) is reported and skipped; the rest of the batch proceeds. A
/// hard failure inside an external program still aborts the transaction,
/// which is what the single-strategy `harvest` instruction is for.
pub fn handle_harvest_all<'info>(
    ctx: Context<'_, '_, '_, 'info, HarvestAll<'info>>,
    min_want_out: u64,
) -> Result<()> {
    let n = ctx.accounts.controller.strategy_length as usize;
    require!(
        ctx.remaining_accounts.len() >= n * ACCOUNTS_PER_HARVEST,
        ErrorCode::InvalidAccountPairs
    );
    let (group_accounts, hop_accounts) =
        ctx.remaining_accounts.split_at(n * ACCOUNTS_PER_HARVEST);

    let vault_key = ctx.accounts.vault.key;
    let controller_key = ctx.accounts.controller.key();
    let vault_token_info = ctx.accounts.vault_token_account.to_account_info();
    let token_program_info = ctx.accounts.token_program.to_account_info();
    let timestamp = Clock::get()?.unix_timestamp;

    for (i, chunk) in group_accounts.chunks_exact(ACCOUNTS_PER_HARVEST).enumerate() {
        let strategy_key = ctx.accounts.controller.slots[i].strategy;

        let accounts = HarvestAccounts {
            strategy: &chunk[1],
            strategy_token_account: &chunk[2],
            strategy_reward_account: &chunk[3],
            swap_path: &chunk[4],
            swap_router: &chunk[5],
            farm_program: &chunk[6],
            farm_pool: &chunk[7],
            farm_pool_reward_account: &chunk[8],
            farm_pool_token_account: &chunk[9],
            vault_token_account: &vault_token_info,
            token_program: &token_program_info,
        };

        let result = harvest_one(
            &mut ctx.accounts.vault,
            controller_key,
            strategy_key,
            &chunk[0],
            &accounts,
            hop_accounts,
            min_want_out,
            timestamp,
        );

        match result {
            Ok(outcome) => {
                let vault = &ctx.accounts.vault;
                emit!(StrategyReportedEvent {
                    vault_key,
                    strategy_key,
                    claimed_reward: outcome.claimed_reward,
                    want_gained: outcome.want_gained,
                    compounded: outcome.compounded,
                    total_shares: vault.total_shares,
                    share_price: vault.price_per_full_share()?,
                    timestamp,
                });
            }
            Err(err) => {
                msg!("harvest skipped for strategy {}: {}", strategy_key, err);
                emit!(HarvestSkippedEvent {
                    vault_key,
                    strategy_key,
                    error_code: error_code_of(&err),
                });
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn harvest_one<'info>(
    vault: &mut Vault,
    controller_key: Pubkey,
    strategy_key: Pubkey,
    strategy_data_acc: &AccountInfo<'info>,
    accounts: &HarvestAccounts<'_, 'info>,
    hop_accounts: &[AccountInfo<'info>],
    min_want_out: u64,
    timestamp: i64,
) -> Result<crate::state::strategy::HarvestOutcome> {
    require!(
        accounts.strategy.key() == strategy_key,
        ErrorCode::InvalidAccountPairs
    );

    let mut data = strategy_utils::load_strategy_data(strategy_data_acc)?;
    require!(
        data.controller == controller_key && data.strategy == strategy_key,
        ErrorCode::InvalidAccountPairs
    );
    require!(data.can_allocate(), ErrorCode::StrategyRetired);

    let mut strat = strategy_utils::from_account_info(accounts.strategy)?;
    require!(
        strat.token_account() == accounts.strategy_token_account.key()
            && strat.reward_token_account() == accounts.strategy_reward_account.key(),
        ErrorCode::InvalidAccountPairs
    );

    let outcome = strat.harvest(accounts, hop_accounts, min_want_out)?;
    strategy_utils::save_changes(accounts.strategy, strat.as_ref())?;

    if outcome.compounded {
        data.add_debt(outcome.want_gained)?;
        vault.handle_compounded_profit(outcome.want_gained)?;
    } else if outcome.want_gained > 0 {
        vault.handle_realized_profit(outcome.want_gained)?;
    }
    data.last_report = timestamp;
    strategy_utils::store_strategy_data(strategy_data_acc, &data)?;

    Ok(outcome)
}

fn error_code_of(err: &Error) -> u32 {
    match err {
        Error::AnchorError(e) => e.error_code_number,
        Error::ProgramError(_) => 0,
    }
}
