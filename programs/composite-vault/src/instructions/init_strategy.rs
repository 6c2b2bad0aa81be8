use anchor_lang::prelude::*;
use anchor_lang::Discriminator;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{REWARD_SEED, ROLES_SEED, STRATEGY_SEED, UNDERLYING_SEED};
use crate::errors::ErrorCode;
use crate::events::StrategyInitEvent;
use crate::state::strategy::{Strategy, StrategyInitParams, StrategyType};
use crate::state::{Controller, FarmStrategy, Roles, SimpleStrategy, Vault};

#[derive(Accounts)]
#[instruction(strategy_type: StrategyType, index: u64)]
pub struct InitStrategy<'info> {
    /// CHECK: discriminator written for the requested family
    #[account(
        init,
        payer = signer,
        space = strategy_type.space(),
        seeds = [
            STRATEGY_SEED.as_bytes(),
            controller.key().as_ref(),
            index.to_le_bytes().as_ref()
        ],
        bump,
    )]
    pub strategy: UncheckedAccount<'info>,

    #[account(
        init,
        payer = signer,
        seeds = [UNDERLYING_SEED.as_bytes(), strategy.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = strategy,
    )]
    pub strategy_token_account: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = signer,
        seeds = [REWARD_SEED.as_bytes(), strategy.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = strategy,
    )]
    pub strategy_reward_account: Account<'info, TokenAccount>,

    pub vault: Account<'info, Vault>,

    #[account(constraint = controller.vault == vault.key() @ ErrorCode::ControllerMismatch)]
    pub controller: Account<'info, Controller>,

    #[account(address = vault.underlying_mint)]
    pub underlying_mint: Account<'info, Mint>,

    pub reward_mint: Account<'info, Mint>,

    #[account(seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()], bump)]
    pub roles: Account<'info, Roles>,

    #[account(mut, address = roles.strategist @ ErrorCode::AccessDenied)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handle_init_strategy(
    ctx: Context<InitStrategy>,
    strategy_type: StrategyType,
    index: u64,
    config_bytes: Vec<u8>,
) -> Result<()> {
    let strategy_key = ctx.accounts.strategy.key();
    let controller_key = ctx.accounts.controller.key();
    let underlying_mint = ctx.accounts.underlying_mint.key();
    let reward_mint = ctx.accounts.reward_mint.key();

    match strategy_type {
        StrategyType::Simple => init_internal::<SimpleStrategy>(&ctx, index, config_bytes)?,
        StrategyType::Farm => init_internal::<FarmStrategy>(&ctx, index, config_bytes)?,
    }

    emit!(StrategyInitEvent {
        strategy_key,
        controller_key,
        strategy_type: strategy_type as u8,
        underlying_mint,
        reward_mint,
    });

    Ok(())
}

fn init_internal<T>(ctx: &Context<InitStrategy>, index: u64, config_bytes: Vec<u8>) -> Result<()>
where
    T: Strategy + AnchorSerialize + Discriminator + Default,
{
    let params = StrategyInitParams {
        bump: ctx.bumps.strategy,
        index,
        key: ctx.accounts.strategy.key(),
        controller: ctx.accounts.controller.key(),
        vault: ctx.accounts.vault.key(),
        underlying_mint: ctx.accounts.underlying_mint.key(),
        underlying_decimals: ctx.accounts.underlying_mint.decimals,
        underlying_token_acc: ctx.accounts.strategy_token_account.key(),
        reward_mint: ctx.accounts.reward_mint.key(),
        reward_token_acc: ctx.accounts.strategy_reward_account.key(),
    };

    let strategy_info = ctx.accounts.strategy.to_account_info();
    let mut data = strategy_info.try_borrow_mut_data()?;
    data[..8].copy_from_slice(T::DISCRIMINATOR.as_ref());

    let mut strategy = T::default();
    strategy.init(&params, config_bytes)?;
    strategy.save_changes(&mut &mut data[8..])?;

    Ok(())
}
