use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::events::VaultDepositEvent;
use crate::state::Vault;
use crate::utils::token;

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut)]
    pub vault: Account<'info, Vault>,

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

pub fn handle_deposit(ctx: Context<Deposit>, amount: u64, min_shares_out: u64) -> Result<()> {
    require!(amount > 0, ErrorCode::ZeroValue);
    require!(
        amount <= ctx.accounts.vault.max_deposit()?,
        ErrorCode::ExceedDepositLimit
    );

    // quote against pre-deposit totals; the minimum guards against the
    // quote shifting between simulation and execution
    let shares = ctx.accounts.vault.convert_to_shares(amount)?;
    require!(shares > 0, ErrorCode::ZeroValue);
    require!(shares >= min_shares_out, ErrorCode::SlippageExceeded);

    token::transfer_from_user(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.user_token_account.to_account_info(),
        ctx.accounts.vault_token_account.to_account_info(),
        ctx.accounts.user.to_account_info(),
        amount,
    )?;

    let seeds = ctx.accounts.vault.seeds();
    token::mint_to(
        ctx.accounts.token_program.to_account_info(),
        ctx.accounts.shares_mint.to_account_info(),
        ctx.accounts.user_shares_account.to_account_info(),
        ctx.accounts.vault.to_account_info(),
        shares,
        &seeds,
    )?;

    let vault = &mut ctx.accounts.vault;
    vault.handle_deposit(amount, shares)?;

    emit!(VaultDepositEvent {
        vault_key: vault.key,
        authority: ctx.accounts.user.key(),
        amount,
        shares,
        total_idle: vault.total_idle,
        total_deployed: vault.total_deployed,
        total_shares: vault.total_shares,
        share_price: vault.price_per_full_share()?,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
