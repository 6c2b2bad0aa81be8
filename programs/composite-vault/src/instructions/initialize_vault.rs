use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{ROLES_SEED, SHARES_SEED, UNDERLYING_SEED, VAULT_SEED};
use crate::errors::ErrorCode;
use crate::events::VaultInitEvent;
use crate::state::{Roles, Vault, VaultConfig};

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(
        init,
        payer = signer,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED.as_bytes(), underlying_mint.key().as_ref()],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        init,
        payer = signer,
        seeds = [SHARES_SEED.as_bytes(), vault.key().as_ref()],
        bump,
        mint::decimals = underlying_mint.decimals,
        mint::authority = vault,
    )]
    pub shares_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = signer,
        seeds = [UNDERLYING_SEED.as_bytes(), vault.key().as_ref()],
        bump,
        token::mint = underlying_mint,
        token::authority = vault,
    )]
    pub vault_token_account: Account<'info, TokenAccount>,

    pub underlying_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = signer,
        space = 8 + Roles::INIT_SPACE,
        seeds = [ROLES_SEED.as_bytes(), vault.key().as_ref()],
        bump,
    )]
    pub roles: Account<'info, Roles>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handle_initialize_vault(ctx: Context<InitializeVault>, config: VaultConfig) -> Result<()> {
    require!(
        config.name.len() <= 32 && config.symbol.len() <= 8,
        ErrorCode::InvalidVaultConfig
    );

    let vault_key = ctx.accounts.vault.key();

    ctx.accounts.vault.init(
        ctx.bumps.vault,
        ctx.bumps.shares_mint,
        vault_key,
        ctx.accounts.underlying_mint.key(),
        ctx.accounts.underlying_mint.decimals,
        ctx.accounts.vault_token_account.key(),
        ctx.accounts.shares_mint.key(),
        &config,
    )?;

    ctx.accounts.roles.init(
        vault_key,
        config.governance,
        config.strategist,
        config.harvester,
    )?;

    emit!(VaultInitEvent {
        vault_key,
        underlying_mint: ctx.accounts.underlying_mint.key(),
        underlying_token_acc: ctx.accounts.vault_token_account.key(),
        underlying_decimals: ctx.accounts.underlying_mint.decimals,
        deposit_limit: config.deposit_limit,
    });

    Ok(())
}
