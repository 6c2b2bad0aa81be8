use anchor_lang::prelude::*;

use crate::constants::{SHARE_PRICE_SCALE, VAULT_SEED};
use crate::errors::ErrorCode;
use crate::utils::math;

#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Vault {
    pub bump: [u8; 1],
    pub shares_bump: [u8; 1],

    pub key: Pubkey,

    pub underlying_mint: Pubkey,
    pub underlying_token_acc: Pubkey,
    pub underlying_decimals: u8,

    pub shares_mint: Pubkey,

    /// Current controller; swappable by governance, funds do not migrate
    /// automatically.
    pub controller: Pubkey,

    /// Underlying held by the vault directly, not yet routed to strategies.
    pub total_idle: u64,
    /// Underlying the controller has placed into strategies, at cost plus
    /// compounded harvest gains.
    pub total_deployed: u64,
    pub total_shares: u64,

    /// Zero means unlimited.
    pub deposit_limit: u64,

    #[max_len(32)]
    pub name: String,
    #[max_len(8)]
    pub symbol: String,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct VaultConfig {
    pub name: String,
    pub symbol: String,
    pub deposit_limit: u64,
    pub governance: Pubkey,
    pub strategist: Pubkey,
    pub harvester: Pubkey,
}

impl Vault {
    pub fn seeds(&self) -> [&[u8]; 3] {
        [
            VAULT_SEED.as_bytes(),
            self.underlying_mint.as_ref(),
            self.bump.as_ref(),
        ]
    }

    #[allow(clippy::too_many_arguments)]
    pub fn init(
        &mut self,
        bump: u8,
        shares_bump: u8,
        key: Pubkey,
        underlying_mint: Pubkey,
        underlying_decimals: u8,
        underlying_token_acc: Pubkey,
        shares_mint: Pubkey,
        config: &VaultConfig,
    ) -> Result<()> {
        self.bump = [bump];
        self.shares_bump = [shares_bump];
        self.key = key;

        self.underlying_mint = underlying_mint;
        self.underlying_decimals = underlying_decimals;
        self.underlying_token_acc = underlying_token_acc;
        self.shares_mint = shares_mint;

        self.controller = Pubkey::default();
        self.deposit_limit = config.deposit_limit;
        self.name = config.name.clone();
        self.symbol = config.symbol.clone();

        self.total_idle = 0;
        self.total_deployed = 0;
        self.total_shares = 0;

        Ok(())
    }

    pub fn total_assets(&self) -> Result<u64> {
        self.total_idle
            .checked_add(self.total_deployed)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn max_deposit(&self) -> Result<u64> {
        if self.deposit_limit == 0 {
            return Ok(u64::MAX);
        }
        Ok(self.deposit_limit.saturating_sub(self.total_assets()?))
    }

    /// Shares minted for `amount` of underlying at the current ratio,
    /// 1:1 on the bootstrap deposit.
    pub fn convert_to_shares(&self, amount: u64) -> Result<u64> {
        let total_assets = self.total_assets()?;
        if self.total_shares == 0 || total_assets == 0 {
            return Ok(amount);
        }
        math::mul_div(amount, self.total_shares, total_assets)
    }

    /// Underlying owed for `shares` at the current ratio.
    pub fn convert_to_underlying(&self, shares: u64) -> Result<u64> {
        if self.total_shares == 0 {
            return Ok(shares);
        }
        math::mul_div(shares, self.total_assets()?, self.total_shares)
    }

    /// Price of one full share, 1e18 fixed point. Reports the bootstrap
    /// price when no shares exist.
    pub fn price_per_full_share(&self) -> Result<u128> {
        if self.total_shares == 0 {
            return Ok(SHARE_PRICE_SCALE);
        }
        (self.total_assets()? as u128)
            .checked_mul(SHARE_PRICE_SCALE)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?
            .checked_div(self.total_shares as u128)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn handle_deposit(&mut self, amount: u64, shares: u64) -> Result<()> {
        self.total_idle = self
            .total_idle
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    pub fn burn_shares(&mut self, shares: u64) -> Result<()> {
        self.total_shares = self
            .total_shares
            .checked_sub(shares)
            .ok_or_else(|| error!(ErrorCode::InsufficientShares))?;
        Ok(())
    }

    /// Accounting for capital leaving idle into a strategy.
    pub fn handle_allocation(&mut self, amount: u64) -> Result<()> {
        self.total_idle = self
            .total_idle
            .checked_sub(amount)
            .ok_or_else(|| error!(ErrorCode::InsufficientLiquidity))?;
        self.total_deployed = self
            .total_deployed
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    /// Accounting for capital returning from a strategy into idle. The
    /// amount actually received may differ from the debt written off when
    /// the strategy realized a gain or loss in the farm.
    pub fn handle_strategy_return(&mut self, received: u64, debt_written_off: u64) -> Result<()> {
        self.total_idle = self
            .total_idle
            .checked_add(received)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        self.total_deployed = self.total_deployed.saturating_sub(debt_written_off);
        Ok(())
    }

    /// Harvest profit realized into the vault without minting shares.
    pub fn handle_realized_profit(&mut self, amount: u64) -> Result<()> {
        self.total_idle = self
            .total_idle
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    /// Harvest profit compounded inside a strategy's farm position.
    pub fn handle_compounded_profit(&mut self, amount: u64) -> Result<()> {
        self.total_deployed = self
            .total_deployed
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault(total_idle: u64, total_deployed: u64, total_shares: u64) -> Vault {
        Vault {
            total_idle,
            total_deployed,
            total_shares,
            ..Default::default()
        }
    }

    #[test]
    fn bootstrap_deposit_mints_one_to_one() {
        let v = vault(0, 0, 0);
        assert_eq!(v.convert_to_shares(1000).unwrap(), 1000);
        assert_eq!(v.price_per_full_share().unwrap(), SHARE_PRICE_SCALE);
    }

    #[test]
    fn bootstrap_price_after_first_deposit() {
        let mut v = vault(0, 0, 0);
        let shares = v.convert_to_shares(1000).unwrap();
        v.handle_deposit(1000, shares).unwrap();
        assert_eq!(v.total_shares, 1000);
        assert_eq!(v.price_per_full_share().unwrap(), SHARE_PRICE_SCALE);
    }

    #[test]
    fn proportional_shares_after_profit() {
        // 1500 assets backing 1000 shares: depositor of 300 gets 200 shares.
        let v = vault(500, 1000, 1000);
        assert_eq!(v.convert_to_shares(300).unwrap(), 200);
    }

    #[test]
    fn conversion_rounds_down() {
        let v = vault(1000, 0, 333);
        assert_eq!(v.convert_to_shares(100).unwrap(), 33);
    }

    #[test]
    fn price_rises_with_harvest_profit() {
        let mut v = vault(0, 1000, 1000);
        let before = v.price_per_full_share().unwrap();
        v.handle_compounded_profit(50).unwrap();
        let after = v.price_per_full_share().unwrap();
        assert!(after > before);
        assert_eq!(v.total_shares, 1000);
    }

    #[test]
    fn realized_profit_lands_in_idle() {
        let mut v = vault(10, 1000, 1000);
        v.handle_realized_profit(40).unwrap();
        assert_eq!(v.total_idle, 50);
        assert_eq!(v.total_assets().unwrap(), 1050);
    }

    #[test]
    fn large_values_use_wide_intermediates() {
        let v = vault(u64::MAX / 2, 0, u64::MAX / 2);
        assert_eq!(v.convert_to_shares(1_000_000).unwrap(), 1_000_000);
    }

    #[test]
    fn allocation_conserves_total_assets() {
        let mut v = vault(1000, 0, 1000);
        v.handle_allocation(600).unwrap();
        assert_eq!(v.total_idle, 400);
        assert_eq!(v.total_deployed, 600);
        assert_eq!(v.total_assets().unwrap(), 1000);
    }

    #[test]
    fn max_deposit_honors_limit() {
        let mut v = vault(400, 100, 500);
        v.deposit_limit = 600;
        assert_eq!(v.max_deposit().unwrap(), 100);
        v.deposit_limit = 0;
        assert_eq!(v.max_deposit().unwrap(), u64::MAX);
    }
}
