use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::constants::DISCRIMINATOR_LEN;
use crate::state::{FarmStrategy, SimpleStrategy};

/// Fixed identity handed to every strategy at initialization; family
/// specific settings travel separately as Borsh config bytes.
pub struct StrategyInitParams {
    pub bump: u8,
    pub index: u64,
    pub key: Pubkey,
    pub controller: Pubkey,
    pub vault: Pubkey,
    pub underlying_mint: Pubkey,
    pub underlying_decimals: u8,
    pub underlying_token_acc: Pubkey,
    pub reward_mint: Pubkey,
    pub reward_token_acc: Pubkey,
}

/// Accounts a strategy needs to move capital between its token account and
/// its external farm position.
pub struct RouteAccounts<'a, 'info> {
    pub strategy: &'a AccountInfo<'info>,
    pub strategy_token_account: &'a AccountInfo<'info>,
    pub farm_program: &'a AccountInfo<'info>,
    pub farm_pool: &'a AccountInfo<'info>,
    pub farm_pool_token_account: &'a AccountInfo<'info>,
}

/// Accounts a strategy needs to claim rewards and convert them to want.
pub struct HarvestAccounts<'a, 'info> {
    pub strategy: &'a AccountInfo<'info>,
    pub strategy_token_account: &'a AccountInfo<'info>,
    pub strategy_reward_account: &'a AccountInfo<'info>,
    pub swap_path: &'a AccountInfo<'info>,
    pub swap_router: &'a AccountInfo<'info>,
    pub farm_program: &'a AccountInfo<'info>,
    pub farm_pool: &'a AccountInfo<'info>,
    pub farm_pool_reward_account: &'a AccountInfo<'info>,
    pub farm_pool_token_account: &'a AccountInfo<'info>,
    pub vault_token_account: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub claimed_reward: u64,
    pub want_gained: u64,
    pub compounded: bool,
}

pub trait StrategyAccount {
    fn save_changes(&self, writer: &mut dyn std::io::Write) -> Result<()>;
    fn seeds(&self) -> [&[u8]; 4];
    fn key(&self) -> Pubkey;
}

pub trait StrategyInit {
    fn init(&mut self, params: &StrategyInitParams, config_bytes: Vec<u8>) -> Result<()>;
}

pub trait Strategy: StrategyAccount + StrategyInit {
    // views
    fn strategy_type(&self) -> StrategyType;
    fn controller(&self) -> Pubkey;
    fn vault(&self) -> Pubkey;
    fn underlying_mint(&self) -> Pubkey;
    fn token_account(&self) -> Pubkey;
    fn reward_token_account(&self) -> Pubkey;
    /// Idle plus deployed want.
    fn balance_of(&self) -> u64;
    /// Want deployed in the farm only.
    fn balance_of_pool(&self) -> u64;
    /// Pending reward in reward-token units, as cached at the last touch.
    fn claimable(&self) -> u64;
    fn is_retired(&self) -> bool;
    fn available_deposit(&self) -> u64;
    fn available_withdraw(&self) -> u64;

    // configuration
    fn set_swap_router(&mut self, router: Pubkey) -> Result<()>;
    fn set_harvest_policy(&mut self, compound: bool) -> Result<()>;
    fn mark_retired(&mut self);

    // capital movement; the strategy PDA signs all external calls
    fn deploy<'info>(
        &mut self,
        accounts: &RouteAccounts<'_, 'info>,
        token_program: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()>;

    /// Frees up to `amount` of want back to the vault token account,
    /// returning what was actually moved. A shortfall is expected when the
    /// farm itself limits withdrawal, not exceptional.
    fn free<'info>(
        &mut self,
        accounts: &RouteAccounts<'_, 'info>,
        vault_token_account: &AccountInfo<'info>,
        token_program: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<u64>;

    fn harvest<'info>(
        &mut self,
        accounts: &HarvestAccounts<'_, 'info>,
        remaining: &[AccountInfo<'info>],
        min_want_out: u64,
    ) -> Result<HarvestOutcome>;

    /// Empties the farm position and idle balance back to the vault.
    fn release_all<'info>(
        &mut self,
        accounts: &RouteAccounts<'_, 'info>,
        vault_token_account: &AccountInfo<'info>,
        token_program: &AccountInfo<'info>,
    ) -> Result<u64> {
        let total = self.balance_of();
        if total == 0 {
            return Ok(0);
        }
        self.free(accounts, vault_token_account, token_program, total)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyType {
    Simple,
    Farm,
}

impl StrategyType {
    pub fn from_discriminator(discriminator: &[u8]) -> Option<Self> {
        if discriminator == SimpleStrategy::DISCRIMINATOR.as_ref() {
            Some(StrategyType::Simple)
        } else if discriminator == FarmStrategy::DISCRIMINATOR.as_ref() {
            Some(StrategyType::Farm)
        } else {
            None
        }
    }

    pub fn space(&self) -> usize {
        match self {
            StrategyType::Simple => DISCRIMINATOR_LEN + SimpleStrategy::INIT_SPACE,
            StrategyType::Farm => DISCRIMINATOR_LEN + FarmStrategy::INIT_SPACE,
        }
    }
}
