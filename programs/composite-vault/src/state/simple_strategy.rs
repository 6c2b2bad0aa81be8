use anchor_lang::prelude::*;

use crate::constants::STRATEGY_SEED;
use crate::errors::ErrorCode;
use crate::state::strategy::{
    HarvestAccounts, HarvestOutcome, RouteAccounts, Strategy, StrategyAccount, StrategyInit,
    StrategyInitParams, StrategyType,
};
use crate::utils::token;

/// Buffer strategy with no external position: want sits idle in the
/// strategy token account. Yields nothing; harvest is a no-op.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct SimpleStrategy {
    pub bump: [u8; 1],
    pub index_bytes: [u8; 8],

    pub key: Pubkey,
    pub controller: Pubkey,
    pub vault: Pubkey,

    pub underlying_mint: Pubkey,
    pub underlying_token_acc: Pubkey,
    pub underlying_decimals: u8,

    pub reward_mint: Pubkey,
    pub reward_token_acc: Pubkey,

    pub idle_want: u64,

    /// Zero means unlimited.
    pub deposit_limit: u64,

    pub is_retired: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Default, Clone, Debug)]
pub struct SimpleStrategyConfig {
    pub deposit_limit: u64,
}

impl StrategyAccount for SimpleStrategy {
    fn save_changes(&self, writer: &mut dyn std::io::Write) -> Result<()> {
        self.try_to_vec()
            .map_err(|_| error!(ErrorCode::SerializationError))
            .and_then(|vec| {
                writer
                    .write_all(&vec)
                    .map_err(|_| error!(ErrorCode::SerializationError))
            })
    }

    fn seeds(&self) -> [&[u8]; 4] {
        [
            STRATEGY_SEED.as_bytes(),
            self.controller.as_ref(),
            self.index_bytes.as_ref(),
            self.bump.as_ref(),
        ]
    }

    fn key(&self) -> Pubkey {
        self.key
    }
}

impl StrategyInit for SimpleStrategy {
    fn init(&mut self, params: &StrategyInitParams, config_bytes: Vec<u8>) -> Result<()> {
        let config = SimpleStrategyConfig::try_from_slice(&config_bytes)
            .map_err(|_| error!(ErrorCode::InvalidStrategyConfig))?;

        self.bump = [params.bump];
        self.index_bytes = params.index.to_le_bytes();
        self.key = params.key;
        self.controller = params.controller;
        self.vault = params.vault;

        self.underlying_mint = params.underlying_mint;
        self.underlying_decimals = params.underlying_decimals;
        self.underlying_token_acc = params.underlying_token_acc;
        self.reward_mint = params.reward_mint;
        self.reward_token_acc = params.reward_token_acc;

        self.idle_want = 0;
        self.deposit_limit = config.deposit_limit;
        self.is_retired = false;

        Ok(())
    }
}

impl Strategy for SimpleStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Simple
    }

    fn controller(&self) -> Pubkey {
        self.controller
    }

    fn vault(&self) -> Pubkey {
        self.vault
    }

    fn underlying_mint(&self) -> Pubkey {
        self.underlying_mint
    }

    fn token_account(&self) -> Pubkey {
        self.underlying_token_acc
    }

    fn reward_token_account(&self) -> Pubkey {
        self.reward_token_acc
    }

    fn balance_of(&self) -> u64 {
        self.idle_want
    }

    fn balance_of_pool(&self) -> u64 {
        0
    }

    fn claimable(&self) -> u64 {
        0
    }

    fn is_retired(&self) -> bool {
        self.is_retired
    }

    fn available_deposit(&self) -> u64 {
        if self.is_retired {
            return 0;
        }
        if self.deposit_limit == 0 {
            return u64::MAX;
        }
        self.deposit_limit.saturating_sub(self.idle_want)
    }

    fn available_withdraw(&self) -> u64 {
        self.idle_want
    }

    fn set_swap_router(&mut self, _router: Pubkey) -> Result<()> {
        Err(ErrorCode::InvalidStrategyConfig.into())
    }

    fn set_harvest_policy(&mut self, _compound: bool) -> Result<()> {
        Err(ErrorCode::InvalidStrategyConfig.into())
    }

    fn mark_retired(&mut self) {
        self.is_retired = true;
    }

    fn deploy<'info>(
        &mut self,
        _accounts: &RouteAccounts<'_, 'info>,
        _token_program: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        require!(!self.is_retired, ErrorCode::StrategyRetired);
        self.idle_want = self
            .idle_want
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    fn free<'info>(
        &mut self,
        accounts: &RouteAccounts<'_, 'info>,
        vault_token_account: &AccountInfo<'info>,
        token_program: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<u64> {
        let freed = std::cmp::min(amount, self.idle_want);
        if freed == 0 {
            return Ok(0);
        }

        self.idle_want -= freed;

        token::transfer_with_signer(
            token_program.clone(),
            accounts.strategy_token_account.clone(),
            vault_token_account.clone(),
            accounts.strategy.clone(),
            freed,
            &self.seeds(),
        )?;

        Ok(freed)
    }

    fn harvest<'info>(
        &mut self,
        _accounts: &HarvestAccounts<'_, 'info>,
        _remaining: &[AccountInfo<'info>],
        _min_want_out: u64,
    ) -> Result<HarvestOutcome> {
        require!(!self.is_retired, ErrorCode::StrategyRetired);
        Ok(HarvestOutcome::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_only_views() {
        let s = SimpleStrategy {
            idle_want: 250,
            ..Default::default()
        };
        assert_eq!(s.balance_of(), 250);
        assert_eq!(s.balance_of_pool(), 0);
        assert_eq!(s.claimable(), 0);
        assert_eq!(s.available_withdraw(), 250);
    }
}
