use anchor_lang::prelude::*;

use crate::constants::STRATEGY_SEED;
use crate::errors::ErrorCode;
use crate::state::strategy::{
    HarvestAccounts, HarvestOutcome, RouteAccounts, Strategy, StrategyAccount, StrategyInit,
    StrategyInitParams, StrategyType,
};
use crate::state::SwapPath;
use crate::utils::{farm, swap, token};

/// Strategy wrapping one external farm pool: want is staked into the pool,
/// reward tokens are claimed, converted to want through the configured swap
/// path, then compounded back into the pool or realized to the vault.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct FarmStrategy {
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

    pub farm_program: Pubkey,
    pub farm_pool: Pubkey,
    pub pool_id: u64,

    pub swap_router: Pubkey,
    /// Reinvest harvested want into the farm when set; otherwise realize it
    /// to the vault as profit.
    pub compound_rewards: bool,

    /// Want held in the strategy token account.
    pub idle_want: u64,
    /// Want staked in the farm pool.
    pub deployed_want: u64,
    /// Pending reward as cached at the last harvest touch.
    pub claimable_reward: u64,

    /// Zero means unlimited.
    pub deposit_limit: u64,

    pub is_retired: bool,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct FarmStrategyConfig {
    pub farm_program: Pubkey,
    pub farm_pool: Pubkey,
    pub pool_id: u64,
    pub swap_router: Pubkey,
    pub compound_rewards: bool,
    pub deposit_limit: u64,
}

impl FarmStrategy {
    /// Want arriving in the strategy token account from the vault.
    pub fn note_inflow(&mut self, amount: u64) -> Result<()> {
        self.idle_want = self
            .idle_want
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    /// Idle want moving into the farm position.
    pub fn apply_farm_deposit(&mut self, amount: u64) -> Result<()> {
        self.idle_want = self
            .idle_want
            .checked_sub(amount)
            .ok_or_else(|| error!(ErrorCode::InsufficientLiquidity))?;
        self.deployed_want = self
            .deployed_want
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    /// Want received back from the farm. The farm may pay out more than the
    /// recorded position after its own rounding; the book never goes
    /// negative.
    pub fn apply_farm_withdrawal(&mut self, received: u64) -> Result<()> {
        self.deployed_want = self.deployed_want.saturating_sub(received);
        self.idle_want = self
            .idle_want
            .checked_add(received)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    /// Want leaving the strategy token account toward the vault.
    pub fn apply_outflow(&mut self, amount: u64) -> Result<()> {
        self.idle_want = self
            .idle_want
            .checked_sub(amount)
            .ok_or_else(|| error!(ErrorCode::InsufficientLiquidity))?;
        Ok(())
    }

    /// External calls only ever go to the farm fixed at initialization.
    fn check_farm_binding(&self, farm_program: &AccountInfo, farm_pool: &AccountInfo) -> Result<()> {
        require!(
            farm_program.key() == self.farm_program && farm_pool.key() == self.farm_pool,
            ErrorCode::InvalidAccountPairs
        );
        Ok(())
    }
}

impl StrategyAccount for FarmStrategy {
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

impl StrategyInit for FarmStrategy {
    fn init(&mut self, params: &StrategyInitParams, config_bytes: Vec<u8>) -> Result<()> {
        let config = FarmStrategyConfig::try_from_slice(&config_bytes)
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

        self.farm_program = config.farm_program;
        self.farm_pool = config.farm_pool;
        self.pool_id = config.pool_id;
        self.swap_router = config.swap_router;
        self.compound_rewards = config.compound_rewards;
        self.deposit_limit = config.deposit_limit;

        self.idle_want = 0;
        self.deployed_want = 0;
        self.claimable_reward = 0;
        self.is_retired = false;

        Ok(())
    }
}

impl Strategy for FarmStrategy {
    fn strategy_type(&self) -> StrategyType {
        StrategyType::Farm
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
        self.idle_want.saturating_add(self.deployed_want)
    }

    fn balance_of_pool(&self) -> u64 {
        self.deployed_want
    }

    fn claimable(&self) -> u64 {
        self.claimable_reward
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
        self.deposit_limit.saturating_sub(self.balance_of())
    }

    fn available_withdraw(&self) -> u64 {
        self.balance_of()
    }

    fn set_swap_router(&mut self, router: Pubkey) -> Result<()> {
        self.swap_router = router;
        Ok(())
    }

    fn set_harvest_policy(&mut self, compound: bool) -> Result<()> {
        self.compound_rewards = compound;
        Ok(())
    }

    fn mark_retired(&mut self) {
        self.is_retired = true;
    }

    fn deploy<'info>(
        &mut self,
        accounts: &RouteAccounts<'_, 'info>,
        token_program: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<()> {
        require!(!self.is_retired, ErrorCode::StrategyRetired);
        self.check_farm_binding(accounts.farm_program, accounts.farm_pool)?;

        self.note_inflow(amount)?;

        let to_deploy = self.idle_want;
        if to_deploy == 0 {
            return Ok(());
        }

        // debit the book before the external call
        self.apply_farm_deposit(to_deploy)?;

        farm::deposit_to(
            accounts.farm_program,
            accounts.farm_pool,
            accounts.farm_pool_token_account,
            accounts.strategy_token_account,
            accounts.strategy,
            token_program,
            &self.seeds(),
            self.pool_id,
            to_deploy,
        )?;

        Ok(())
    }

    fn free<'info>(
        &mut self,
        accounts: &RouteAccounts<'_, 'info>,
        vault_token_account: &AccountInfo<'info>,
        token_program: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<u64> {
        if amount == 0 {
            return Ok(0);
        }
        self.check_farm_binding(accounts.farm_program, accounts.farm_pool)?;

        let from_idle = std::cmp::min(amount, self.idle_want);
        let needed_from_farm = std::cmp::min(amount - from_idle, self.deployed_want);

        let mut freed = from_idle;
        if needed_from_farm > 0 {
            let pre = token::balance(accounts.strategy_token_account)?;
            farm::withdraw_from(
                accounts.farm_program,
                accounts.farm_pool,
                accounts.farm_pool_token_account,
                accounts.strategy_token_account,
                accounts.strategy,
                token_program,
                &self.seeds(),
                self.pool_id,
                needed_from_farm,
            )?;
            let post = token::balance(accounts.strategy_token_account)?;
            let received = post
                .checked_sub(pre)
                .ok_or_else(|| error!(ErrorCode::MathOverflow))?;

            self.apply_farm_withdrawal(received)?;

            // a farm paying out extra leaves the excess as idle want
            freed = freed
                .checked_add(std::cmp::min(received, needed_from_farm))
                .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        }

        if freed == 0 {
            return Ok(0);
        }

        self.apply_outflow(freed)?;

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
        accounts: &HarvestAccounts<'_, 'info>,
        remaining: &[AccountInfo<'info>],
        min_want_out: u64,
    ) -> Result<HarvestOutcome> {
        require!(!self.is_retired, ErrorCode::StrategyRetired);
        self.check_farm_binding(accounts.farm_program, accounts.farm_pool)?;
        require!(
            accounts.swap_router.key() == self.swap_router,
            ErrorCode::InvalidAccountPairs
        );

        // the conversion path must be configured before anything moves
        let path = SwapPath::load_required(
            accounts.swap_path,
            self.key,
            self.reward_mint,
            self.underlying_mint,
        )?;
        let hops = swap::resolve_hops(&path.hops, remaining)?;

        let pre_reward = token::balance(accounts.strategy_reward_account)?;
        farm::claim(
            accounts.farm_program,
            accounts.farm_pool,
            accounts.farm_pool_reward_account,
            accounts.strategy_reward_account,
            accounts.strategy,
            accounts.token_program,
            &self.seeds(),
            self.pool_id,
        )?;
        let reward_balance = token::balance(accounts.strategy_reward_account)?;
        let claimed = reward_balance
            .checked_sub(pre_reward)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        self.claimable_reward = 0;

        // swap everything held, including dust from earlier harvests
        if reward_balance == 0 {
            return Ok(HarvestOutcome::default());
        }

        let pre_want = token::balance(accounts.strategy_token_account)?;
        swap::swap(
            accounts.swap_router,
            accounts.strategy,
            accounts.strategy_reward_account,
            accounts.strategy_token_account,
            &hops,
            accounts.token_program,
            &self.seeds(),
            reward_balance,
            min_want_out,
        )?;
        let want_gained = token::balance(accounts.strategy_token_account)?
            .checked_sub(pre_want)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        require!(want_gained >= min_want_out, ErrorCode::SlippageExceeded);

        if want_gained == 0 {
            return Ok(HarvestOutcome {
                claimed_reward: claimed,
                want_gained: 0,
                compounded: false,
            });
        }

        self.note_inflow(want_gained)?;

        if self.compound_rewards {
            let to_deploy = self.idle_want;
            self.apply_farm_deposit(to_deploy)?;
            farm::deposit_to(
                accounts.farm_program,
                accounts.farm_pool,
                accounts.farm_pool_token_account,
                accounts.strategy_token_account,
                accounts.strategy,
                accounts.token_program,
                &self.seeds(),
                self.pool_id,
                to_deploy,
            )?;

            Ok(HarvestOutcome {
                claimed_reward: claimed,
                want_gained,
                compounded: true,
            })
        } else {
            self.apply_outflow(want_gained)?;
            token::transfer_with_signer(
                accounts.token_program.clone(),
                accounts.strategy_token_account.clone(),
                accounts.vault_token_account.clone(),
                accounts.strategy.clone(),
                want_gained,
                &self.seeds(),
            )?;

            Ok(HarvestOutcome {
                claimed_reward: claimed,
                want_gained,
                compounded: false,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(idle: u64, deployed: u64) -> FarmStrategy {
        FarmStrategy {
            idle_want: idle,
            deployed_want: deployed,
            ..Default::default()
        }
    }

    #[test]
    fn balance_views() {
        let s = strategy(100, 400);
        assert_eq!(s.balance_of(), 500);
        assert_eq!(s.balance_of_pool(), 400);
        assert_eq!(s.available_withdraw(), 500);
    }

    #[test]
    fn deploy_accounting_moves_idle_into_farm() {
        let mut s = strategy(0, 0);
        s.note_inflow(300).unwrap();
        s.apply_farm_deposit(300).unwrap();
        assert_eq!(s.idle_want, 0);
        assert_eq!(s.deployed_want, 300);
        assert_eq!(s.balance_of(), 300);
    }

    #[test]
    fn farm_withdrawal_tolerates_overpayment() {
        let mut s = strategy(0, 100);
        // farm pays out 105 for a 100 position after its own rounding
        s.apply_farm_withdrawal(105).unwrap();
        assert_eq!(s.deployed_want, 0);
        assert_eq!(s.idle_want, 105);
    }

    #[test]
    fn outflow_cannot_exceed_idle() {
        let mut s = strategy(50, 0);
        assert!(s.apply_outflow(60).is_err());
        assert_eq!(s.idle_want, 50);
        s.apply_outflow(50).unwrap();
        assert_eq!(s.idle_want, 0);
    }

    #[test]
    fn retired_strategy_accepts_no_deposits() {
        let mut s = strategy(0, 0);
        s.mark_retired();
        assert_eq!(s.available_deposit(), 0);
    }

    #[test]
    fn deposit_limit_bounds_available_deposit() {
        let mut s = strategy(100, 200);
        s.deposit_limit = 500;
        assert_eq!(s.available_deposit(), 200);
        s.deposit_limit = 0;
        assert_eq!(s.available_deposit(), u64::MAX);
    }
}
