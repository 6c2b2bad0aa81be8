use anchor_lang::prelude::*;

use crate::constants::{CONTROLLER_SEED, MAX_BPS, MAX_STRATEGIES};
use crate::errors::ErrorCode;
use crate::utils::math;

#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Controller {
    pub bump: [u8; 1],
    pub index_bytes: [u8; 8],

    pub key: Pubkey,
    /// Bound once at initialization.
    pub vault: Pubkey,

    pub withdrawal_fee_bps: u64,

    /// Number of slots considered by deposit and withdrawal routing.
    pub strategy_length: u8,
    pub slots: [StrategySlot; MAX_STRATEGIES],

    #[max_len(32)]
    pub name: String,
}

#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Default, Debug, PartialEq, Eq,
)]
pub struct StrategySlot {
    pub strategy: Pubkey,
    /// Hard ceiling on capital this strategy may hold, independent of its
    /// percentage allocation. `u64::MAX` means unbounded.
    pub cap_max: u64,
    pub allocation_bps: u64,
}

impl StrategySlot {
    pub fn is_configured(&self) -> bool {
        self.strategy != Pubkey::default()
    }
}

/// One planned transfer out of vault idle, produced by `plan_earn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EarnAllocation {
    pub index: usize,
    pub strategy: Pubkey,
    pub target: u64,
    pub amount: u64,
}

impl Controller {
    pub fn seeds(&self) -> [&[u8]; 4] {
        [
            CONTROLLER_SEED.as_bytes(),
            self.vault.as_ref(),
            self.index_bytes.as_ref(),
            self.bump.as_ref(),
        ]
    }

    pub fn init(
        &mut self,
        bump: u8,
        index: u64,
        key: Pubkey,
        vault: Pubkey,
        name: String,
    ) -> Result<()> {
        self.bump = [bump];
        self.index_bytes = index.to_le_bytes();
        self.key = key;
        self.vault = vault;
        self.name = name;

        self.withdrawal_fee_bps = 0;
        self.strategy_length = 0;
        self.slots = [StrategySlot::default(); MAX_STRATEGIES];

        Ok(())
    }

    /// Sum of allocation bps over configured slots with `index` replaced by
    /// `bps`, used to validate a slot assignment before mutating anything.
    fn allocation_total_with(&self, index: usize, bps: u64) -> u64 {
        let mut total = bps;
        for (i, slot) in self.slots.iter().enumerate() {
            if i != index && slot.is_configured() {
                total = total.saturating_add(slot.allocation_bps);
            }
        }
        total
    }

    pub fn set_slot(&mut self, index: usize, slot: StrategySlot) -> Result<()> {
        require!(index < MAX_STRATEGIES, ErrorCode::SlotOutOfRange);
        require!(slot.allocation_bps <= MAX_BPS, ErrorCode::AllocationOverflow);
        require!(
            self.allocation_total_with(index, slot.allocation_bps) <= MAX_BPS,
            ErrorCode::AllocationOverflow
        );

        self.slots[index] = slot;
        Ok(())
    }

    pub fn clear_slot(&mut self, index: usize) -> Result<()> {
        require!(index < MAX_STRATEGIES, ErrorCode::SlotOutOfRange);
        self.slots[index] = StrategySlot::default();
        Ok(())
    }

    /// Routing consults a fixed slot count; every routed slot must be
    /// configured, an inconsistent table is a configuration error.
    pub fn set_strategy_length(&mut self, length: u8) -> Result<()> {
        require!(length as usize <= MAX_STRATEGIES, ErrorCode::SlotOutOfRange);
        for slot in &self.slots[..length as usize] {
            require!(slot.is_configured(), ErrorCode::SlotNotConfigured);
        }
        self.strategy_length = length;
        Ok(())
    }

    pub fn set_single_strategy(&mut self, strategy: Pubkey) -> Result<()> {
        self.slots = [StrategySlot::default(); MAX_STRATEGIES];
        self.slots[0] = StrategySlot {
            strategy,
            cap_max: u64::MAX,
            allocation_bps: MAX_BPS,
        };
        self.strategy_length = 1;
        Ok(())
    }

    pub fn set_withdrawal_fee(&mut self, bps: u64) -> Result<()> {
        require!(bps <= MAX_BPS, ErrorCode::InvalidFee);
        self.withdrawal_fee_bps = bps;
        Ok(())
    }

    pub fn withdrawal_fee(&self, amount: u64) -> Result<u64> {
        math::bps_of(amount, self.withdrawal_fee_bps)
    }

    pub fn active_slots(&self) -> &[StrategySlot] {
        &self.slots[..self.strategy_length as usize]
    }

    pub fn slot_index_of(&self, strategy: Pubkey) -> Option<usize> {
        self.active_slots()
            .iter()
            .position(|s| s.strategy == strategy)
    }

    /// Capital a slot should hold given the pool under management: its
    /// percentage share, ceiled by its hard cap.
    pub fn earn_target(&self, slot: &StrategySlot, controller_assets: u64) -> Result<u64> {
        let by_allocation = math::bps_of(controller_assets, slot.allocation_bps)?;
        Ok(std::cmp::min(slot.cap_max, by_allocation))
    }

    /// Plans deposit routing over the active slots in index order. Each
    /// strategy is topped up toward its target, bounded by the idle capital
    /// still unspent; strategies already at or above target receive nothing.
    /// `balances[i]` / `eligible[i]` describe the strategy in slot `i`.
    pub fn plan_earn(
        &self,
        controller_assets: u64,
        vault_idle: u64,
        balances: &[u64],
        eligible: &[bool],
    ) -> Result<Vec<EarnAllocation>> {
        require!(
            balances.len() == self.strategy_length as usize
                && eligible.len() == self.strategy_length as usize,
            ErrorCode::InvalidAccountPairs
        );

        let mut idle_remaining = vault_idle;
        let mut plan = Vec::new();

        for (i, slot) in self.active_slots().iter().enumerate() {
            if !slot.is_configured() || !eligible[i] {
                continue;
            }

            let target = self.earn_target(slot, controller_assets)?;
            if balances[i] >= target || idle_remaining == 0 {
                continue;
            }

            let amount = std::cmp::min(target - balances[i], idle_remaining);
            idle_remaining -= amount;

            plan.push(EarnAllocation {
                index: i,
                strategy: slot.strategy,
                target,
                amount,
            });
        }

        Ok(plan)
    }

    /// Plans withdrawal routing: pull from strategies in index order until
    /// `needed` is satisfied or every strategy is exhausted. Returns the
    /// per-slot pull amounts; a shortfall is left for the vault's slippage
    /// bound to judge, not an error here.
    pub fn plan_withdrawals(&self, needed: u64, available: &[u64]) -> Result<Vec<u64>> {
        require!(
            available.len() == self.strategy_length as usize,
            ErrorCode::InvalidAccountPairs
        );

        let mut remaining = needed;
        let mut pulls = vec![0u64; available.len()];

        for (i, balance) in available.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            let pull = std::cmp::min(remaining, *balance);
            pulls[i] = pull;
            remaining -= pull;
        }

        Ok(pulls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> Controller {
        Controller::default()
    }

    fn slot(strategy: Pubkey, cap_max: u64, allocation_bps: u64) -> StrategySlot {
        StrategySlot {
            strategy,
            cap_max,
            allocation_bps,
        }
    }

    #[test]
    fn allocation_sum_is_bounded() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        c.set_slot(0, slot(a, u64::MAX, 6000)).unwrap();
        c.set_slot(1, slot(b, u64::MAX, 4000)).unwrap();

        // Raising slot 1 to 4001 would sum to 10001.
        assert!(c.set_slot(1, slot(b, u64::MAX, 4001)).is_err());
        // The failed call must not have mutated the slot.
        assert_eq!(c.slots[1].allocation_bps, 4000);
    }

    #[test]
    fn replacing_a_slot_does_not_double_count() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        c.set_slot(0, slot(a, u64::MAX, 10_000)).unwrap();
        // Same slot can be reassigned at full allocation.
        c.set_slot(0, slot(a, 500, 10_000)).unwrap();
        assert_eq!(c.slots[0].cap_max, 500);
    }

    #[test]
    fn strategy_length_requires_configured_slots() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        c.set_slot(0, slot(a, u64::MAX, 5000)).unwrap();

        assert!(c.set_strategy_length(1).is_ok());
        assert!(c.set_strategy_length(2).is_err());
        assert_eq!(c.strategy_length, 1);
    }

    #[test]
    fn earn_respects_cap_over_allocation() {
        // Slot 0 capped at 500 with 50%, slot 1 unbounded with 50%,
        // 1000 idle: 500/500.
        let mut c = controller();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        c.set_slot(0, slot(a, 500, 5000)).unwrap();
        c.set_slot(1, slot(b, u64::MAX, 5000)).unwrap();
        c.set_strategy_length(2).unwrap();

        let plan = c
            .plan_earn(1000, 1000, &[0, 0], &[true, true])
            .unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].amount, 500);
        assert_eq!(plan[1].amount, 500);
    }

    #[test]
    fn earn_cap_binds_below_percentage_share() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        c.set_slot(0, slot(a, 300, 10_000)).unwrap();
        c.set_strategy_length(1).unwrap();

        let plan = c.plan_earn(1000, 1000, &[0], &[true]).unwrap();
        assert_eq!(plan[0].target, 300);
        assert_eq!(plan[0].amount, 300);
    }

    #[test]
    fn earn_tops_up_only_the_shortfall() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        c.set_slot(0, slot(a, u64::MAX, 10_000)).unwrap();
        c.set_strategy_length(1).unwrap();

        let plan = c.plan_earn(1000, 600, &[400], &[true]).unwrap();
        assert_eq!(plan[0].amount, 600);

        // Already at target: nothing moves.
        let plan = c.plan_earn(1000, 0, &[1000], &[true]).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn earn_skips_ineligible_strategies() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        c.set_slot(0, slot(a, u64::MAX, 5000)).unwrap();
        c.set_slot(1, slot(b, u64::MAX, 5000)).unwrap();
        c.set_strategy_length(2).unwrap();

        let plan = c
            .plan_earn(1000, 1000, &[0, 0], &[false, true])
            .unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].strategy, b);
    }

    #[test]
    fn withdrawals_pull_in_slot_order() {
        let mut c = controller();
        c.set_slot(0, slot(Pubkey::new_unique(), u64::MAX, 5000))
            .unwrap();
        c.set_slot(1, slot(Pubkey::new_unique(), u64::MAX, 5000))
            .unwrap();
        c.set_strategy_length(2).unwrap();

        let pulls = c.plan_withdrawals(700, &[500, 500]).unwrap();
        assert_eq!(pulls, vec![500, 200]);
    }

    #[test]
    fn withdrawals_tolerate_exhaustion() {
        let mut c = controller();
        c.set_slot(0, slot(Pubkey::new_unique(), u64::MAX, 10_000))
            .unwrap();
        c.set_strategy_length(1).unwrap();

        // Less liquidity than requested: partial plan, not an error.
        let pulls = c.plan_withdrawals(700, &[300]).unwrap();
        assert_eq!(pulls, vec![300]);
    }

    #[test]
    fn withdrawal_fee_math() {
        let mut c = controller();
        c.set_withdrawal_fee(100).unwrap();
        assert_eq!(c.withdrawal_fee(1000).unwrap(), 10);

        assert!(c.set_withdrawal_fee(10_001).is_err());
    }

    #[test]
    fn single_strategy_shortcut() {
        let mut c = controller();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        c.set_slot(1, slot(b, u64::MAX, 1000)).unwrap();

        c.set_single_strategy(a).unwrap();
        assert_eq!(c.strategy_length, 1);
        assert_eq!(c.slots[0].strategy, a);
        assert_eq!(c.slots[0].allocation_bps, MAX_BPS);
        assert!(!c.slots[1].is_configured());
    }
}
