use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

/// Controller-side registry entry for one approved strategy. Existence of
/// this account is the approval; `status` drives the slot state machine.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct StrategyData {
    pub controller: Pubkey,
    pub strategy: Pubkey,
    pub status: StrategyStatus,
    /// Capital the controller has routed into the strategy and not yet
    /// pulled back, including compounded harvest gains.
    pub current_debt: u64,
    pub last_report: i64,
}

#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq, Default,
)]
pub enum StrategyStatus {
    #[default]
    Approved,
    Active,
    Retired,
}

impl StrategyData {
    pub fn init(&mut self, controller: Pubkey, strategy: Pubkey) -> Result<()> {
        self.controller = controller;
        self.strategy = strategy;
        self.status = StrategyStatus::Approved;
        self.current_debt = 0;
        self.last_report = 0;
        Ok(())
    }

    /// Re-approval of a retired strategy resets it to `Approved`; approving
    /// an already approved or active strategy is a no-op.
    pub fn reapprove(&mut self) -> Result<()> {
        if self.status == StrategyStatus::Retired {
            require!(self.current_debt == 0, ErrorCode::StrategyHasDebt);
            self.status = StrategyStatus::Approved;
        }
        Ok(())
    }

    pub fn can_allocate(&self) -> bool {
        self.status != StrategyStatus::Retired
    }

    pub fn activate(&mut self) {
        if self.status == StrategyStatus::Approved {
            self.status = StrategyStatus::Active;
        }
    }

    pub fn retire(&mut self) {
        self.status = StrategyStatus::Retired;
    }

    pub fn add_debt(&mut self, amount: u64) -> Result<()> {
        self.current_debt = self
            .current_debt
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
        Ok(())
    }

    /// Debt write-off clamps at zero: a farm can hand back slightly more
    /// than the recorded debt after rounding in its own accounting.
    pub fn reduce_debt(&mut self, amount: u64) {
        self.current_debt = self.current_debt.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_lifecycle() {
        let mut data = StrategyData::default();
        data.init(Pubkey::new_unique(), Pubkey::new_unique()).unwrap();
        assert_eq!(data.status, StrategyStatus::Approved);
        assert!(data.can_allocate());

        data.activate();
        assert_eq!(data.status, StrategyStatus::Active);

        data.retire();
        assert!(!data.can_allocate());

        // Activation does not resurrect a retired strategy.
        data.activate();
        assert_eq!(data.status, StrategyStatus::Retired);

        data.reapprove().unwrap();
        assert_eq!(data.status, StrategyStatus::Approved);
    }

    #[test]
    fn reapproval_requires_zero_debt() {
        let mut data = StrategyData::default();
        data.init(Pubkey::new_unique(), Pubkey::new_unique()).unwrap();
        data.add_debt(100).unwrap();
        data.retire();
        assert!(data.reapprove().is_err());

        data.reduce_debt(100);
        assert!(data.reapprove().is_ok());
    }

    #[test]
    fn debt_reduction_clamps_at_zero() {
        let mut data = StrategyData::default();
        data.add_debt(50).unwrap();
        data.reduce_debt(80);
        assert_eq!(data.current_debt, 0);
    }
}
