use anchor_lang::prelude::*;

#[event]
pub struct VaultInitEvent {
    pub vault_key: Pubkey,
    pub underlying_mint: Pubkey,
    pub underlying_token_acc: Pubkey,
    pub underlying_decimals: u8,
    pub deposit_limit: u64,
}

#[event]
pub struct VaultDepositEvent {
    pub vault_key: Pubkey,
    pub authority: Pubkey,
    pub amount: u64,
    pub shares: u64,
    pub total_idle: u64,
    pub total_deployed: u64,
    pub total_shares: u64,
    pub share_price: u128,
    pub timestamp: i64,
}

#[event]
pub struct VaultWithdrawEvent {
    pub vault_key: Pubkey,
    pub authority: Pubkey,
    pub shares: u64,
    pub gross_amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub total_idle: u64,
    pub total_deployed: u64,
    pub total_shares: u64,
    pub share_price: u128,
    pub timestamp: i64,
}

#[event]
pub struct ControllerInitEvent {
    pub controller_key: Pubkey,
    pub vault_key: Pubkey,
}

#[event]
pub struct ControllerSetEvent {
    pub vault_key: Pubkey,
    pub controller_key: Pubkey,
}

#[event]
pub struct StrategyInitEvent {
    pub strategy_key: Pubkey,
    pub controller_key: Pubkey,
    pub strategy_type: u8,
    pub underlying_mint: Pubkey,
    pub reward_mint: Pubkey,
}

#[event]
pub struct StrategyApprovedEvent {
    pub controller_key: Pubkey,
    pub strategy_key: Pubkey,
}

#[event]
pub struct StrategyInfoSetEvent {
    pub controller_key: Pubkey,
    pub index: u8,
    pub strategy_key: Pubkey,
    pub cap_max: u64,
    pub allocation_bps: u64,
}

#[event]
pub struct StrategyLengthSetEvent {
    pub controller_key: Pubkey,
    pub strategy_length: u8,
}

#[event]
pub struct WithdrawalFeeSetEvent {
    pub controller_key: Pubkey,
    pub withdrawal_fee_bps: u64,
}

#[event]
pub struct DepositLimitSetEvent {
    pub vault_key: Pubkey,
    pub deposit_limit: u64,
}

#[event]
pub struct EarnEvent {
    pub vault_key: Pubkey,
    pub strategy_key: Pubkey,
    pub target: u64,
    pub allocated: u64,
    pub strategy_balance: u64,
}

#[event]
pub struct EarnSkippedEvent {
    pub vault_key: Pubkey,
    pub strategy_key: Pubkey,
}

#[event]
pub struct StrategyReportedEvent {
    pub vault_key: Pubkey,
    pub strategy_key: Pubkey,
    pub claimed_reward: u64,
    pub want_gained: u64,
    pub compounded: bool,
    pub total_shares: u64,
    pub share_price: u128,
    pub timestamp: i64,
}

#[event]
pub struct HarvestSkippedEvent {
    pub vault_key: Pubkey,
    pub strategy_key: Pubkey,
    pub error_code: u32,
}

#[event]
pub struct SwapPathSetEvent {
    pub strategy_key: Pubkey,
    pub src_mint: Pubkey,
    pub dst_mint: Pubkey,
    pub hops: u8,
}

#[event]
pub struct StrategyWithdrawAllEvent {
    pub vault_key: Pubkey,
    pub strategy_key: Pubkey,
    pub freed: u64,
}

#[event]
pub struct StrategyRetiredEvent {
    pub vault_key: Pubkey,
    pub strategy_key: Pubkey,
    pub freed: u64,
    pub outstanding_debt: u64,
}
