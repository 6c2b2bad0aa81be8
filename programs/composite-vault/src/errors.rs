use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Zero value")]
    ZeroValue,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Quoted minimum not met")]
    SlippageExceeded,

    #[msg("Exceed deposit limit")]
    ExceedDepositLimit,

    #[msg("Insufficient shares")]
    InsufficientShares,

    #[msg("Insufficient liquidity")]
    InsufficientLiquidity,

    #[msg("Strategy is not approved")]
    StrategyNotApproved,

    #[msg("Strategy was retired")]
    StrategyRetired,

    #[msg("Strategy still has outstanding debt")]
    StrategyHasDebt,

    #[msg("Allocation exceeds 100%")]
    AllocationOverflow,

    #[msg("Strategy slot is not configured")]
    SlotNotConfigured,

    #[msg("Strategy slot index out of range")]
    SlotOutOfRange,

    #[msg("No swap path configured for this conversion")]
    MissingSwapPath,

    #[msg("Invalid swap path")]
    InvalidSwapPath,

    #[msg("Invalid fee")]
    InvalidFee,

    #[msg("Invalid vault config")]
    InvalidVaultConfig,

    #[msg("Invalid strategy config")]
    InvalidStrategyConfig,

    #[msg("Invalid strategy data")]
    InvalidStrategyData,

    #[msg("Invalid account pairing in remaining accounts")]
    InvalidAccountPairs,

    #[msg("Controller is not bound to this vault")]
    ControllerMismatch,

    #[msg("Access denied")]
    AccessDenied,

    #[msg("Serialization error")]
    SerializationError,
}
