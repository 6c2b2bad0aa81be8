pub const VAULT_SEED: &str = "vault";
pub const SHARES_SEED: &str = "shares";
pub const UNDERLYING_SEED: &str = "underlying";
pub const REWARD_SEED: &str = "reward";
pub const CONTROLLER_SEED: &str = "controller";
pub const STRATEGY_SEED: &str = "strategy";
pub const STRATEGY_DATA_SEED: &str = "strategy_data";
pub const SWAP_PATH_SEED: &str = "swap_path";
pub const ROLES_SEED: &str = "roles";

pub const MAX_BPS: u64 = 10_000;
pub const SHARE_PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

pub const MAX_STRATEGIES: usize = 10;
pub const MAX_SWAP_HOPS: usize = 4;

/// Account group widths for multi-strategy routing via remaining accounts.
pub const ACCOUNTS_PER_ROUTE: usize = 6;
pub const ACCOUNTS_PER_HARVEST: usize = 10;

pub const DISCRIMINATOR_LEN: usize = 8;
