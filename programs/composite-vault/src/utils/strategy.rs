use anchor_lang::prelude::*;

use crate::constants::ACCOUNTS_PER_ROUTE;
use crate::errors::ErrorCode;
use crate::state::strategy::RouteAccounts;
use crate::state::{FarmStrategy, SimpleStrategy, Strategy, StrategyData, StrategyType};

/// Dispatches an untyped strategy account to its concrete family by
/// discriminator. The returned box is a deserialized copy; call
/// `save_changes` to persist mutations.
pub fn from_account_info(strategy_acc: &AccountInfo) -> Result<Box<dyn Strategy>> {
    if strategy_acc.owner != &crate::ID {
        return Err(ErrorCode::InvalidStrategyData.into());
    }

    let data = strategy_acc.try_borrow_data()?;
    if data.len() < 8 {
        return Err(ErrorCode::InvalidStrategyData.into());
    }

    match StrategyType::from_discriminator(&data[..8]) {
        Some(StrategyType::Simple) => {
            let strategy = SimpleStrategy::deserialize(&mut &data[8..])
                .map_err(|_| error!(ErrorCode::InvalidStrategyData))?;
            Ok(Box::new(strategy))
        }
        Some(StrategyType::Farm) => {
            let strategy = FarmStrategy::deserialize(&mut &data[8..])
                .map_err(|_| error!(ErrorCode::InvalidStrategyData))?;
            Ok(Box::new(strategy))
        }
        None => Err(ErrorCode::InvalidStrategyData.into()),
    }
}

pub fn save_changes(strategy_acc: &AccountInfo, strategy: &dyn Strategy) -> Result<()> {
    strategy.save_changes(&mut &mut strategy_acc.try_borrow_mut_data()?[8..])
}

pub fn balance_of(strategy_acc: &AccountInfo) -> Result<u64> {
    Ok(from_account_info(strategy_acc)?.balance_of())
}

/// Reads a controller-side registry entry carried in remaining accounts.
/// A missing or foreign account means the strategy was never approved.
pub fn load_strategy_data(info: &AccountInfo) -> Result<StrategyData> {
    if info.owner != &crate::ID {
        return Err(ErrorCode::StrategyNotApproved.into());
    }
    let data = info.try_borrow_data()?;
    StrategyData::try_deserialize(&mut &data[..])
        .map_err(|_| error!(ErrorCode::StrategyNotApproved))
}

pub fn store_strategy_data(info: &AccountInfo, data: &StrategyData) -> Result<()> {
    data.try_serialize(&mut &mut info.try_borrow_mut_data()?[..])
}

/// One strategy's slice of the remaining accounts for earn / withdrawal
/// routing: registry entry, state account, token account, then the farm
/// accounts (repeat any account for families without a farm position).
pub struct RouteGroup<'a, 'info> {
    pub strategy_data_acc: &'a AccountInfo<'info>,
    pub strategy_acc: &'a AccountInfo<'info>,
    pub strategy_token_account: &'a AccountInfo<'info>,
    pub farm_program: &'a AccountInfo<'info>,
    pub farm_pool: &'a AccountInfo<'info>,
    pub farm_pool_token_account: &'a AccountInfo<'info>,
}

impl<'a, 'info> RouteGroup<'a, 'info> {
    pub fn as_route(&self) -> RouteAccounts<'a, 'info> {
        RouteAccounts {
            strategy: self.strategy_acc,
            strategy_token_account: self.strategy_token_account,
            farm_program: self.farm_program,
            farm_pool: self.farm_pool,
            farm_pool_token_account: self.farm_pool_token_account,
        }
    }
}

pub fn parse_route_groups<'a, 'info>(
    accounts: &'a [AccountInfo<'info>],
) -> Result<Vec<RouteGroup<'a, 'info>>> {
    require!(
        accounts.len() % ACCOUNTS_PER_ROUTE == 0,
        ErrorCode::InvalidAccountPairs
    );

    Ok(accounts
        .chunks_exact(ACCOUNTS_PER_ROUTE)
        .map(|chunk| RouteGroup {
            strategy_data_acc: &chunk[0],
            strategy_acc: &chunk[1],
            strategy_token_account: &chunk[2],
            farm_program: &chunk[3],
            farm_pool: &chunk[4],
            farm_pool_token_account: &chunk[5],
        })
        .collect())
}

/// Validates that a route group belongs to `strategy` under `controller`
/// and returns its registry entry.
pub fn check_route_group(
    group: &RouteGroup,
    controller: Pubkey,
    strategy: Pubkey,
) -> Result<StrategyData> {
    require!(
        group.strategy_acc.key() == strategy,
        ErrorCode::InvalidAccountPairs
    );
    let data = load_strategy_data(group.strategy_data_acc)?;
    require!(
        data.controller == controller && data.strategy == strategy,
        ErrorCode::InvalidAccountPairs
    );
    Ok(data)
}
