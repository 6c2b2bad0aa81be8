pub mod approve_strategy;
pub mod controller_setters;
pub mod deposit;
pub mod earn;
pub mod harvest;
pub mod harvest_all;
pub mod init_strategy;
pub mod initialize_controller;
pub mod initialize_vault;
pub mod retire_strategy;
pub mod strategy_setters;
pub mod vault_setters;
pub mod withdraw;

pub use approve_strategy::*;
pub use controller_setters::*;
pub use deposit::*;
pub use earn::*;
pub use harvest::*;
pub use harvest_all::*;
pub use init_strategy::*;
pub use initialize_controller::*;
pub use initialize_vault::*;
pub use retire_strategy::*;
pub use strategy_setters::*;
pub use vault_setters::*;
pub use withdraw::*;
