pub mod controller;
pub mod farm_strategy;
pub mod roles;
pub mod simple_strategy;
pub mod strategy;
pub mod strategy_data;
pub mod swap_path;
pub mod vault;

pub use controller::*;
pub use farm_strategy::*;
pub use roles::*;
pub use simple_strategy::*;
pub use strategy::*;
pub use strategy_data::*;
pub use swap_path::*;
pub use vault::*;
