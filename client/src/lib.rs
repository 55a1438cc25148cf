pub mod config;
pub mod contract;
pub mod minter;
pub mod sender;
pub mod types;
