pub mod athlete;
pub mod audit;
pub mod config;
