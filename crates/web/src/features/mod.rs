pub mod access;
pub mod athletes;
pub mod audit;
pub mod config;
