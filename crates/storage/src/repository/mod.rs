pub mod access;
pub mod athlete;
pub mod audit_log;
pub mod coach;
pub mod config;
