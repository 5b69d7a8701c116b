mod athlete;
mod audit_log;
mod coach;
mod config;

pub use athlete::{Athlete, BeltRank, CompetitionDay, Gender};
pub use audit_log::{AuditAction, AuditLogEntry};
pub use coach::{AllowedEmail, Coach, Dojo};
pub use config::ConfigEntry;
