use storage::Database;

use crate::audit::AuditRecorder;
use crate::features::config::cache::ConfigCache;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ConfigCache,
    pub audit: AuditRecorder,
}
