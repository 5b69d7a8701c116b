use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::features;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EntryDesk API",
        description = "Multi-tenant karate tournament registration"
    ),
    paths(
        features::athletes::handlers::register_athlete,
        features::athletes::handlers::bulk_register_athletes,
        features::athletes::handlers::list_athletes,
        features::athletes::handlers::athlete_stats,
        features::athletes::handlers::update_athlete,
        features::athletes::handlers::delete_athlete,
        features::athletes::handlers::import_athletes,
        features::athletes::handlers::export_athletes,
        features::audit::handlers::list_audit_logs,
        features::audit::handlers::audit_summary,
        features::config::handlers::get_config,
        features::config::handlers::update_config,
        features::access::handlers::list_allowed_emails,
        features::access::handlers::add_allowed_email,
        features::access::handlers::remove_allowed_email,
    ),
    components(schemas(
        storage::dto::athlete::RegisterAthleteRequest,
        storage::dto::athlete::UpdateAthleteRequest,
        storage::dto::athlete::AthleteResponse,
        storage::dto::athlete::AthleteListRow,
        storage::dto::athlete::BulkRegisterRequest,
        storage::dto::athlete::BulkItemOutcome,
        storage::dto::athlete::BulkRegisterResponse,
        storage::dto::athlete::AthleteStats,
        storage::dto::audit::AuditLogResponse,
        storage::dto::audit::AuditSummary,
        storage::dto::config::UpdateConfigRequest,
        storage::dto::config::ConfigResponse,
        storage::dto::config::AddAllowedEmailRequest,
        storage::models::Gender,
        storage::models::BeltRank,
        storage::models::CompetitionDay,
        storage::models::AuditAction,
        storage::models::AllowedEmail,
        crate::features::athletes::handlers::ImportResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "athletes", description = "Registration and roster management"),
        (name = "audit", description = "Admin review of the audit trail"),
        (name = "config", description = "Tournament settings"),
        (name = "access", description = "Registration whitelist"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
