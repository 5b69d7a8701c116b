use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use storage::repository::coach::CoachRepository;
use storage::Database;
use tower::ServiceExt;
use web::audit::AuditRecorder;
use web::features::config::cache::ConfigCache;
use web::state::AppState;

const EAGLES_TOKEN: &str = "eagles-token";
const TIGERS_TOKEN: &str = "tigers-token";
const ADMIN_TOKEN: &str = "admin-token";
const FLOATING_TOKEN: &str = "floating-token";

struct TestApp {
    router: Router,
}

async fn spawn_app() -> TestApp {
    let db = Database::in_memory().await.unwrap();
    db.run_migrations().await.unwrap();

    let repo = CoachRepository::new(db.pool());
    let eagles = repo.create_dojo("Eagles").await.unwrap();
    let tigers = repo.create_dojo("Tigers").await.unwrap();
    repo.create_coach(
        "kim@eagles.example",
        "Kim Sato",
        Some(eagles.id),
        false,
        EAGLES_TOKEN,
    )
    .await
    .unwrap();
    repo.create_coach(
        "lee@tigers.example",
        "Lee Wong",
        Some(tigers.id),
        false,
        TIGERS_TOKEN,
    )
    .await
    .unwrap();
    repo.create_coach("pat@desk.example", "Pat Organizer", None, true, ADMIN_TOKEN)
        .await
        .unwrap();
    repo.create_coach(
        "drift@desk.example",
        "Drift Coach",
        None,
        false,
        FLOATING_TOKEN,
    )
    .await
    .unwrap();

    let (audit, _retry_rx) = AuditRecorder::new(db.clone());
    let state = AppState {
        db,
        // Zero TTL keeps config reads fresh for every request.
        config: ConfigCache::new(Duration::ZERO),
        audit,
    };

    TestApp {
        router: web::router(state),
    }
}

impl TestApp {
    async fn raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.raw(method, uri, token, body).await;
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn audit_entries(&self) -> Vec<Value> {
        let (status, body) = self
            .request("GET", "/api/audit-logs", Some(ADMIN_TOKEN), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        body.as_array().unwrap().clone()
    }
}

fn ann_lee() -> Value {
    json!({
        "full_name": "Ann Lee",
        "date_of_birth": "2012-03-01",
        "gender": "Female",
        "belt_rank": "Green",
        "competition_day": "Day 1",
        "kata_event": true,
        "kumite_event": false
    })
}

#[tokio::test]
async fn register_creates_athlete_and_audit_entry() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["full_name"], "Ann Lee");
    assert_eq!(body["belt_rank"], "Green");
    assert_eq!(body["competition_day"], "Day 1");
    assert!(body["updated_at"].is_null());

    let entries = app.audit_entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "REGISTER");
    assert_eq!(entries[0]["coach_email"], "kim@eagles.example");
    assert_eq!(entries[0]["dojo_name"], "Eagles");
    assert_eq!(entries[0]["payload"]["full_name"], "Ann Lee");
    assert_eq!(entries[0]["payload"]["date_of_birth"], "2012-03-01");
}

#[tokio::test]
async fn duplicate_registration_in_same_dojo_conflicts() {
    let app = spawn_app().await;

    let (status, _) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"],
        "Athlete 'Ann Lee' with this date of birth already exists in your dojo."
    );

    // The failed attempt leaves no audit trace.
    assert_eq!(app.audit_entries().await.len(), 1);
}

#[tokio::test]
async fn same_athlete_in_another_dojo_is_allowed() {
    let app = spawn_app().await;

    let (status, _) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request("POST", "/api/athletes", Some(TIGERS_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn requests_without_a_valid_token_are_unauthorized() {
    let app = spawn_app().await;

    let (status, _) = app.request("POST", "/api/athletes", None, Some(ann_lee())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/api/athletes", Some("no-such-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validation_errors_are_aggregated_in_field_order() {
    let app = spawn_app().await;

    let mut req = ann_lee();
    req["full_name"] = json!("A");
    req["weight_kg"] = json!(250.0);
    req["kata_event"] = json!(false);
    req["kumite_event"] = json!(false);

    let (status, body) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(req))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(
        body["details"],
        json!([
            "Name must be at least 2 characters",
            "Weight must be between 10 and 200 kg",
            "At least one event (Kata or Kumite) must be selected"
        ])
    );
}

#[tokio::test]
async fn coach_without_a_dojo_cannot_register() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("POST", "/api/athletes", Some(FLOATING_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "No dojo associated with your account");
}

#[tokio::test]
async fn closing_registration_blocks_new_entries() {
    let app = spawn_app().await;

    let (status, _) = app
        .request(
            "PUT",
            "/api/config/registration_open",
            Some(ADMIN_TOKEN),
            Some(json!({ "value": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Registration is closed");

    let (status, _) = app
        .request(
            "PUT",
            "/api/config/registration_open",
            Some(ADMIN_TOKEN),
            Some(json!({ "value": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn non_admin_cannot_change_config() {
    let app = spawn_app().await;

    let (status, _) = app
        .request(
            "PUT",
            "/api/config/registration_open",
            Some(EAGLES_TOKEN),
            Some(json!({ "value": false })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The public view is readable without a token.
    let (status, body) = app.request("GET", "/api/config", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["registration_open"], true);
}

#[tokio::test]
async fn bulk_registration_reports_per_record_outcomes() {
    let app = spawn_app().await;

    // Record 3 fails validation, record 4 repeats record 1; the rest land.
    let mut invalid = ann_lee();
    invalid["full_name"] = json!("Eve Ko");
    invalid["kata_event"] = json!(false);
    invalid["kumite_event"] = json!(false);

    let batch = json!({
        "athletes": [
            ann_lee(),
            { "full_name": "Bob Tan", "date_of_birth": "2010-06-02", "gender": "Male",
              "belt_rank": "Blue", "competition_day": "Both", "kata_event": true, "kumite_event": true },
            invalid,
            ann_lee(),
            { "full_name": "Dan Ho", "date_of_birth": "2009-09-09", "gender": "Male",
              "belt_rank": "Brown", "competition_day": "Day 1", "kata_event": true, "kumite_event": false },
        ]
    });

    let (status, body) = app
        .request("POST", "/api/athletes/bulk", Some(EAGLES_TOKEN), Some(batch))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successful"], 3);
    assert_eq!(body["failed"], 2);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 5);
    assert_eq!(results[0]["success"], true);
    assert_eq!(results[1]["success"], true);
    assert_eq!(results[2]["success"], false);
    assert_eq!(
        results[2]["error"],
        "At least one event (Kata or Kumite) must be selected"
    );
    // First occurrence of Ann Lee wins; the repeat is a duplicate.
    assert_eq!(results[3]["success"], false);
    assert_eq!(results[3]["error"], "Duplicate - already exists");
    assert_eq!(results[4]["success"], true);

    // The whole batch is one audit entry covering the inserted subset.
    let entries = app.audit_entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["action"], "BULK_REGISTER");
    assert_eq!(entries[0]["payload"]["count"], 3);
    assert_eq!(
        entries[0]["payload"]["names"],
        json!(["Ann Lee", "Bob Tan", "Dan Ho"])
    );
}

#[tokio::test]
async fn update_is_gated_by_ownership_and_audited() {
    let app = spawn_app().await;

    let (_, created) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let change = json!({ "belt_rank": "Blue" });

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/athletes/{id}"),
            Some(TIGERS_TOKEN),
            Some(change.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "You do not have permission to modify this athlete"
    );

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/athletes/{id}"),
            Some(EAGLES_TOKEN),
            Some(change.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["belt_rank"], "Blue");
    assert!(!body["updated_at"].is_null());
    // Unsubmitted fields keep their values.
    assert_eq!(body["competition_day"], "Day 1");

    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/athletes/{id}"),
            Some(ADMIN_TOKEN),
            Some(json!({ "weight_kg": 36.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let entries = app.audit_entries().await;
    assert_eq!(entries[1]["action"], "UPDATE");
    assert_eq!(entries[1]["payload"]["athlete_id"], id);
    assert_eq!(entries[1]["payload"]["changes"], json!({ "belt_rank": "Blue" }));

    let unknown = uuid::Uuid::new_v4();
    let (status, _) = app
        .request(
            "PUT",
            &format!("/api/athletes/{unknown}"),
            Some(EAGLES_TOKEN),
            Some(change),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() {
    let app = spawn_app().await;

    let (_, created) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/athletes/{id}"),
            Some(EAGLES_TOKEN),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No changes submitted");
}

#[tokio::test]
async fn update_cannot_clear_both_events() {
    let app = spawn_app().await;

    // Ann is entered for kata only; withdrawing it would leave no event.
    let (_, created) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = app
        .request(
            "PUT",
            &format!("/api/athletes/{id}"),
            Some(EAGLES_TOKEN),
            Some(json!({ "kata_event": false })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"],
        json!(["At least one event (Kata or Kumite) must be selected"])
    );
}

#[tokio::test]
async fn delete_keeps_a_snapshot_in_the_audit_trail() {
    let app = spawn_app().await;

    let (_, created) = app
        .request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/athletes/{id}"),
            Some(EAGLES_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let entries = app.audit_entries().await;
    assert_eq!(entries[0]["action"], "DELETE");
    assert_eq!(entries[0]["payload"]["full_name"], "Ann Lee");
    assert_eq!(entries[0]["payload"]["id"], id);

    // Gone means gone; the repeat attempt is a 404 and leaves no entry.
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/api/athletes/{id}"),
            Some(EAGLES_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.audit_entries().await.len(), 2);
}

#[tokio::test]
async fn listings_are_scoped_to_the_coach() {
    let app = spawn_app().await;

    app.request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    app.request(
        "POST",
        "/api/athletes",
        Some(TIGERS_TOKEN),
        Some(json!({
            "full_name": "Bob Tan", "date_of_birth": "2010-06-02", "gender": "Male",
            "belt_rank": "Blue", "competition_day": "Both", "kata_event": true, "kumite_event": true
        })),
    )
    .await;

    let (status, body) = app
        .request("GET", "/api/athletes", Some(EAGLES_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["full_name"], "Ann Lee");
    assert_eq!(rows[0]["dojo_name"], "Eagles");

    let (status, body) = app
        .request("GET", "/api/athletes", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = app
        .request("GET", "/api/athletes?belt=Blue", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["full_name"], "Bob Tan");
}

#[tokio::test]
async fn stats_count_the_visible_roster() {
    let app = spawn_app().await;

    app.request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    app.request(
        "POST",
        "/api/athletes",
        Some(EAGLES_TOKEN),
        Some(json!({
            "full_name": "Bob Tan", "date_of_birth": "2010-06-02", "gender": "Male",
            "belt_rank": "Blue", "competition_day": "Both", "kata_event": true, "kumite_event": true
        })),
    )
    .await;

    let (status, body) = app
        .request("GET", "/api/athletes/stats", Some(EAGLES_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["by_day"]["Day 1"], 1);
    assert_eq!(body["by_day"]["Both"], 1);
    assert_eq!(body["by_gender"]["Female"], 1);
    assert_eq!(body["kata"], 2);
    assert_eq!(body["kumite"], 1);
}

#[tokio::test]
async fn audit_review_is_admin_only() {
    let app = spawn_app().await;

    let (status, body) = app
        .request("GET", "/api/audit-logs", Some(EAGLES_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Only admins can review the audit trail");
}

#[tokio::test]
async fn audit_filters_narrow_the_listing() {
    let app = spawn_app().await;

    app.request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;
    app.request(
        "POST",
        "/api/athletes",
        Some(TIGERS_TOKEN),
        Some(json!({
            "full_name": "Bob Tan", "date_of_birth": "2010-06-02", "gender": "Male",
            "belt_rank": "Blue", "competition_day": "Both", "kata_event": true, "kumite_event": true
        })),
    )
    .await;

    let (status, body) = app
        .request("GET", "/api/audit-logs?dojo=eagles", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["dojo_name"], "Eagles");

    let (status, body) = app
        .request(
            "GET",
            "/api/audit-logs?action=REGISTER&limit=1",
            Some(ADMIN_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .request("GET", "/api/audit-logs/summary", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_entries"], 2);
    assert_eq!(body["by_action"]["REGISTER"], 2);
}

#[tokio::test]
async fn csv_import_registers_parsable_rows() {
    let app = spawn_app().await;

    let csv = "Name,Date of Birth,Gender,Belt Rank,Competition Day,Kata,Kumite\n\
               ann lee,2012-03-01,Female,Green,Day 1,yes,no\n\
               Bob Tan,not-a-date,Male,Blue,Both,yes,yes\n";

    let request = Request::builder()
        .method("POST")
        .uri("/api/athletes/import")
        .header(header::AUTHORIZATION, format!("Bearer {EAGLES_TOKEN}"))
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(csv))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["successful"], 1);
    assert_eq!(body["failed"], 1);
    assert_eq!(
        body["parse_errors"],
        json!(["Row 3: Invalid date format (use YYYY-MM-DD)"])
    );
    assert_eq!(body["results"][0]["name"], "Ann Lee");
    assert_eq!(body["results"][0]["success"], true);

    let (_, listing) = app
        .request("GET", "/api/athletes", Some(EAGLES_TOKEN), None)
        .await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn csv_export_contains_the_visible_roster() {
    let app = spawn_app().await;

    app.request("POST", "/api/athletes", Some(EAGLES_TOKEN), Some(ann_lee()))
        .await;

    let response = app
        .raw("GET", "/api/athletes/export", Some(EAGLES_TOKEN), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("Name,Date of Birth,Gender,Belt Rank"));
    assert!(text.contains("Ann Lee"));
    assert!(text.contains("Eagles"));
}

#[tokio::test]
async fn allowed_email_whitelist_is_admin_managed() {
    let app = spawn_app().await;

    let (status, _) = app
        .request("GET", "/api/allowed-emails", Some(EAGLES_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .request(
            "POST",
            "/api/allowed-emails",
            Some(ADMIN_TOKEN),
            Some(json!({ "email": "New.Coach@Example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "new.coach@example.com");

    let (status, _) = app
        .request(
            "POST",
            "/api/allowed-emails",
            Some(ADMIN_TOKEN),
            Some(json!({ "email": "not-an-email" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .request("GET", "/api/allowed-emails", Some(ADMIN_TOKEN), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app
        .request(
            "DELETE",
            "/api/allowed-emails/new.coach@example.com",
            Some(ADMIN_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(
            "DELETE",
            "/api/allowed-emails/new.coach@example.com",
            Some(ADMIN_TOKEN),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = spawn_app().await;

    let (status, body) = app.request("GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "EntryDesk API");
    assert!(body["paths"]["/api/athletes"].is_object());
}
