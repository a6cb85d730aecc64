//! Router-level tests
//!
//! The pool connects lazily and no test reaches Postgres: they hit routes that
//! fail before any query, or KDS routes backed by the in-memory repository.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use back_office::auth::tenant_auth::create_token;
use back_office::config::{Config, KdsThresholds};
use back_office::kds::memory::InMemoryKdsRepository;
use back_office::team::mailer::LogMailer;
use back_office::{AppState, api};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{Destination, PrepStatus, Ticket, TicketLine};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const SECRET: &str = "test-secret";
const TENANT: &str = "tenant-1";

fn config() -> Config {
    Config {
        database_url: "postgres://localhost/back_office_test".into(),
        http_port: 0,
        environment: "development".into(),
        jwt_secret: SECRET.into(),
        ses_from_email: None,
        invite_base_url: "http://localhost/invite".into(),
        log_dir: None,
        kds_thresholds: KdsThresholds::default(),
        sepa_debtor: None,
    }
}

fn app_with(repo: Arc<InMemoryKdsRepository>) -> Router {
    let config = config();
    let pool = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();
    let state = AppState::assemble(pool, &config, repo, Arc::new(LogMailer));
    api::create_router(state)
}

fn app() -> Router {
    app_with(Arc::new(InMemoryKdsRepository::new()))
}

fn bearer() -> String {
    format!("Bearer {}", create_token(TENANT, "chef@casapepe.es", SECRET).unwrap())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::AUTHORIZATION, bearer())
        .body(Body::empty())
        .unwrap()
}

fn kitchen_repo() -> Arc<InMemoryKdsRepository> {
    let repo = InMemoryKdsRepository::new();
    repo.insert_ticket(Ticket {
        id: 10,
        tenant_id: TENANT.into(),
        location_id: 1,
        table_name: Some("Mesa 4".into()),
        opened_at: 1_000,
        closed_at: None,
    });
    for (id, course) in [(100, 1), (101, 1), (102, 2)] {
        repo.insert_line(TicketLine {
            id,
            tenant_id: TENANT.into(),
            ticket_id: 10,
            product_id: 7,
            product_name: "Croquetas".into(),
            quantity: 2,
            course,
            destination: Destination::Kitchen,
            prep_status: PrepStatus::Pending,
            note: None,
            created_at: 1_000,
            prep_started_at: None,
            ready_at: None,
            served_at: None,
            updated_at: 1_000,
        });
    }
    Arc::new(repo)
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "back-office");
}

#[tokio::test]
async fn tenant_routes_require_token() {
    let response = app()
        .oneshot(
            Request::get("/api/tenant/locations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app()
        .oneshot(
            Request::get("/api/tenant/locations")
                .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn public_reservation_is_validated_before_lookup() {
    let reserved_for = chrono::Utc::now().timestamp_millis() + 86_400_000;
    let response = app()
        .oneshot(
            Request::post("/api/public/reservations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({
                        "location_id": 1,
                        "guest_name": "Ana",
                        "email": "ana@example.es",
                        "phone": null,
                        "party_size": 0,
                        "reserved_for": reserved_for,
                        "note": null
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 7002);
}

#[tokio::test]
async fn public_reservations_are_rate_limited() {
    let app = app();
    let mut last = StatusCode::OK;
    for _ in 0..11 {
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/public/reservations")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-forwarded-for", "198.51.100.4")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        last = response.status();
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn line_moves_forward_and_rejects_repeat() {
    let app = app_with(kitchen_repo());

    let response = app
        .clone()
        .oneshot(post("/api/tenant/kds/lines/100/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let line = body_json(response).await;
    assert_eq!(line["prep_status"], "preparing");
    assert!(line["prep_started_at"].is_i64());

    let response = app
        .clone()
        .oneshot(post("/api/tenant/kds/lines/100/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], 4102);
    assert_eq!(body["details"]["current_status"], "preparing");
}

#[tokio::test]
async fn course_action_only_touches_its_course() {
    let app = app_with(kitchen_repo());

    let response = app
        .clone()
        .oneshot(post("/api/tenant/kds/tickets/10/courses/1/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let lines = body_json(response).await;
    let ids: Vec<i64> = lines
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&100) && ids.contains(&101));
}

fn ids_of(lines: &Value) -> Vec<i64> {
    let mut ids: Vec<i64> = lines
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn ticket_action_moves_every_matching_line() {
    let app = app_with(kitchen_repo());

    let response = app
        .clone()
        .oneshot(post("/api/tenant/kds/lines/102/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post("/api/tenant/kds/tickets/10/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let lines = body_json(response).await;
    assert_eq!(ids_of(&lines), vec![100, 101]);
    assert!(
        lines
            .as_array()
            .unwrap()
            .iter()
            .all(|l| l["prep_status"] == "preparing")
    );

    // Nothing pending any more
    let response = app
        .clone()
        .oneshot(post("/api/tenant/kds/tickets/10/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    let response = app
        .oneshot(post("/api/tenant/kds/tickets/10/finish"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids_of(&body_json(response).await), vec![100, 101, 102]);
}

#[tokio::test]
async fn ticket_action_on_unknown_ticket_is_not_found() {
    let response = app_with(kitchen_repo())
        .oneshot(post("/api/tenant/kds/tickets/999/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn flags_can_be_set_and_cleared() {
    let app = app_with(kitchen_repo());
    let set = |body: Value| {
        Request::post("/api/tenant/kds/tickets/10/flags")
            .header(header::AUTHORIZATION, bearer())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };
    let clear = |flag: &str| {
        Request::delete(format!("/api/tenant/kds/tickets/10/flags/{flag}"))
            .header(header::AUTHORIZATION, bearer())
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(set(json!({"flag": "rush", "note": null})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await[0]["flag"], "rush");

    let response = app
        .clone()
        .oneshot(set(json!({"flag": "allergy", "note": "Sin frutos secos"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 2);

    let response = app.clone().oneshot(clear("rush")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let flags = body_json(response).await;
    assert_eq!(flags.as_array().unwrap().len(), 1);
    assert_eq!(flags[0]["flag"], "allergy");
    assert_eq!(flags[0]["note"], "Sin frutos secos");

    let response = app.oneshot(clear("rush")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn flags_on_closed_ticket_are_rejected() {
    let repo = kitchen_repo();
    repo.close_ticket(10, 5_000);
    let response = app_with(repo)
        .oneshot(
            Request::post("/api/tenant/kds/tickets/10/flags")
                .header(header::AUTHORIZATION, bearer())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"flag": "hold", "note": null}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 4002);
}

#[tokio::test]
async fn closed_ticket_rejects_transitions() {
    let repo = kitchen_repo();
    repo.close_ticket(10, 5_000);
    let app = app_with(repo);

    let response = app
        .oneshot(post("/api/tenant/kds/lines/101/start"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], 4002);
}

#[tokio::test]
async fn other_tenant_cannot_see_lines() {
    let app = app_with(kitchen_repo());
    let token = create_token("tenant-2", "x@y.es", SECRET).unwrap();

    let response = app
        .oneshot(
            Request::post("/api/tenant/kds/lines/100/start")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_action_is_rejected() {
    let response = app_with(kitchen_repo())
        .oneshot(post("/api/tenant/kds/lines/100/teleport"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
