//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use mentor_core::advisor::AdvisorClient;
use tempfile::TempDir;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    create_router_with_options(None, ServerConfig::default(), None)
}

fn setup_test_app_with_mock() -> Router {
    create_router_with_options(None, ServerConfig::default(), Some(AdvisorClient::mock()))
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

async fn post(app: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, get_body_json(response).await)
}

async fn create_session(app: &Router, name: &str) -> String {
    let (status, json) = post(app, "/api/sessions", serde_json::json!({ "name": name })).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

// ========== Status ==========

#[tokio::test]
async fn test_status_without_advisor() {
    let app = setup_test_app();

    let (status, json) = get(&app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["advisor_configured"], false);
    assert_eq!(json["active_sessions"], 0);
}

#[tokio::test]
async fn test_status_with_mock_advisor() {
    let app = setup_test_app_with_mock();

    let (status, json) = get(&app, "/api/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["advisor_configured"], true);
    assert_eq!(json["advisor_model"], "mock");
}

// ========== Session lifecycle ==========

#[tokio::test]
async fn test_session_lifecycle() {
    let app = setup_test_app();

    let (status, json) = post(&app, "/api/sessions", serde_json::json!({ "name": "Ana" })).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = json["session_id"].as_str().unwrap().to_string();
    assert!(session_id.starts_with("ses_"));
    // Journey start awards points and the first achievement
    let events = json["events"].as_array().unwrap();
    assert!(events
        .iter()
        .any(|e| e["event"] == "achievement_unlocked"));

    let (status, json) = get(&app, &format!("/api/sessions/{}", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Ana");
    assert_eq!(json["points"], 10);
    assert_eq!(json["level"], 1);
    assert_eq!(json["badge"], "Aprendiz Financeiro");

    let (status, json) = delete(&app, &format!("/api/sessions/{}", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["deleted"], true);

    let (status, _) = get(&app, &format!("/api/sessions/{}", session_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_session_blank_name() {
    let app = setup_test_app();

    let (status, _) = post(&app, "/api/sessions", serde_json::json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let app = setup_test_app();

    let (status, _) = get(&app, "/api/sessions/ses_desconhecida/dashboard").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ========== Profile intake ==========

#[tokio::test]
async fn test_income_validation() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Bruno").await;

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/profile/income", session_id),
        serde_json::json!({ "monthly_income": -100.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/profile/income", session_id),
        serde_json::json!({ "monthly_income": 3000.0, "emergency_reserve": 500.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_debt_validation() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Clara").await;

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/profile/debts", session_id),
        serde_json::json!({
            "name": "Cartao",
            "principal": 2000.0,
            "monthly_payment": 200.0,
            "monthly_rate_pct": 12.0,
            "due_day": 40
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/profile/debts", session_id),
        serde_json::json!({
            "name": "Cartao",
            "principal": 2000.0,
            "monthly_payment": 200.0,
            "monthly_rate_pct": 12.0,
            "due_day": 10
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = delete(
        &app,
        &format!("/api/sessions/{}/profile/debts/Cartao", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_first_goal_awards_achievement() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Davi").await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/profile/goals", session_id),
        serde_json::json!({
            "name": "Viagem",
            "target_amount": 5000.0,
            "term_months": 10,
            "priority": "high"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = json["events"].as_array().unwrap();
    assert!(events.iter().any(|e| e["event"] == "achievement_unlocked"
        && e["label"].as_str().unwrap().contains("Primeira Meta")));

    // Second goal awards nothing extra
    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/profile/goals", session_id),
        serde_json::json!({
            "name": "Reserva",
            "target_amount": 3000.0,
            "term_months": 6,
            "priority": "medium"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["events"].as_array().unwrap().is_empty());
}

// ========== Diagnostic ==========

#[tokio::test]
async fn test_diagnostic_flow() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Elisa").await;

    // Cannot complete before informing income
    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/diagnostic/complete", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/diagnostic/start", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!json["events"].as_array().unwrap().is_empty());

    // Starting again is a no-op
    let (_, json) = post(
        &app,
        &format!("/api/sessions/{}/diagnostic/start", session_id),
        serde_json::json!({}),
    )
    .await;
    assert!(json["events"].as_array().unwrap().is_empty());

    post(
        &app,
        &format!("/api/sessions/{}/profile/income", session_id),
        serde_json::json!({ "monthly_income": 3000.0 }),
    )
    .await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/diagnostic/complete", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let events = json["events"].as_array().unwrap();
    assert!(events.iter().any(|e| e["event"] == "achievement_unlocked"
        && e["label"].as_str().unwrap().contains("Diagnóstico Completo")));
}

// ========== Analysis ==========

#[tokio::test]
async fn test_dashboard_guidance_without_income() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Fabio").await;

    let (status, json) = get(&app, &format!("/api/sessions/{}/dashboard", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["health"]["class"], "unavailable");
    assert!(json["guidance"].as_str().unwrap().contains("diagnóstico"));
}

#[tokio::test]
async fn test_health_snapshot_reference_scenario() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Gisele").await;

    post(
        &app,
        &format!("/api/sessions/{}/profile/income", session_id),
        serde_json::json!({ "monthly_income": 3000.0 }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
        serde_json::json!({ "kind": "fixed", "label": "Aluguel", "amount": 1000.0 }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
        serde_json::json!({ "kind": "variable", "label": "Mercado", "amount": 500.0 }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/profile/debts", session_id),
        serde_json::json!({
            "name": "Empréstimo",
            "principal": 2000.0,
            "monthly_payment": 200.0,
            "monthly_rate_pct": 2.0
        }),
    )
    .await;

    let (status, json) = get(
        &app,
        &format!("/api/sessions/{}/health-snapshot", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 70);
    assert_eq!(json["class"], "good");
    let commitment = json["income_commitment_pct"].as_f64().unwrap();
    assert!((commitment - 56.666).abs() < 0.01);
}

#[tokio::test]
async fn test_strategy_and_payoff_endpoints() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Hugo").await;

    post(
        &app,
        &format!("/api/sessions/{}/profile/debts", session_id),
        serde_json::json!({
            "name": "Cartão",
            "principal": 6000.0,
            "monthly_payment": 400.0,
            "monthly_rate_pct": 12.0
        }),
    )
    .await;

    let (status, json) = get(&app, &format!("/api/sessions/{}/strategy", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["method"], "avalanche");
    assert_eq!(json["order"][0], "Cartão");

    let (status, json) = get(&app, &format!("/api/sessions/{}/payoff", session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["debts"]["Cartão"]["horizon"].is_object());
}

#[tokio::test]
async fn test_expense_chart() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Iara").await;

    post(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
        serde_json::json!({ "kind": "fixed", "label": "Aluguel", "amount": 900.0 }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
        serde_json::json!({ "kind": "variable", "label": "Lazer", "amount": 100.0 }),
    )
    .await;

    let (status, json) = get(
        &app,
        &format!("/api/sessions/{}/expenses/chart", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let slices = json.as_array().unwrap();
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0]["label"], "Fixo: Aluguel");
    assert_eq!(slices[0]["percent"], 90.0);
}

#[tokio::test]
async fn test_clear_all_expenses() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Ivo").await;

    post(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
        serde_json::json!({ "kind": "fixed", "label": "Aluguel", "amount": 900.0 }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
        serde_json::json!({ "kind": "variable", "label": "Lazer", "amount": 100.0 }),
    )
    .await;

    // Targeted delete removes one entry
    let (status, _) = delete(
        &app,
        &format!(
            "/api/sessions/{}/profile/expenses?kind=variable&label=Lazer",
            session_id
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Without query parameters everything goes
    let (status, _) = delete(
        &app,
        &format!("/api/sessions/{}/profile/expenses", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get(
        &app,
        &format!("/api/sessions/{}/expenses/chart", session_id),
    )
    .await;
    assert!(json.as_array().unwrap().is_empty());
}

// ========== Advisor ==========

#[tokio::test]
async fn test_advice_degraded_without_advisor() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Joana").await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "Dívidas do cartão" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["degraded"], true);
    assert!(json["text"].as_str().unwrap().contains("API Key"));
    assert!(json["events"].as_array().unwrap().is_empty());

    // No history recorded in degraded mode
    let (_, history) = get(
        &app,
        &format!("/api/sessions/{}/advice/history", session_id),
    )
    .await;
    assert!(history.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_advice_with_mock_advisor() {
    let app = setup_test_app_with_mock();
    let session_id = create_session(&app, "Karla").await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "Como montar minha reserva?" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["degraded"], false);
    assert!(json["text"].as_str().unwrap().contains("Karla"));
    assert!(json["events"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["event"] == "points_awarded"));

    let (_, history) = get(
        &app,
        &format!("/api/sessions/{}/advice/history", session_id),
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_advice_history_newest_first() {
    let app = setup_test_app_with_mock();
    let session_id = create_session(&app, "Kauê").await;

    post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "Primeira dúvida" }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "Segunda dúvida" }),
    )
    .await;

    let (status, history) = get(
        &app,
        &format!("/api/sessions/{}/advice/history", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["concern"], "Segunda dúvida");
    assert_eq!(records[1]["concern"], "Primeira dúvida");
}

#[tokio::test]
async fn test_advice_empty_concern() {
    let app = setup_test_app_with_mock();
    let session_id = create_session(&app, "Lia").await;

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_advice_persists_legacy_progress() {
    let dir = TempDir::new().unwrap();
    let config = ServerConfig {
        allowed_origins: vec![],
        progress_dir: Some(dir.path().to_path_buf()),
    };
    let app = create_router_with_options(None, config, Some(AdvisorClient::mock()));
    let session_id = create_session(&app, "Marina").await;

    post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "juros" }),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/advice", session_id),
        serde_json::json!({ "concern": "cartão" }),
    )
    .await;

    let raw = std::fs::read_to_string(dir.path().join("Marina_progresso.json")).unwrap();
    let progress: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(progress["nome_usuario"], "Marina");
    assert_eq!(progress["contador_consultas"], 2);
}

#[tokio::test]
async fn test_negotiation_and_glossary_award_points() {
    let app = setup_test_app_with_mock();
    let session_id = create_session(&app, "Nina").await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/negotiation", session_id),
        serde_json::json!({ "creditor": "Banco X", "amount": 1500.0, "days_late": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["degraded"], false);
    assert!(json["text"].as_str().unwrap().contains("Banco X"));

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/glossary", session_id),
        serde_json::json!({ "term": "CDI" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["text"].as_str().unwrap().contains("CDI"));

    // journey 10 + negotiation 15 + glossary 5
    let (_, json) = get(&app, &format!("/api/sessions/{}/progress", session_id)).await;
    assert_eq!(json["points"], 30);
}

#[tokio::test]
async fn test_tip_uses_diagnostic_facts() {
    let app = setup_test_app_with_mock();
    let session_id = create_session(&app, "Otávio").await;

    post(
        &app,
        &format!("/api/sessions/{}/profile/income", session_id),
        serde_json::json!({ "monthly_income": 3000.0 }),
    )
    .await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/tip", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["degraded"], false);
    assert!(!json["text"].as_str().unwrap().is_empty());
}

// ========== Challenges ==========

#[tokio::test]
async fn test_challenge_flow() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Paula").await;

    let (status, challenge) = post(
        &app,
        &format!("/api/sessions/{}/challenges/propose", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!challenge["title"].as_str().unwrap().is_empty());

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/challenges/accept", session_id),
        challenge.clone(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["events"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["event"] == "points_awarded"));

    // Accepting the same challenge again only warns
    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/challenges/accept", session_id),
        challenge,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["events"][0]["event"], "duplicate_challenge");

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/challenges/0/complete", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["events"].as_array().unwrap().iter().any(|e| {
        e["event"] == "achievement_unlocked"
            && e["label"].as_str().unwrap().contains("Primeiro Desafio")
    }));

    let (_, json) = get(&app, &format!("/api/sessions/{}/challenges", session_id)).await;
    assert!(json["active"].as_array().unwrap().is_empty());
    assert_eq!(json["completed"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_complete_missing_challenge_is_404() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Rui").await;

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/challenges/5/complete", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_abandon_challenge() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Sara").await;

    let (_, challenge) = post(
        &app,
        &format!("/api/sessions/{}/challenges/propose", session_id),
        serde_json::json!({}),
    )
    .await;
    post(
        &app,
        &format!("/api/sessions/{}/challenges/accept", session_id),
        challenge,
    )
    .await;

    let (status, abandoned) = delete(
        &app,
        &format!("/api/sessions/{}/challenges/0", session_id),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!abandoned["title"].as_str().unwrap().is_empty());

    let (_, json) = get(&app, &format!("/api/sessions/{}/challenges", session_id)).await;
    assert!(json["active"].as_array().unwrap().is_empty());
    assert!(json["completed"].as_array().unwrap().is_empty());
}

// ========== Education ==========

#[tokio::test]
async fn test_education_catalog() {
    let app = setup_test_app();

    let (status, json) = get(&app, "/api/education/modules").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 3);

    let (status, json) = get(&app, "/api/education/tips").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["title"], "Regra 50-30-20");
}

#[tokio::test]
async fn test_module_open_and_complete() {
    let app = setup_test_app();
    let session_id = create_session(&app, "Tania").await;

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/education/1/open", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Gestão de Dívidas");
    assert!(!json["events"].as_array().unwrap().is_empty());

    // Reopening is a no-op
    let (_, json) = post(
        &app,
        &format!("/api/sessions/{}/education/1/open", session_id),
        serde_json::json!({}),
    )
    .await;
    assert!(json["events"].as_array().unwrap().is_empty());

    let (status, json) = post(
        &app,
        &format!("/api/sessions/{}/education/1/complete", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["events"].as_array().unwrap().iter().any(|e| {
        e["event"] == "achievement_unlocked"
            && e["label"].as_str().unwrap().contains("Gestão de Dívidas")
    }));

    let (status, _) = post(
        &app,
        &format!("/api/sessions/{}/education/9/open", session_id),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
