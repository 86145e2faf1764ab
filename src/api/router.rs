//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost):
//! 1. CORS → 2. Cache-Control → 3. Session resolver → 4. Audit logger

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer
/// of the session-scoped routes). Endpoint handlers use `State<ApiContext>`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // Session-scoped routes: layers apply bottom (innermost) to top:
    //   Extension → Session resolver → Audit → Handler
    let scoped = Router::new()
        .route("/sessions/current", delete(endpoints::sessions::end))
        .route(
            "/navigation",
            get(endpoints::navigation::bar).post(endpoints::navigation::navigate),
        )
        .route("/view", get(endpoints::navigation::view))
        .route("/profile", post(endpoints::profile::save))
        .route("/symptoms/check", post(endpoints::symptoms::check))
        .route("/chat/send", post(endpoints::chat::send))
        .route("/treatments/plan", post(endpoints::treatments::plan))
        .route("/conditions/glucose", post(endpoints::conditions::glucose))
        .route(
            "/conditions/blood-pressure",
            post(endpoints::conditions::blood_pressure),
        )
        .route("/conditions/asthma", post(endpoints::conditions::asthma))
        .route("/reports/generate", post(endpoints::reports::generate))
        .route("/reports/summary", post(endpoints::reports::summary))
        .route("/debug/state", get(endpoints::debug::state))
        .with_state(ctx.clone())
        .route_layer(axum::middleware::from_fn(middleware::audit::log_access))
        .route_layer(axum::middleware::from_fn(middleware::session::require_session))
        .layer(axum::Extension(ctx.clone()));

    // Open routes (no session required)
    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/sessions", post(endpoints::sessions::create))
        .with_state(ctx)
        .route_layer(axum::middleware::from_fn(middleware::audit::log_access));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-session-id"),
        ]);

    Router::new()
        .nest("/api", scoped.merge(open))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::types::SESSION_HEADER;
    use crate::llm::{LlmError, MockLlmClient};

    const SYMPTOMS_JSON: &str = r#"{"possible_conditions": [{"name": "Migraine", "likelihood_percent": 70}], "next_steps": ["Rest"]}"#;

    fn core_with(client: MockLlmClient) -> Arc<CoreState> {
        Arc::new(CoreState::new(Arc::new(client)))
    }

    fn test_core() -> Arc<CoreState> {
        core_with(MockLlmClient::new("Stay active."))
    }

    fn make_request(method: &str, uri: &str, session: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = session {
            builder = builder.header(SESSION_HEADER, id);
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(make_request("POST", "/api/sessions", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = response_json(response).await;
        json["session_id"].as_str().unwrap().to_string()
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        session: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(make_request(method, uri, Some(session), body))
            .await
            .unwrap();
        let status = response.status();
        (status, response_json(response).await)
    }

    #[tokio::test]
    async fn health_needs_no_session() {
        let app = api_router(test_core());
        let response = app
            .oneshot(make_request("GET", "/api/health", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("Cache-Control").unwrap(), "no-store");
        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model_id"], "mock");
    }

    #[tokio::test]
    async fn missing_session_header_returns_401() {
        let app = api_router(test_core());
        let response = app
            .oneshot(make_request("GET", "/api/view", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "SESSION_REQUIRED");
    }

    #[tokio::test]
    async fn unknown_or_malformed_session_returns_404() {
        let app = api_router(test_core());
        let unknown = uuid::Uuid::new_v4().to_string();
        for id in [unknown.as_str(), "not-a-uuid"] {
            let (status, json) = call(&app, "GET", "/api/view", id, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(json["error"]["code"], "SESSION_NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn new_session_starts_on_home() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) = call(&app, "GET", "/api/view", &id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["section"], "home");

        let (_, nav) = call(&app, "GET", "/api/navigation", &id, None).await;
        assert_eq!(nav["current_section"], "home");
        assert_eq!(nav["items"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn navigation_to_current_section_is_noop() {
        let app = api_router(test_core());
        let id = new_session(&app).await;
        let body = r#"{"section":"reports"}"#;

        let (_, first) = call(&app, "POST", "/api/navigation", &id, Some(body)).await;
        assert_eq!(first["changed"], true);
        let (_, second) = call(&app, "POST", "/api/navigation", &id, Some(body)).await;
        assert_eq!(second["changed"], false);

        let (_, view) = call(&app, "GET", "/api/view", &id, None).await;
        assert_eq!(view["section"], "reports");
    }

    #[tokio::test]
    async fn profile_save_returns_bmi_and_tip() {
        let app = api_router(test_core());
        let id = new_session(&app).await;
        let body = r#"{"name":"Ada","age":30,"gender":"Female","height_cm":180,"weight_kg":81}"#;

        let (status, json) = call(&app, "POST", "/api/profile", &id, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["bmi"], "25.0");
        assert_eq!(json["tip"]["status"], "resolved");
        assert_eq!(json["tip"]["text"], "Stay active.");
    }

    #[tokio::test]
    async fn profile_out_of_range_returns_400() {
        let app = api_router(test_core());
        let id = new_session(&app).await;
        let body = r#"{"name":"Ada","age":121,"gender":"Female","height_cm":180,"weight_kg":81}"#;

        let (status, json) = call(&app, "POST", "/api/profile", &id, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn oversized_numbers_return_structured_400() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let body = r#"{"name":"Ada","age":300,"gender":"Female","height_cm":180,"weight_kg":81}"#;
        let (status, json) = call(&app, "POST", "/api/profile", &id, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (status, json) = call(
            &app,
            "POST",
            "/api/conditions/glucose",
            &id,
            Some(r#"{"mg_dl":70000}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");

        let (_, debug) = call(&app, "GET", "/api/debug/state", &id, None).await;
        assert!(debug["state"]["glucose_log"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_returns_structured_400() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) =
            call(&app, "POST", "/api/chat/send", &id, Some(r#"{"message":"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn symptom_check_round_trip() {
        let app = api_router(core_with(MockLlmClient::new(SYMPTOMS_JSON)));
        let id = new_session(&app).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/symptoms/check",
            &id,
            Some(r#"{"symptoms":"headache"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["history_len"], 1);
        assert_eq!(json["record"]["response"]["possible_conditions"][0]["name"], "Migraine");
    }

    #[tokio::test]
    async fn malformed_ai_output_returns_502() {
        let app = api_router(core_with(MockLlmClient::new("I think it's a cold.")));
        let id = new_session(&app).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/symptoms/check",
            &id,
            Some(r#"{"symptoms":"cough"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "INVALID_AI_RESPONSE");
        assert_eq!(json["error"]["message"], "Invalid response format from AI.");
    }

    #[tokio::test]
    async fn chat_rejects_empty_message() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, _) = call(&app, "POST", "/api/chat/send", &id, Some(r#"{"message":""}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_llm_failure_returns_502() {
        let app = api_router(core_with(MockLlmClient::failing(LlmError::Connection(
            "https://example.com".into(),
        ))));
        let id = new_session(&app).await;

        let (status, json) =
            call(&app, "POST", "/api/chat/send", &id, Some(r#"{"message":"hi"}"#)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "LLM_UNAVAILABLE");

        let (_, debug) = call(&app, "GET", "/api/debug/state", &id, None).await;
        assert_eq!(debug["state"]["messages"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn glucose_log_falls_back_when_llm_fails() {
        let app = api_router(core_with(MockLlmClient::failing(LlmError::EmptyResponse)));
        let id = new_session(&app).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/conditions/glucose",
            &id,
            Some(r#"{"mg_dl":250}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["confirmation"], "Logged: 250 mg/dL");
        assert_eq!(json["advice"], "AI is currently unavailable for advice.");
        assert_eq!(json["advice_source"], "fallback");
    }

    #[tokio::test]
    async fn blood_pressure_and_asthma_routes() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/conditions/blood-pressure",
            &id,
            Some(r#"{"systolic":120,"diastolic":80}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["confirmation"], "Logged: 120/80 mmHg");

        let (status, _) = call(
            &app,
            "POST",
            "/api/conditions/asthma",
            &id,
            Some(r#"{"triggers":"pollen","severity":11}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_generation_validates_window() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, _) =
            call(&app, "POST", "/api/reports/generate", &id, Some(r#"{"days":31}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) =
            call(&app, "POST", "/api/reports/generate", &id, Some(r#"{"days":10}"#)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metrics"]["dates"].as_array().unwrap().len(), 10);
    }

    #[tokio::test]
    async fn report_generation_rejects_non_numeric_window() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        for body in [r#"{"days":-5}"#, r#"{"days":"thirty"}"#] {
            let (status, json) =
                call(&app, "POST", "/api/reports/generate", &id, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error"]["code"], "BAD_REQUEST");
        }

        let (_, debug) = call(&app, "GET", "/api/debug/state", &id, None).await;
        assert_eq!(debug["state"]["generated_data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn asthma_episode_without_triggers_is_logged() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) = call(
            &app,
            "POST",
            "/api/conditions/asthma",
            &id,
            Some(r#"{"triggers":"","severity":5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["entries"], 1);
    }

    #[tokio::test]
    async fn report_generation_defaults_to_seven_days() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) = call(&app, "POST", "/api/reports/generate", &id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["metrics"]["heart_rate"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn report_summary_returns_insights() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) = call(&app, "POST", "/api/reports/summary", &id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["insights"], "Stay active.");
        assert!(json["stats_table"].as_str().unwrap().contains("mean"));
    }

    #[tokio::test]
    async fn debug_state_shows_every_key() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let (status, json) = call(&app, "GET", "/api/debug/state", &id, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["session_id"], id);
        for key in ["current_section", "messages", "symptoms_history", "generated_data"] {
            assert!(json["state"].get(key).is_some(), "missing key {key}");
        }
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let app = api_router(test_core());
        let a = new_session(&app).await;
        let b = new_session(&app).await;

        call(&app, "POST", "/api/navigation", &a, Some(r#"{"section":"chat"}"#)).await;

        let (_, view_b) = call(&app, "GET", "/api/view", &b, None).await;
        assert_eq!(view_b["section"], "home");
    }

    #[tokio::test]
    async fn ended_session_is_gone() {
        let app = api_router(test_core());
        let id = new_session(&app).await;

        let response = app
            .clone()
            .oneshot(make_request("DELETE", "/api/sessions/current", Some(&id), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, _) = call(&app, "GET", "/api/view", &id, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let app = api_router(test_core());
        let response = app
            .oneshot(make_request("GET", "/api/billing", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
