use axum::{Json, Router, extract::State, http::StatusCode, response::{Html, IntoResponse, Response}, routing::{get, post}};
use include_dir::{include_dir, Dir};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};

use crate::{error::AppResult, gemini::CompletionClient, models::{GenerationState, ProductInput, PromptSet}, pipeline::{GenerationSlot, PipelineOptions}};

static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

#[derive(Clone)]
pub struct AppState {
    pub slot: Arc<GenerationSlot>,
    pub gemini: Arc<dyn CompletionClient>,
    pub options: Arc<PipelineOptions>,
}

impl AppState {
    pub fn new(gemini: Arc<dyn CompletionClient>, options: PipelineOptions) -> Self {
        Self { slot: Arc::default(), gemini, options: Arc::new(options) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/prompts", post(generate_prompts))
        .route("/api/prompts/latest", get(latest_prompts))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn index() -> Response {
    match STATIC_DIR.get_file("index.html").and_then(|f| f.contents_utf8()) {
        Some(page) => Html(page).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "demoMode": state.gemini.is_demo(),
    }))
}

pub async fn generate_prompts(State(state): State<AppState>, Json(body): Json<ProductInput>) -> AppResult<Json<PromptSet>> {
    tracing::info!("🚀 Generating prompts for product: {}", body.product_name);
    let set = state.slot.submit(state.gemini.as_ref(), &body, &state.options).await?;
    tracing::info!("✅ Prompt set {} ready with {} variations", set.id, set.prompts.len());
    Ok(Json(set))
}

pub async fn latest_prompts(State(state): State<AppState>) -> Json<GenerationState> {
    let snapshot = state.slot.snapshot();
    tracing::debug!(prompts = snapshot.prompts().len(), error = ?snapshot.error(), "Serving latest result slot");
    Json(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::{garrafa, options, StubClient, FOUR};
    use crate::pipeline::{GENERATION_FAILED_MESSAGE, VALIDATION_MESSAGE};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with(stub: Arc<StubClient>) -> Router {
        router(AppState::new(stub, options()))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn post_returns_four_prompts() {
        let stub = Arc::new(StubClient::ok(FOUR));
        let app = app_with(stub.clone());
        let resp = app.oneshot(post_json("/api/prompts", serde_json::to_value(garrafa()).unwrap())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["prompts"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["prompts"][3]["strategy"], "Detailed Demo");
        assert!(json["prompts"][0]["fullPrompt"].as_str().unwrap().starts_with("CHARACTER:"));
        assert!(json["id"].is_string());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn missing_environment_is_rejected_without_remote_call() {
        let stub = Arc::new(StubClient::ok(FOUR));
        let app = app_with(stub.clone());
        let body = json!({"productName": "Garrafa", "features": "Inox", "environment": ""});
        let resp = app.oneshot(post_json("/api/prompts", body)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["error"], VALIDATION_MESSAGE);
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn remote_failure_yields_generic_message_and_failed_slot() {
        let stub = Arc::new(StubClient::failing("quota exceeded"));
        let state = AppState::new(stub, options());
        let app = router(state.clone());
        let resp = app.clone().oneshot(post_json("/api/prompts", serde_json::to_value(garrafa()).unwrap())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(resp).await;
        assert_eq!(json["error"], GENERATION_FAILED_MESSAGE);

        let latest = body_json(app.oneshot(get_req("/api/prompts/latest")).await.unwrap()).await;
        assert_eq!(latest["state"], "failed");
        assert_eq!(latest["message"], GENERATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn submission_while_in_flight_conflicts() {
        let stub = Arc::new(StubClient::ok(FOUR));
        let state = AppState::new(stub.clone(), options());
        let _pending = state.slot.begin().unwrap();
        let resp = router(state.clone()).oneshot(post_json("/api/prompts", serde_json::to_value(garrafa()).unwrap())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn latest_starts_idle() {
        let app = app_with(Arc::new(StubClient::ok(FOUR)));
        let json = body_json(app.oneshot(get_req("/api/prompts/latest")).await.unwrap()).await;
        assert_eq!(json, json!({"state": "idle"}));
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let app = app_with(Arc::new(StubClient::ok(FOUR)));
        let resp = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("/api/prompts"));
    }

    #[tokio::test]
    async fn health_reports_mode() {
        let app = app_with(Arc::new(StubClient::ok(FOUR)));
        let json = body_json(app.oneshot(get_req("/health")).await.unwrap()).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["demoMode"], false);
    }
}
