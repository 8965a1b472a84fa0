// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Numeric data is served as-is; the
// localized endpoints take the display language from `?locale=`, then from
// the `Accept-Language` header, then from the configured default.
//
// While the selected asset has no fresh snapshot (still loading, or the last
// refresh failed) the data endpoints answer 503 with the localized "data
// unavailable" message, the current status and the time of the last good
// snapshot, if one is kept.
//
// CORS is configured permissively for development; restrict the origins
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Query, State},
    http::{header::ACCEPT_LANGUAGE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::analysis::{calculator_message, evaluate_investment, LocalizedReport};
use crate::app_state::AppState;
use crate::i18n::{translate, Locale, MessageKey};
use crate::types::{DataStatus, TrendingAsset};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/assets", get(assets))
        .route("/api/v1/assets/select", post(select_asset))
        .route("/api/v1/indicators", get(indicators))
        .route("/api/v1/analysis", get(analysis))
        .route("/api/v1/calculator", post(calculator))
        .route("/api/v1/errors", get(errors))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Locale resolution
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct LocaleQuery {
    #[serde(default)]
    locale: Option<String>,
}

fn resolve_locale(explicit: Option<&str>, headers: &HeaderMap, state: &AppState) -> Locale {
    if let Some(tag) = explicit.filter(|t| !t.trim().is_empty()) {
        return Locale::from_tag(tag);
    }
    let header_tag = headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|t| t.split(';').next().unwrap_or_default().trim())
        .filter(|t| !t.is_empty() && *t != "*");
    match header_tag {
        Some(tag) => Locale::from_tag(tag),
        None => state.config.read().default_locale,
    }
}

#[derive(Serialize)]
struct UnavailableResponse {
    error: String,
    asset: String,
    status: DataStatus,
    last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

fn unavailable(state: &AppState, locale: Locale) -> Response {
    let body = UnavailableResponse {
        error: translate(locale, MessageKey::DataUnavailable),
        asset: state.selected_asset(),
        status: state.data_status(),
        last_updated: state.latest_snapshot().map(|s| s.computed_at),
    };
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    data_status: DataStatus,
    state_version: u64,
    server_time: i64,
    uptime_secs: u64,
    provider: crate::coingecko::rate_limit::CooldownSnapshot,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let now = chrono::Utc::now().timestamp_millis();
    Json(HealthResponse {
        status: "ok",
        data_status: state.data_status(),
        state_version: state.current_state_version(),
        server_time: now,
        uptime_secs: state.uptime_secs(),
        provider: state.provider_cooldown.snapshot(now),
    })
}

// =============================================================================
// Assets
// =============================================================================

#[derive(Serialize)]
struct AssetsResponse {
    selected: String,
    trending: Vec<TrendingAsset>,
}

async fn assets(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(AssetsResponse {
        selected: state.selected_asset(),
        trending: state.trending.read().clone(),
    })
}

#[derive(Deserialize)]
struct SelectAssetRequest {
    id: String,
}

async fn select_asset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectAssetRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let id = req.id.trim().to_lowercase();
    if id.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Asset id must not be empty" })),
        ));
    }

    let changed = state.select_asset(&id);
    if changed {
        info!(asset = %id, "Asset switched via API");
    }

    Ok(Json(serde_json::json!({
        "selected": id,
        "changed": changed,
    })))
}

// =============================================================================
// Indicators (numeric snapshot)
// =============================================================================

async fn indicators(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Response {
    match state.servable_snapshot() {
        Some(snapshot) => Json(snapshot.as_ref()).into_response(),
        None => unavailable(&state, resolve_locale(q.locale.as_deref(), &headers, &state)),
    }
}

// =============================================================================
// Analysis (localized report)
// =============================================================================

async fn analysis(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LocaleQuery>,
    headers: HeaderMap,
) -> Response {
    let locale = resolve_locale(q.locale.as_deref(), &headers, &state);
    match state.servable_snapshot() {
        Some(snapshot) => Json(LocalizedReport::build(&snapshot, locale)).into_response(),
        None => unavailable(&state, locale),
    }
}

// =============================================================================
// Investment calculator
// =============================================================================

#[derive(Deserialize)]
struct CalculatorRequest {
    #[serde(default)]
    amount: Option<f64>,
    #[serde(default)]
    locale: Option<String>,
}

async fn calculator(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CalculatorRequest>,
) -> Response {
    let locale = resolve_locale(req.locale.as_deref(), &headers, &state);
    let Some(snapshot) = state.servable_snapshot() else {
        return unavailable(&state, locale);
    };

    let outcome = evaluate_investment(req.amount, &snapshot.latest);
    Json(serde_json::json!({
        "asset": snapshot.asset_id,
        "outcome": outcome,
        "message": calculator_message(&outcome, locale),
    }))
    .into_response()
}

// =============================================================================
// Error log
// =============================================================================

async fn errors(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.recent_errors.read().clone())
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::market_data::{DateStyle, PriceSeries};
    use crate::runtime_config::TrackerConfig;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn state_with_snapshot(prices: &[f64]) -> Arc<AppState> {
        let state = Arc::new(AppState::new(TrackerConfig::default()));
        let series = PriceSeries::from_pairs(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| (1_709_596_800_000 + i as i64 * 86_400_000, p)),
        );
        state.publish_snapshot(analyze("polkadot", &series, DateStyle::MonthFirst));
        state
    }

    async fn call(state: Arc<AppState>, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let resp = router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_status() {
        let state = Arc::new(AppState::new(TrackerConfig::default()));
        let (status, body) = call(state, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["data_status"]["state"], "loading");
        assert_eq!(body["provider"]["cooling_down"], false);
    }

    #[tokio::test]
    async fn analysis_without_data_is_unavailable() {
        let state = Arc::new(AppState::new(TrackerConfig::default()));
        let (status, body) = call(state, get("/api/v1/analysis?locale=es")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], translate(Locale::Es, MessageKey::DataUnavailable));
        assert_eq!(body["asset"], "polkadot");
    }

    #[tokio::test]
    async fn failed_refresh_hides_stale_snapshot() {
        let prices: Vec<f64> = (1..=90).map(|x| x as f64).collect();
        let state = state_with_snapshot(&prices);
        state.mark_unavailable("polkadot", "timeout");

        let (status, body) = call(state.clone(), get("/api/v1/analysis?locale=es")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], translate(Locale::Es, MessageKey::DataUnavailable));
        assert_eq!(body["status"]["state"], "unavailable");
        assert_eq!(body["status"]["reason"], "timeout");
        assert!(body["last_updated"].is_string());

        let (status, _) = call(state.clone(), get("/api/v1/indicators")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = call(
            state,
            post_json("/api/v1/calculator", serde_json::json!({ "amount": 100.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn analysis_is_localized() {
        let prices: Vec<f64> = (1..=90).map(|x| x as f64).collect();
        let state = state_with_snapshot(&prices);

        let (status, body) = call(state.clone(), get("/api/v1/analysis?locale=es")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["locale"], "es");
        assert_eq!(body["summary"][0]["interpretation"], "Sobrecomprado");

        let req = Request::builder()
            .uri("/api/v1/analysis")
            .header("accept-language", "en-US,en;q=0.9")
            .body(Body::empty())
            .unwrap();
        let (_, body) = call(state, req).await;
        assert_eq!(body["locale"], "en");
        assert_eq!(body["summary"][0]["interpretation"], "Overbought");
        let labels = body["charts"]["rsi"]["labels"].as_array().unwrap().len();
        let values = body["charts"]["rsi"]["values"].as_array().unwrap().len();
        assert_eq!(labels, values);
        assert_eq!(values, 76);
    }

    #[tokio::test]
    async fn indicators_serve_numeric_snapshot() {
        let prices: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let state = state_with_snapshot(&prices);
        let (status, body) = call(state, get("/api/v1/indicators")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["points"], 30);
        assert_eq!(body["indicators"]["sma20"].as_array().unwrap().len(), 11);
        assert_eq!(body["indicators"]["rsi"][0], 100.0);
        assert_eq!(body["interpretation"]["rsi_zone"], "OVERBOUGHT");
    }

    #[tokio::test]
    async fn select_asset_switches_and_rejects_empty_ids() {
        let state = state_with_snapshot(&[1.0, 2.0, 3.0]);

        let (status, body) = call(
            state.clone(),
            post_json("/api/v1/assets/select", serde_json::json!({ "id": " Solana " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["selected"], "solana");
        assert_eq!(body["changed"], true);
        assert_eq!(state.selected_asset(), "solana");
        assert!(state.latest_snapshot().is_none());

        let (status, _) = call(
            state,
            post_json("/api/v1/assets/select", serde_json::json!({ "id": "  " })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn calculator_evaluates_amount() {
        let prices: Vec<f64> = (1..=90).rev().map(|x| x as f64).collect();
        let state = state_with_snapshot(&prices);

        // Falling market: RSI 0 and price below SMA(20).
        let (status, body) = call(
            state.clone(),
            post_json("/api/v1/calculator", serde_json::json!({ "amount": 100.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"]["outcome"], "INVEST");
        assert_eq!(body["message"]["result"], "Today is a good day to invest 100 USD!");
        assert_eq!(body["message"]["optimal_price"], "Optimal purchase price: 1.0000");

        let (_, body) = call(
            state,
            post_json("/api/v1/calculator", serde_json::json!({ "amount": -5, "locale": "es" })),
        )
        .await;
        assert_eq!(body["outcome"]["outcome"], "INVALID_AMOUNT");
        assert_eq!(body["message"]["result"], "Por favor, introduce una cantidad válida.");
    }

    #[tokio::test]
    async fn assets_and_errors() {
        let state = Arc::new(AppState::new(TrackerConfig::default()));
        state.set_trending(vec![TrendingAsset {
            id: "pepe".into(),
            name: "Pepe".into(),
        }]);
        state.mark_unavailable("polkadot", "timeout");

        let (_, body) = call(state.clone(), get("/api/v1/assets")).await;
        assert_eq!(body["selected"], "polkadot");
        assert_eq!(body["trending"][0]["id"], "pepe");

        let (_, body) = call(state, get("/api/v1/errors")).await;
        assert_eq!(body[0]["message"], "timeout");
    }
}
