use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::info;

use crate::api::health::{HealthSnapshot, HealthState};
use crate::api::latency::LatencyStats;
use crate::bindings::{BindingGraph, ComparisonPage, OutputView, OverviewPage, Recomputed};
use crate::error::{AppError, Result};
use crate::state::{
    ComparisonSelection, FactStore, FilterState, OverviewSelection, SelectionOptions,
};
use crate::views::ViewModel;

/// One binding graph per logical page. The mutex makes a selection event and
/// its recomputation atomic with respect to other requests.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<FactStore>,
    pub overview: Arc<Mutex<OverviewPage>>,
    pub comparison: Arc<Mutex<ComparisonPage>>,
    pub health: Arc<HealthState>,
    pub latency: Arc<LatencyStats>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/options", get(get_options))
        .route("/pages/overview", get(get_overview))
        .route("/pages/overview/selection", axum::routing::post(post_overview_selection))
        .route("/pages/comparison", get(get_comparison))
        .route("/pages/comparison/selection", axum::routing::post(post_comparison_selection))
        .route("/health", get(get_health))
        .route("/stats/latency", get(get_stats_latency))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PageResponse<'a, F: Serialize> {
    pub filter: &'a F,
    pub views: &'a BTreeMap<OutputView, ViewModel>,
    /// Outputs rebuilt by the selection that produced this response.
    pub recomputed: Vec<OutputView>,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub p50_ms: Option<f64>,
    pub p95_ms: Option<f64>,
    pub p99_ms: Option<f64>,
    pub sample_count: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_options(State(state): State<ApiState>) -> Json<SelectionOptions> {
    Json(state.store.options())
}

async fn get_overview(State(state): State<ApiState>) -> Result<Json<serde_json::Value>> {
    let page = lock(&state.overview);
    Ok(Json(page_json(&page, &[])?))
}

async fn get_comparison(State(state): State<ApiState>) -> Result<Json<serde_json::Value>> {
    let page = lock(&state.comparison);
    Ok(Json(page_json(&page, &[])?))
}

async fn post_overview_selection(
    State(state): State<ApiState>,
    Json(selection): Json<OverviewSelection>,
) -> Result<Json<serde_json::Value>> {
    if let OverviewSelection::Company(company) = &selection {
        if company.trim().is_empty() {
            return Err(AppError::InvalidSelection("company must not be empty".to_string()));
        }
    }
    info!(page = "overview", ?selection, "Selection event");
    let mut page = lock(&state.overview);
    let recomputed = apply_selection(&state, &mut page, selection)?;
    Ok(Json(page_json(&page, &recomputed)?))
}

async fn post_comparison_selection(
    State(state): State<ApiState>,
    Json(selection): Json<ComparisonSelection>,
) -> Result<Json<serde_json::Value>> {
    info!(page = "comparison", ?selection, "Selection event");
    let mut page = lock(&state.comparison);
    let recomputed = apply_selection(&state, &mut page, selection)?;
    Ok(Json(page_json(&page, &recomputed)?))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthSnapshot> {
    Json(state.health.snapshot())
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let (p50, p95, p99) = state.latency.percentiles();
    let to_ms = |us: Option<u64>| us.map(|v| v as f64 / 1_000.0);
    Json(LatencyResponse {
        p50_ms: to_ms(p50),
        p95_ms: to_ms(p95),
        p99_ms: to_ms(p99),
        sample_count: state.latency.len(),
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn apply_selection<F: FilterState>(
    state: &ApiState,
    page: &mut BindingGraph<F>,
    selection: F::Event,
) -> Result<Vec<OutputView>> {
    let recomputed: Vec<Recomputed> = page.select(selection).inspect_err(|_| {
        state.health.inc_recompute_failures();
    })?;
    for r in &recomputed {
        state.latency.record(r.elapsed);
    }
    state.health.add_recomputations(recomputed.len() as u64);
    Ok(recomputed.into_iter().map(|r| r.output).collect())
}

fn page_json<F: FilterState + Serialize>(
    page: &BindingGraph<F>,
    recomputed: &[OutputView],
) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(PageResponse {
        filter: page.filter(),
        views: page.views(),
        recomputed: recomputed.to_vec(),
    })?)
}

/// A panic while holding the lock leaves the page usable: the next selection
/// rebuilds whatever it touches.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{comparison_page, overview_page};
    use crate::db::fixtures::seeded_pool;
    use crate::db::FactStoreReader;
    use crate::pipeline::derive;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn test_state() -> ApiState {
        let raw = FactStoreReader::new(seeded_pool().await)
            .load_all()
            .await
            .unwrap();
        let store = FactStore::new(derive(raw));
        let health = Arc::new(HealthState::new());
        health.record_load(&store);
        ApiState {
            overview: Arc::new(Mutex::new(overview_page(Arc::clone(&store), None).unwrap())),
            comparison: Arc::new(Mutex::new(comparison_page(Arc::clone(&store)).unwrap())),
            store,
            health,
            latency: Arc::new(LatencyStats::new()),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn overview_page_starts_with_defaults() {
        let app = router(test_state().await);
        let (status, body) = send(app, Request::get("/pages/overview").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["filter"]["company"], "Spirit");
        assert_eq!(body["filter"]["year"], 2023);
        assert_eq!(body["views"]["sankey"]["type"], "sankey");
        assert_eq!(body["views"]["trend"]["type"], "trend");
    }

    #[tokio::test]
    async fn multiple_type_selection_recomputes_trend_only() {
        let state = test_state().await;
        let (status, body) = send(
            router(state.clone()),
            post("/pages/overview/selection", r#"{"input":"multiple_type","value":"ebitda"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["recomputed"], serde_json::json!(["trend"]));
        assert_eq!(body["views"]["trend"]["kind"], "no_data");
        assert_eq!(state.health.snapshot().recomputations, 1);
        assert_eq!(state.latency.len(), 1);
    }

    #[tokio::test]
    async fn single_company_comparison_returns_reminder() {
        let (status, body) = send(
            router(test_state().await),
            post("/pages/comparison/selection", r#"{"input":"companies","value":["JetBlue"]}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["views"]["radar"]["kind"], "insufficient_selection");
        assert_eq!(body["views"]["range"]["kind"], "insufficient_selection");
    }

    #[tokio::test]
    async fn scalar_for_multi_select_is_rejected() {
        let (status, _) = send(
            router(test_state().await),
            post("/pages/comparison/selection", r#"{"input":"companies","value":"JetBlue"}"#),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn health_reports_coercion_warning() {
        let (status, body) = send(
            router(test_state().await),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["coercion_warning"], true);
        assert_eq!(body["financial_facts"], 4);
    }

    #[tokio::test]
    async fn options_list_companies_and_year_bounds() {
        let (_, body) = send(
            router(test_state().await),
            Request::get("/options").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body["overview_companies"], serde_json::json!(["Spirit", "JetBlue"]));
        assert_eq!(body["comparison_years"]["max"], 2023);
        assert_eq!(body["multiple_types"], serde_json::json!(["revenue", "ebitda"]));
    }
}
