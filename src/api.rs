use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::dashboard::{self, CategoryStance, DailyStance, HeatmapLaw};
use crate::engine::{RankedArticle, ScoreEngine};
use crate::error::ScoreError;
use crate::graph::AttentionGraphNode;
use crate::store::EventStore;

pub type SharedStore = Arc<dyn EventStore>;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoreEngine<SharedStore>>,
}

impl AppState {
    pub fn new(engine: ScoreEngine<SharedStore>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/dashboard/legal-top5", get(legal_top))
        .route("/api/dashboard/network-graph", get(network_graph))
        .route("/api/dashboard/heatmap", get(heatmap))
        .route("/api/dashboard/stance-area", get(stance_area))
        .route("/api/dashboard/social-bar", get(social_bar))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: NaiveDate,
    end: NaiveDate,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScoreError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            ScoreError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct NetworkGraphResponse {
    nodes: Vec<AttentionGraphNode>,
}

#[derive(Serialize)]
struct HeatmapResponse {
    laws: Vec<HeatmapLaw>,
}

#[derive(Serialize)]
struct DataResponse<T> {
    data: Vec<T>,
}

async fn legal_top(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<Vec<RankedArticle>>, ScoreError> {
    let limit = q
        .limit
        .unwrap_or(state.engine.config().ranking.top_n)
        .max(1);
    let ranked = state.engine.rank_top_articles(q.start, q.end, limit).await?;
    Ok(Json(ranked))
}

async fn network_graph(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<NetworkGraphResponse>, ScoreError> {
    let nodes = state.engine.build_attention_graph(q.start, q.end).await?;
    Ok(Json(NetworkGraphResponse { nodes }))
}

async fn heatmap(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<HeatmapResponse>, ScoreError> {
    let laws = dashboard::heatmap(state.engine.store(), q.start, q.end).await?;
    Ok(Json(HeatmapResponse { laws }))
}

async fn stance_area(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<DataResponse<DailyStance>>, ScoreError> {
    let data = dashboard::stance_area(state.engine.store(), q.start, q.end).await?;
    Ok(Json(DataResponse { data }))
}

async fn social_bar(
    State(state): State<AppState>,
    Query(q): Query<RangeQuery>,
) -> Result<Json<DataResponse<CategoryStance>>, ScoreError> {
    let data = dashboard::social_bar(state.engine.store(), q.start, q.end).await?;
    Ok(Json(DataResponse { data }))
}
