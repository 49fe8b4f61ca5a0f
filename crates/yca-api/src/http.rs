use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;
use yca_model::{TaskId, TaskQuery, TaskStatus, TaskStatusView, YoutubeVideo};

use crate::{error::ApiError, handler::ApiHandler};

const BANNER: &str = "Youtube Comments Analyzer!";

/// HTTP API service builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
    cors: Option<CorsLayer>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    /// Create new HTTP API with the given handler.
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            cors: None,
        }
    }

    /// Apply a CORS policy to every route.
    pub fn with_cors(mut self, cors: CorsLayer) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Build axum router with mounted endpoints.
    ///
    /// Routes:
    /// - GET /                  - Service banner
    /// - POST /analyze          - Queue a video analysis
    /// - GET /tasks             - List tasks (filter by query params)
    /// - GET /tasks/{task_id}   - Get task status
    /// - GET /status/{task_id}  - Same as above, kept for existing clients
    pub fn router(self) -> Router {
        let router = Router::new()
            .route("/", get(root))
            .route("/analyze", post(submit_analysis::<H>))
            .route("/tasks", get(list_tasks::<H>))
            .route("/tasks/{task_id}", get(get_task_status::<H>))
            .route("/status/{task_id}", get(get_task_status::<H>))
            .with_state(self.handler);

        let router = match self.cors {
            Some(cors) => router.layer(cors),
            None => router,
        };
        router.layer(TraceLayer::new_for_http())
    }
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
struct BannerResponse {
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmitAnalysisResponse {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct ListTasksParams {
    status: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ListTasksResponse {
    tasks: Vec<TaskStatusView>,
    total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
async fn root() -> impl IntoResponse {
    Json(BannerResponse {
        message: BANNER.to_string(),
    })
}

/// POST /analyze
///
/// Body: `{"url": "<youtube video url>"}`. Answers 202 with the task id;
/// the analysis itself runs in the background.
async fn submit_analysis<H>(
    State(handler): State<Arc<H>>,
    payload: Result<Json<YoutubeVideo>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let Json(video) = payload.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    debug!(url = %video.url, "submitting analysis");
    let task_id = handler.submit_analysis(video).await?;

    let response = SubmitAnalysisResponse {
        task_id: task_id.to_string(),
    };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /tasks/{task_id}
async fn get_task_status<H>(
    State(handler): State<Arc<H>>,
    Path(task_id): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let task_id = TaskId::from(task_id);
    let view = handler.get_task_status(&task_id).await?;
    debug!(%task_id, status = %view.status, "task status read");

    Ok(Json(view))
}

/// GET /tasks
///
/// Query params (all optional, combinable):
/// - ?status=running - filter by status
/// - ?limit=50       - max items per page (default 100, max 1000)
/// - ?offset=0       - pagination offset (default 0)
async fn list_tasks<H>(
    State(handler): State<Arc<H>>,
    params: Result<Query<ListTasksParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    H: ApiHandler,
{
    let Query(params) = params.map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
    let mut query = TaskQuery::new();

    if let Some(status) = params.status {
        query = query.with_status(parse_status(&status)?);
    }
    if let Some(limit) = params.limit {
        query = query.with_limit(limit);
    }
    if let Some(offset) = params.offset {
        query = query.with_offset(offset);
    }

    let page = handler.query_tasks(query).await?;
    debug!(count = page.items.len(), total = page.total, "tasks listed");

    Ok(Json(ListTasksResponse {
        tasks: page.items,
        total: page.total,
    }))
}

fn parse_status(s: &str) -> Result<TaskStatus, ApiError> {
    s.trim()
        .to_lowercase()
        .parse()
        .map_err(|e: yca_model::ModelError| ApiError::InvalidRequest(e.to_string()))
}
