// Dashboard web server
// Serves one pre-rendered figure and its table; no state changes after startup

use crate::chart::{ChartSpec, Figure};
use crate::counts::{LeadCountRow, YearlyLeadCounts};
use crate::error::Result;
use crate::pipeline::{PipelineOutput, PipelineStats};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const INDEX_HTML: &str = include_str!("../web/index.html");

/// Application context, built once before serving and dropped on shutdown
#[derive(Debug)]
pub struct AppContext {
    figure: Figure,
    counts: YearlyLeadCounts,
    csv: String,
    stats: PipelineStats,
}

impl AppContext {
    pub fn new(output: PipelineOutput, spec: &ChartSpec) -> Result<Self> {
        let figure = Figure::line(&output.counts, spec)?;
        let csv = output.counts.to_csv()?;

        Ok(AppContext {
            figure,
            counts: output.counts,
            csv,
            stats: output.stats,
        })
    }

    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    pub fn counts(&self) -> &YearlyLeadCounts {
        &self.counts
    }
}

type SharedContext = Arc<AppContext>;

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET / - dashboard page
async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// GET /api/health
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/figure - plotly {data, layout}
async fn get_figure(State(ctx): State<SharedContext>) -> impl IntoResponse {
    Json(ctx.figure.clone())
}

/// GET /api/lead-counts - table rows
async fn get_lead_counts(State(ctx): State<SharedContext>) -> impl IntoResponse {
    let rows: Vec<LeadCountRow> = ctx.counts.rows().to_vec();
    Json(ApiResponse::ok(rows))
}

/// GET /api/lead-counts.csv
async fn get_lead_counts_csv(State(ctx): State<SharedContext>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        ctx.csv.clone(),
    )
}

/// GET /api/stats - row counts from the pipeline run
async fn get_stats(State(ctx): State<SharedContext>) -> impl IntoResponse {
    Json(ApiResponse::ok(ctx.stats))
}

pub fn router(ctx: AppContext) -> Router {
    let state: SharedContext = Arc::new(ctx);

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/figure", get(get_figure))
        .route("/lead-counts", get(get_lead_counts))
        .route("/lead-counts.csv", get(get_lead_counts_csv))
        .route("/stats", get(get_stats))
        .with_state(state);

    Router::new()
        .route("/", get(serve_index))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}

/// Bind, serve until Ctrl+C, then release the context
pub async fn serve(ctx: AppContext, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(ctx);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("dashboard running on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LeadCountPipeline;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn context() -> AppContext {
        let output = LeadCountPipeline::run_from_readers(
            "id,game,gender,relevance\n1,G1,Female,PA\n2,G2,Male,PA\n3,G2,Custom,PA\n".as_bytes(),
            "game_id,release\nG1,Jan-14\nG2,Feb-16\n".as_bytes(),
            "id\n1\n2\n3\n".as_bytes(),
            "year\n2014\n".as_bytes(),
        )
        .unwrap();

        AppContext::new(output, &ChartSpec::lead_counts()).unwrap()
    }

    async fn get_body(uri: &str) -> (StatusCode, String) {
        let response = router(context())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_context_holds_figure_and_table() {
        let ctx = context();
        assert_eq!(ctx.counts().years(), vec![2014, 2015, 2016]);
        assert_eq!(ctx.figure().y_max(), 2);
    }

    #[tokio::test]
    async fn test_index_page() {
        let (status, body) = get_body("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Video Game Character Analysis"));
    }

    #[tokio::test]
    async fn test_figure_endpoint() {
        let (status, body) = get_body("/api/figure").await;
        assert_eq!(status, StatusCode::OK);

        let figure: Figure = serde_json::from_str(&body).unwrap();
        assert_eq!(figure.data.len(), 3);
        assert_eq!(figure.data[2].y, vec![0, 0, 1]);
    }

    #[tokio::test]
    async fn test_lead_counts_endpoints() {
        let (status, body) = get_body("/api/lead-counts").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][1]["year"], 2015);
        assert_eq!(json["data"][1]["female_lead_count"], 0);

        let (status, csv) = get_body("/api/lead-counts.csv").await;
        assert_eq!(status, StatusCode::OK);
        assert!(csv.starts_with("year,female_lead_count,male_lead_count,custom_lead_count\n2014,1,0,0\n"));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, body) = get_body("/api/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "OK");
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let (status, body) = get_body("/api/stats").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["data"]["characters"], 3);
        assert_eq!(json["data"]["merged"], 3);
        assert_eq!(json["data"]["developers"], 1);
        assert_eq!(json["data"]["dropped_by_game_join"], 0);
        assert_eq!(json["data"]["years"], 3);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (status, _) = get_body("/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
