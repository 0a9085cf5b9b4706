mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod health;
    pub mod jobs;
    pub mod score;
    pub mod solve;
    pub mod validate;
}

use axum::{
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::solve::solve,
            routes::jobs::status,
            routes::jobs::result,
            routes::validate::validate_handler,
            routes::score::score,
        ),
        components(schemas(
            types::Instance, types::PreferenceEntry, types::ConstraintProfile,
            types::SolveParams, types::SolveEnvelope, types::ScenarioRequest,
            types::SolveResult, types::SelectedAssignment, types::SolverStatus,
            types::PersonId, types::CourseId, types::SiteId,
            jobs::JobId, jobs::JobStatus, jobs::ScenarioReport, jobs::ProfileOutcome,
            routes::validate::ValidationReport,
            routes::solve::JobCreated,
            routes::score::ScoreIn,
            routes::score::ScoreOut
        )),
        tags(
            (name = "siteassign", description = "Course/site assignment API")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let app_state = state::AppState::new_default();

    let app = Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/solve", post(routes::solve::solve))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/score", post(routes::score::score))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack())
        .with_state(app_state);

    let port = std::env::var("SITEASSIGN__SERVER__PORT").unwrap_or_else(|_| "8080".into());
    let addr: std::net::SocketAddr = format!("0.0.0.0:{}", port)
        .parse()
        .expect("invalid listen addr");
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
