use axum::{
    extract::State,
    routing::{get, post},
    Json,
};
use serde_json::json;
use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use tower_http::services::ServeFile;

use maint_predictor::config::{AppConfig, InputMode};
use maint_predictor::error::AppError;
use maint_predictor::inputs::FIELDS;
use maint_predictor::model::Engine;
use maint_predictor::types::{PredictOut, StatusOut};
use maint_predictor::{pipeline, report};

// ---------- Server state ----------

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
    input_mode: InputMode,
    analysis_delay: Duration,
}

// ---------- Handlers ----------

async fn status(State(state): State<AppState>) -> Json<StatusOut> {
    Json(StatusOut {
        model_loaded: state.engine.is_live(),
        mode: state.input_mode.as_str(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn schema(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "mode": state.input_mode.as_str(),
        "fields": FIELDS,
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<PredictOut>, AppError> {
    let features = state.input_mode.collect(body)?;

    // Spinner delay for perceived responsiveness on the form
    if !state.analysis_delay.is_zero() {
        tokio::time::sleep(state.analysis_delay).await;
    }

    let prediction = pipeline::run(&state.engine, &features)?;

    let now_ms = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as i64;
    Ok(Json(PredictOut {
        ts_ms: now_ms,
        priority: prediction.priority,
        confidence: prediction.confidence,
        recommendation: prediction.priority.recommendation(),
        risk_score: prediction.priority.risk_score(),
        demo_mode: prediction.demo,
        radar: report::radar_profile(&features),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = AppConfig::from_env();
    let engine = Engine::load(&cfg);
    if !engine.is_live() {
        tracing::warn!("serving randomized demo predictions until restart");
    }

    let state = AppState {
        engine: Arc::new(engine),
        input_mode: cfg.input_mode,
        analysis_delay: Duration::from_millis(cfg.analysis_delay_ms),
    };

    let app = axum::Router::new()
        .route_service("/", ServeFile::new(format!("{}/index.html", cfg.assets_dir)))
        .route("/api/status", get(status))
        .route("/api/schema", get(schema))
        .route("/api/predict", post(predict))
        .with_state(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("listening on {} ({} input mode)", addr, cfg.input_mode.as_str());
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
