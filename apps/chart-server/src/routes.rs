use crate::payload::{parse_request, PayloadShape};
use astro_chart::ephemeris::HouseSystem;
use astro_chart::{ChartAssembler, ChartEngine};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<ChartEngine>,
    default_house_system: HouseSystem,
}

impl AppState {
    pub fn new(engine: ChartEngine, default_house_system: HouseSystem) -> Self {
        Self {
            engine: Arc::new(engine),
            default_house_system,
        }
    }
}

/// Any failure while serving a chart; always reported as a 500
pub struct AppError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/natal-chart", post(natal_chart))
        .with_state(state)
}

async fn natal_chart(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let outcome = compute(&state, &body).await;
    match &outcome {
        Ok(_) => log::info!("POST /natal-chart ok"),
        Err(e) => log::warn!("POST /natal-chart failed: {}", e.0),
    }
    outcome
}

async fn compute(state: &AppState, body: &[u8]) -> Result<Response, AppError> {
    let (shape, request) = parse_request(body, state.default_house_system)?;
    let report = state.engine.compute(&request).await?;
    for warning in &report.warnings {
        log::info!("Chart warning: {}", warning);
    }

    let response = match shape {
        PayloadShape::Structured => Json(ChartAssembler::structured(&report)).into_response(),
        PayloadShape::Flat => Json(ChartAssembler::flat(&report)).into_response(),
    };
    Ok(response)
}
