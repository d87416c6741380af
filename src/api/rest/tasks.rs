use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::task::DeliveryTask;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/tasks", post(create_task))
}

/// Validates the body and echoes the task back. Nothing is stored.
async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DeliveryTask>, AppError> {
    let Json(raw) = payload.map_err(|err| AppError::BadRequest(err.body_text()))?;

    let task = DeliveryTask::validate(&raw).inspect_err(|err| {
        state.metrics.record_rejection(err);
        warn!(violations = err.len(), "delivery task rejected");
    })?;

    let distance_km = task.distance_km();
    state.metrics.tasks_validated_total.with_label_values(&["accepted"]).inc();
    state
        .metrics
        .task_distance_km
        .with_label_values(&[task.status().as_str()])
        .observe(distance_km);

    info!(task_id = %task.id(), distance_km, status = %task.status(), "delivery task received");

    Ok(Json(task))
}
