//! API Request Handlers

use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use super::types::*;
use crate::core::estimator::DomainEstimator;
use crate::models::config::AppraiserConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::EstimationResult;
use crate::storage::InMemoryHistory;

type HandlerError = (StatusCode, Json<ApiResponse<()>>);

/// Shared application state
pub struct AppState {
    pub estimator: Arc<DomainEstimator>,
    pub history: Arc<InMemoryHistory>,
    pub start_time: Instant,
}

impl AppState {
    /// Estimator and history built from `config`, with history recording on
    pub fn new(config: &AppraiserConfig) -> AppResult<Self> {
        let history = Arc::new(InMemoryHistory::new(config.history_capacity));
        let estimator = DomainEstimator::from_config(config)?.with_history(history.clone());
        Ok(Self::from_parts(Arc::new(estimator), history))
    }

    pub fn from_parts(estimator: Arc<DomainEstimator>, history: Arc<InMemoryHistory>) -> Self {
        Self {
            estimator,
            history,
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn error_response(err: &AppError, start: Instant) -> HandlerError {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ApiResponse::error(ApiError::from(err), elapsed_ms(start))),
    )
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        cache: state.estimator.cache().stats(),
    };

    Json(ApiResponse::success(data, elapsed_ms(start)))
}

// ============================================
// Estimate
// ============================================

pub async fn estimate_domain(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<ApiResponse<EstimationResult>>, HandlerError> {
    let start = Instant::now();

    if req.domain.trim().is_empty() {
        return Err(error_response(
            &AppError::bad_request("domain cannot be empty"),
            start,
        ));
    }

    match state.estimator.estimate(&req.domain).await {
        Ok(result) => Ok(Json(ApiResponse::success(result, elapsed_ms(start)))),
        Err(e) => {
            warn!("❌ Estimate failed for {:?}: {}", req.domain, e);
            Err(error_response(&e, start))
        }
    }
}

// ============================================
// History
// ============================================

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryData>>, HandlerError> {
    let start = Instant::now();

    let records = state
        .history
        .query(query.domain.as_deref(), query.limit)
        .map_err(|e| error_response(&e, start))?;

    let data = HistoryData {
        count: records.len(),
        records,
    };
    Ok(Json(ApiResponse::success(data, elapsed_ms(start))))
}
