//! Discovery API Handlers
//!
//! Upload a log and discover its model, or re-aggregate an earlier one.

use axum::{
    Json,
    extract::{
        Multipart, Path, Query, State, multipart::MultipartRejection,
        rejection::QueryRejection,
    },
};
use hieragg_core::dto::aggregate::AggregateQuery;
use hieragg_miner::{AggregationOptions, ErrorKind};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::service::discovery_service::{self, DiscoveryError};
use crate::service::upload_service::{self, UploadError};
use crate::state::AppState;

const NO_FILE: &str = "No file uploaded";

/// POST /api/discover
/// Save the uploaded log and discover its model
pub async fn discover(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!("Rejected upload: {}", rejection);
        ApiError::BadRequest(NO_FILE.to_string())
    })?;

    let upload = upload_service::take_file(&mut multipart)
        .await
        .map_err(upload_error)?;
    tracing::info!(file = %upload.file_name, bytes = upload.data.len(), "Log uploaded");

    let path = upload_service::save(&state.upload_dir, &upload)
        .await
        .map_err(upload_error)?;

    // Engine failures all answer 500 with the engine's message
    let discovery = discovery_service::discover(state.engine.clone(), path)
        .await
        .map_err(|e| {
            discovery_service::log_failure("Discovery", &e);
            ApiError::InternalError(e.to_string())
        })?;

    Ok(Json(discovery.into_body()))
}

/// GET /api/aggregate/{log_id}
/// Re-aggregate the tree of a previous discovery
///
/// Query parameters:
/// - `level` (optional): collapse operator nodes at this depth
/// - `metric` (optional): `frequency`
/// - `threshold` (optional): collapse subtrees below this metric value
pub async fn aggregate(
    State(state): State<AppState>,
    Path(log_id): Path<String>,
    query: Result<Query<AggregateQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    tracing::debug!(log_id = %log_id, ?query, "Aggregating");

    let options = AggregationOptions::from(query);
    let discovery = discovery_service::aggregate(state.engine.clone(), log_id, options)
        .await
        .map_err(aggregate_error)?;

    Ok(Json(discovery.into_body()))
}

fn upload_error(err: UploadError) -> ApiError {
    match err {
        UploadError::NoFile => ApiError::BadRequest(NO_FILE.to_string()),
        UploadError::Multipart(err) => {
            if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::PayloadTooLarge(err.body_text())
            } else {
                ApiError::BadRequest(err.body_text())
            }
        }
        UploadError::Io(err) => {
            tracing::error!("Failed to save upload: {:?}", err);
            ApiError::InternalError(format!("Failed to save upload: {}", err))
        }
    }
}

fn aggregate_error(err: DiscoveryError) -> ApiError {
    discovery_service::log_failure("Aggregation", &err);

    match err.kind() {
        ErrorKind::NotFound => ApiError::NotFound(err.to_string()),
        ErrorKind::Validation => ApiError::BadRequest(err.to_string()),
        ErrorKind::Internal => ApiError::InternalError(err.to_string()),
    }
}
