//! Coordinate transformation handler.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Extension, Path},
    Json,
};
use metrics::{counter, histogram};
use webproj_common::Coordinate4;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /trans/:src/:dst/:coords - Transform one coordinate
///
/// `coords` is `v1,v2[,v3[,v4]]`. Components that were not supplied come back
/// as `null`.
pub async fn transform_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((src, dst, coords)): Path<(String, String, String)>,
) -> Result<Json<Coordinate4>, ApiError> {
    let start = Instant::now();
    counter!("webproj_transform_requests_total").increment(1);

    let result = Coordinate4::from_path_segment(&coords)
        .map_err(ApiError::from)
        .and_then(|coordinate| {
            state
                .transformers
                .transform(&src, &dst, coordinate)
                .map_err(ApiError::from)
        });

    histogram!("webproj_transform_duration_seconds").record(start.elapsed().as_secs_f64());

    match result {
        Ok(coordinate) => Ok(Json(coordinate)),
        Err(e) => {
            counter!("webproj_transform_errors_total", "kind" => e.kind()).increment(1);
            Err(e)
        }
    }
}
