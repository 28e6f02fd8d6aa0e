//! CRS catalog handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use webproj_common::{CrsId, CrsInfo, TransformError};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /crs/ - Identifiers grouped by region
pub async fn list_crs_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<BTreeMap<String, Vec<String>>> {
    let index = state
        .catalog
        .index_by_region()
        .into_iter()
        .map(|(region, ids)| {
            (
                region.to_string(),
                ids.into_iter().map(CrsId::to_string).collect(),
            )
        })
        .collect();

    Json(index)
}

/// GET /crs/:id - Metadata for one identifier
///
/// Lookup ignores case; a miss echoes the identifier as the client sent it.
pub async fn get_crs_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CrsInfo>, ApiError> {
    state
        .catalog
        .lookup(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| TransformError::UnknownCrs(id).into())
}
