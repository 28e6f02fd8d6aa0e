//! Landing page handler.

use axum::Json;
use serde_json::{json, Value};

/// GET / - Empty landing document
pub async fn landing_handler() -> Json<Value> {
    Json(json!({}))
}
