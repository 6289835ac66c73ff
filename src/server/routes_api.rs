use crate::server::error::AppError;
use crate::server::AppContext;
use crate::store::ArtworkRecord;
use artvault_common::Error;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

pub fn api_routes() -> Router<AppContext> {
    Router::new()
        .route("/status", get(status))
        .route("/artworks", get(list_artworks))
        .route("/artworks/:id", get(get_artwork))
}

async fn status(State(ctx): State<AppContext>) -> Result<impl IntoResponse, AppError> {
    let records = ctx.load_records().await?;
    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "records": records.len(),
        "ai_key_configured": ctx.ai_api_key().is_some(),
    })))
}

async fn list_artworks(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<ArtworkRecord>>, AppError> {
    Ok(Json(ctx.load_records().await?))
}

async fn get_artwork(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<ArtworkRecord>, AppError> {
    ctx.load_records()
        .await?
        .into_iter()
        .find(|record| record.record_id.matches(&id))
        .map(Json)
        .ok_or_else(|| Error::not_found("artwork", id).into())
}
