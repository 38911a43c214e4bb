//! Admin API 素材 CRUD

use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::info;

use crate::services::{AdService, CreativePayload};

use super::helpers::{api_result, error_from_adslot, success_response};
use super::types::CreativeStatsResponse;

/// POST /creatives
pub async fn create_creative(
    service: web::Data<Arc<AdService>>,
    payload: web::Json<CreativePayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    info!(
        "Admin API: create creative '{}' in slot '{}'",
        payload.name, payload.slot
    );
    api_result(service.create_creative(payload).await)
}

/// GET /creatives/{id}
pub async fn get_creative(
    service: web::Data<Arc<AdService>>,
    path: web::Path<i64>,
) -> impl Responder {
    api_result(service.get_creative(path.into_inner()).await)
}

/// PUT /creatives/{id}
pub async fn update_creative(
    service: web::Data<Arc<AdService>>,
    path: web::Path<i64>,
    payload: web::Json<CreativePayload>,
) -> impl Responder {
    let id = path.into_inner();
    info!("Admin API: update creative {}", id);
    api_result(service.update_creative(id, payload.into_inner()).await)
}

/// DELETE /creatives/{id}
pub async fn delete_creative(
    service: web::Data<Arc<AdService>>,
    path: web::Path<i64>,
) -> impl Responder {
    let id = path.into_inner();
    info!("Admin API: delete creative {}", id);
    api_result(service.delete_creative(id).await.map(|_| id))
}

/// GET /creatives/{id}/stats
pub async fn creative_stats(
    service: web::Data<Arc<AdService>>,
    path: web::Path<i64>,
) -> HttpResponse {
    let id = path.into_inner();
    let creative = match service.get_creative(id).await {
        Ok(c) => c,
        Err(e) => return error_from_adslot(&e),
    };
    match service.creative_stats(id).await {
        Ok(stats) => success_response(CreativeStatsResponse::new(&creative, stats)),
        Err(e) => error_from_adslot(&e),
    }
}
