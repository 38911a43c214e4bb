//! Admin API 广告位 CRUD

use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use tracing::{info, trace};

use crate::services::{AdService, SlotPayload};

use super::helpers::{api_result, error_from_adslot, success_response};
use super::types::{PreviewResponse, SlotResponse};

/// GET /slots
pub async fn list_slots(service: web::Data<Arc<AdService>>) -> impl Responder {
    trace!("Admin API: list slots");
    api_result(
        service
            .list_slots()
            .await
            .map(|slots| slots.into_iter().map(SlotResponse::from).collect::<Vec<_>>()),
    )
}

/// POST /slots
pub async fn create_slot(
    service: web::Data<Arc<AdService>>,
    payload: web::Json<SlotPayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    info!("Admin API: create slot '{}'", payload.name);
    api_result(service.create_slot(payload).await.map(SlotResponse::from))
}

/// GET /slots/{name}
pub async fn get_slot(
    service: web::Data<Arc<AdService>>,
    path: web::Path<String>,
) -> HttpResponse {
    let name = path.into_inner();
    let slot = match service.get_slot(&name).await {
        Ok(slot) => slot,
        Err(e) => return error_from_adslot(&e),
    };
    match service.list_creatives(&name).await {
        Ok(creatives) => success_response(SlotResponse {
            slot,
            creative_count: Some(creatives.len()),
        }),
        Err(e) => error_from_adslot(&e),
    }
}

/// PUT /slots/{name}
pub async fn update_slot(
    service: web::Data<Arc<AdService>>,
    path: web::Path<String>,
    payload: web::Json<SlotPayload>,
) -> impl Responder {
    let name = path.into_inner();
    info!("Admin API: update slot '{}'", name);
    api_result(
        service
            .update_slot(&name, payload.into_inner())
            .await
            .map(SlotResponse::from),
    )
}

/// DELETE /slots/{name}
pub async fn delete_slot(
    service: web::Data<Arc<AdService>>,
    path: web::Path<String>,
) -> impl Responder {
    let name = path.into_inner();
    info!("Admin API: delete slot '{}'", name);
    api_result(service.delete_slot(&name).await.map(|_| name))
}

/// GET /slots/{name}/creatives
pub async fn list_slot_creatives(
    service: web::Data<Arc<AdService>>,
    path: web::Path<String>,
) -> impl Responder {
    let name = path.into_inner();
    api_result(service.list_creatives(&name).await)
}

/// GET /slots/{name}/preview
///
/// 与页面渲染走同一条缓存路径
pub async fn preview_slot(
    service: web::Data<Arc<AdService>>,
    path: web::Path<String>,
) -> impl Responder {
    let name = path.into_inner();
    api_result(
        service
            .preview(&name)
            .await
            .map(|html| PreviewResponse { slot: name, html }),
    )
}
