//! Public ad endpoints: fragment rendering and the tracking beacon.

use actix_web::http::StatusCode;
use actix_web::http::header::{REFERER, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::ads::{AdResolver, EventType, RenderContext};
use crate::errors::AdslotError;
use crate::services::AdService;
use crate::utils::ip::peer_ip;

/// 打点表单；字段都可缺省，缺省后的校验在 handler 里做
#[derive(Debug, Default, Deserialize)]
pub struct TrackForm {
    pub creative_id: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusBody {
    status: &'static str,
}

fn status_response(status: StatusCode) -> HttpResponse {
    let body = if status.is_success() { "ok" } else { "error" };
    HttpResponse::build(status).json(StatusBody { status: body })
}

fn header_str<'a>(req: &'a HttpRequest, name: actix_web::http::header::HeaderName) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
}

pub struct AdsService;

impl AdsService {
    /// POST /ads/track
    ///
    /// event_type 先校验（400），然后是 creative_id（404）。
    pub async fn track(
        req: HttpRequest,
        form: Option<web::Form<TrackForm>>,
        service: web::Data<Arc<AdService>>,
    ) -> HttpResponse {
        let form = form.map(|f| f.into_inner()).unwrap_or_default();

        let event_type = match form
            .event_type
            .as_deref()
            .unwrap_or("impression")
            .parse::<EventType>()
        {
            Ok(event_type) => event_type,
            Err(e) => {
                debug!("Rejected tracking beacon: {}", e);
                return status_response(StatusCode::BAD_REQUEST);
            }
        };

        let Some(creative_id) = form
            .creative_id
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
        else {
            debug!(
                "Rejected tracking beacon: bad creative_id {:?}",
                form.creative_id
            );
            return status_response(StatusCode::NOT_FOUND);
        };

        let result = service
            .record_event(
                creative_id,
                event_type,
                header_str(&req, USER_AGENT),
                peer_ip(&req),
                header_str(&req, REFERER),
            )
            .await;

        match result {
            Ok(event_id) => {
                trace!(
                    "Recorded {} for creative {} (event {})",
                    event_type.as_ref(),
                    creative_id,
                    event_id
                );
                status_response(StatusCode::OK)
            }
            Err(AdslotError::NotFound(_)) => status_response(StatusCode::NOT_FOUND),
            Err(e) => {
                error!("Failed to record ad event for {}: {}", creative_id, e);
                status_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    /// GET /ads/slot/{name}
    ///
    /// 总是 200；没有广告时 body 为空
    pub async fn slot_fragment(
        req: HttpRequest,
        path: web::Path<String>,
        resolver: web::Data<Arc<AdResolver>>,
    ) -> HttpResponse {
        let ctx = RenderContext {
            path: header_str(&req, REFERER).to_string(),
            user_agent: header_str(&req, USER_AGENT).to_string(),
        };
        let html = resolver.render_ad_slot(&path.into_inner(), &ctx).await;
        HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html)
    }
}

/// Ads 路由配置
pub fn ads_routes() -> actix_web::Scope {
    web::scope("/ads")
        .route("/track", web::post().to(AdsService::track))
        .route("/slot/{name}", web::get().to(AdsService::slot_fragment))
}
