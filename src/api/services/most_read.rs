//! Public most-read endpoints.

use actix_web::http::StatusCode;
use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::api::services::admin::{ApiResponse, ErrorCode};
use crate::most_read::MostReadTracker;
use crate::utils::ip::peer_ip;

#[derive(Debug, Default, Deserialize)]
pub struct ViewForm {
    pub card_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MostReadQuery {
    #[serde(default = "default_window")]
    pub window: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_window() -> String {
    "24h".to_string()
}

fn default_count() -> usize {
    5
}

#[derive(Debug, Serialize)]
struct StatusBody<'a> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
}

pub struct MostReadService;

impl MostReadService {
    /// POST /most-read/view
    pub async fn record_view(
        req: HttpRequest,
        form: Option<web::Form<ViewForm>>,
        tracker: web::Data<Arc<MostReadTracker>>,
    ) -> HttpResponse {
        let form = form.map(|f| f.into_inner()).unwrap_or_default();
        let Some(card_id) = form
            .card_id
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
        else {
            return HttpResponse::build(StatusCode::BAD_REQUEST).json(StatusBody {
                status: "error",
                message: Some("card_id must be an integer"),
            });
        };

        let ip = peer_ip(&req).unwrap_or_default();
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("");

        let counted = tracker.record_view(card_id, &ip, user_agent).await;
        trace!("View of card {} counted={}", card_id, counted);

        HttpResponse::Ok().json(StatusBody {
            status: "ok",
            message: None,
        })
    }

    /// GET /most-read?window=24h&count=5
    pub async fn list(
        query: web::Query<MostReadQuery>,
        tracker: web::Data<Arc<MostReadTracker>>,
    ) -> HttpResponse {
        match tracker.most_read(&query.window, query.count).await {
            Ok(cards) => HttpResponse::Ok().json(cards),
            Err(e) => {
                debug!("Most-read query rejected: {}", e);
                HttpResponse::build(StatusCode::BAD_REQUEST).json(ApiResponse::<()> {
                    code: ErrorCode::MostReadInvalidWindow as i32,
                    message: e.message().to_string(),
                    data: None,
                })
            }
        }
    }
}

/// Most-read 路由配置
pub fn most_read_routes() -> actix_web::Scope {
    web::scope("/most-read")
        .route("", web::get().to(MostReadService::list))
        .route("/view", web::post().to(MostReadService::record_view))
}
