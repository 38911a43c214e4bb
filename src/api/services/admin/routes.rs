//! Admin API 路由配置
//!
//! 将 /v1 下的路由按资源拆分。

use actix_web::web;

use super::creatives::{
    create_creative, creative_stats, delete_creative, get_creative, update_creative,
};
use super::most_read::seed_most_read;
use super::slots::{
    create_slot, delete_slot, get_slot, list_slot_creatives, list_slots, preview_slot,
    update_slot,
};

/// 广告位路由 `/slots`
///
/// 包含：
/// - GET /slots - 所有广告位
/// - POST /slots - 创建广告位
/// - GET /slots/{name}/creatives - 广告位下的素材
/// - GET /slots/{name}/preview - 预览渲染结果
/// - GET/PUT/DELETE /slots/{name}
pub fn slots_routes() -> actix_web::Scope {
    web::scope("/slots")
        .route("", web::get().to(list_slots))
        .route("", web::post().to(create_slot))
        .route("/{name}/creatives", web::get().to(list_slot_creatives))
        .route("/{name}/preview", web::get().to(preview_slot))
        .route("/{name}", web::get().to(get_slot))
        .route("/{name}", web::put().to(update_slot))
        .route("/{name}", web::delete().to(delete_slot))
}

/// 素材路由 `/creatives`
pub fn creatives_routes() -> actix_web::Scope {
    web::scope("/creatives")
        .route("", web::post().to(create_creative))
        .route("/{id}/stats", web::get().to(creative_stats))
        .route("/{id}", web::get().to(get_creative))
        .route("/{id}", web::put().to(update_creative))
        .route("/{id}", web::delete().to(delete_creative))
}

/// 热门统计路由 `/most-read`
pub fn most_read_routes() -> actix_web::Scope {
    web::scope("/most-read").route("/seed", web::post().to(seed_most_read))
}

/// Admin API v1 路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(slots_routes())
        .service(creatives_routes())
        .service(most_read_routes())
}
