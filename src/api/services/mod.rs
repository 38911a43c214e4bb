pub mod admin;
pub mod ads;
pub mod health;
pub mod most_read;

use actix_web::web;
use std::sync::Arc;

use crate::ads::AdResolver;
use crate::api::middleware::AdminAuth;
use crate::cache::KvStore;
use crate::config::StaticConfig;
use crate::most_read::MostReadTracker;
use crate::services::AdService;
use crate::storage::SeaOrmStorage;

pub use admin::admin_v1_routes;
pub use ads::{AdsService, ads_routes};
pub use health::{AppStartTime, HealthService, health_routes};
pub use most_read::{MostReadService, most_read_routes};

/// 所有 handler 共享的状态，每个 worker 克隆一份 Arc
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<StaticConfig>,
    pub storage: Arc<SeaOrmStorage>,
    pub cache: Arc<dyn KvStore>,
    pub resolver: Arc<AdResolver>,
    pub ad_service: Arc<AdService>,
    pub most_read: Arc<MostReadTracker>,
    pub start_time: AppStartTime,
}

/// 注册 app_data 和全部路由
///
/// HttpServer 与集成测试共用同一套路由。
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.config.clone()))
        .app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::new(state.cache.clone()))
        .app_data(web::Data::new(state.resolver.clone()))
        .app_data(web::Data::new(state.ad_service.clone()))
        .app_data(web::Data::new(state.most_read.clone()))
        .app_data(web::Data::new(state.start_time.clone()))
        .service(
            web::scope("/admin")
                .wrap(AdminAuth::new(state.config.api.admin_token.clone()))
                .service(admin_v1_routes()),
        )
        .service(health_routes())
        .service(ads_routes())
        .service(most_read_routes());
}
