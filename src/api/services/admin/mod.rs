//! Admin API 服务模块
//!
//! 该模块包含管理 API 的所有端点：
//! - 广告位 CRUD 与预览
//! - 素材 CRUD 与曝光 / 点击统计
//! - 热门统计种子数据

mod creatives;
pub mod error_code;
mod helpers;
mod most_read;
pub mod routes;
mod slots;
mod types;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{api_result, error_from_adslot, error_response, success_response};

// 重新导出错误码
pub use error_code::ErrorCode;

pub use routes::admin_v1_routes;
