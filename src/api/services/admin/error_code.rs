//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AdslotError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 广告位 / 素材错误
/// - 6000-6099: 热门统计错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 广告错误 3000-3099
    SlotAlreadyExists = 3001,
    CreativeInvalid = 3002,
    AdDatabaseError = 3005,

    // 热门统计 6000-6099
    MostReadInvalidWindow = 6000,
}

impl From<&AdslotError> for ErrorCode {
    fn from(err: &AdslotError) -> Self {
        match err {
            AdslotError::Validation(_) => ErrorCode::CreativeInvalid,
            AdslotError::NotFound(_) => ErrorCode::NotFound,
            AdslotError::Conflict(_) => ErrorCode::SlotAlreadyExists,
            AdslotError::DatabaseOperation(_) => ErrorCode::AdDatabaseError,
            AdslotError::CacheConnection(_) | AdslotError::DatabaseConnection(_) => {
                ErrorCode::ServiceUnavailable
            }
            AdslotError::Serialization(_) => ErrorCode::BadRequest,
            AdslotError::DatabaseConfig(_) | AdslotError::FileOperation(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
