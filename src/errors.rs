use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum AdslotError {
    CacheConnection(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Serialization(String),
}

impl AdslotError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AdslotError::CacheConnection(_) => "E001",
            AdslotError::DatabaseConfig(_) => "E003",
            AdslotError::DatabaseConnection(_) => "E004",
            AdslotError::DatabaseOperation(_) => "E005",
            AdslotError::FileOperation(_) => "E006",
            AdslotError::Validation(_) => "E007",
            AdslotError::NotFound(_) => "E008",
            AdslotError::Serialization(_) => "E009",
            AdslotError::Conflict(_) => "E014",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AdslotError::CacheConnection(_) => "Cache Connection Error",
            AdslotError::DatabaseConfig(_) => "Database Configuration Error",
            AdslotError::DatabaseConnection(_) => "Database Connection Error",
            AdslotError::DatabaseOperation(_) => "Database Operation Error",
            AdslotError::FileOperation(_) => "File Operation Error",
            AdslotError::Validation(_) => "Validation Error",
            AdslotError::NotFound(_) => "Resource Not Found",
            AdslotError::Conflict(_) => "Resource Conflict",
            AdslotError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AdslotError::CacheConnection(msg)
            | AdslotError::DatabaseConfig(msg)
            | AdslotError::DatabaseConnection(msg)
            | AdslotError::DatabaseOperation(msg)
            | AdslotError::FileOperation(msg)
            | AdslotError::Validation(msg)
            | AdslotError::NotFound(msg)
            | AdslotError::Conflict(msg)
            | AdslotError::Serialization(msg) => msg,
        }
    }

    /// 映射为 HTTP 状态码（Admin API 使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            AdslotError::Validation(_) => StatusCode::BAD_REQUEST,
            AdslotError::NotFound(_) => StatusCode::NOT_FOUND,
            AdslotError::Conflict(_) => StatusCode::CONFLICT,
            AdslotError::CacheConnection(_) | AdslotError::DatabaseConnection(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AdslotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AdslotError {}

// 便捷的构造函数
impl AdslotError {
    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        AdslotError::CacheConnection(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        AdslotError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        AdslotError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        AdslotError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AdslotError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AdslotError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AdslotError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        AdslotError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AdslotError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for AdslotError {
    fn from(err: sea_orm::DbErr) -> Self {
        AdslotError::DatabaseOperation(err.to_string())
    }
}

impl From<redis::RedisError> for AdslotError {
    fn from(err: redis::RedisError) -> Self {
        AdslotError::CacheConnection(err.to_string())
    }
}

impl From<std::io::Error> for AdslotError {
    fn from(err: std::io::Error) -> Self {
        AdslotError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AdslotError {
    fn from(err: serde_json::Error) -> Self {
        AdslotError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdslotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(AdslotError::validation("x").code(), "E007");
        assert_eq!(AdslotError::not_found("x").code(), "E008");
        assert_eq!(AdslotError::conflict("x").code(), "E014");
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            AdslotError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AdslotError::not_found("gone").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AdslotError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = AdslotError::not_found("slot 'leaderboard'");
        assert_eq!(
            err.format_simple(),
            "Resource Not Found: slot 'leaderboard'"
        );
        assert_eq!(err.to_string(), err.format_simple());
    }
}
