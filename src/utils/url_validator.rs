//! 素材链接校验
//!
//! 点击链接和图片地址会原样（转义后）进入渲染结果，写入前在这里拦住
//! `javascript:`、`data:` 之类的协议。

use url::Url;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    Empty,
    /// 解析成功但协议不是 http / https
    UnsupportedScheme(String),
    Malformed(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => f.write_str("URL cannot be empty"),
            Self::UnsupportedScheme(scheme) => write!(
                f,
                "Scheme '{}:' is not allowed, use http:// or https:// or a site path",
                scheme
            ),
            Self::Malformed(msg) => write!(f, "Invalid URL: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 绝对地址必须是 http(s) 且能被解析
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    // Url 会把协议转成小写，大小写混写的 JAVASCRIPT: 也能识别
    let parsed = Url::parse(url).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        "http" | "https" => Err(UrlValidationError::Malformed("missing host".to_string())),
        other => Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }
}

/// 校验素材的点击链接 / 图片地址
///
/// 除了 http(s) 绝对地址外，还接受以单个 `/` 开头的站内路径
/// （例如 house 广告指向 `/subscribe/`）。`//host` 这种协议相对地址不接受。
pub fn validate_target_url(url: &str) -> Result<(), UrlValidationError> {
    let trimmed = url.trim();
    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(UrlValidationError::Malformed(
                "site path must not contain whitespace".to_string(),
            ));
        }
        return Ok(());
    }
    validate_url(trimmed)
}
