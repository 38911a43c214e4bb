//! 客户端 IP 提取
//!
//! 与页面统计保持一致：只使用 TCP 连接的对端地址，不信任转发头。

use actix_web::HttpRequest;

/// 连接对端 IP，不含端口
pub fn peer_ip(req: &HttpRequest) -> Option<String> {
    req.peer_addr().map(|addr| addr.ip().to_string())
}
