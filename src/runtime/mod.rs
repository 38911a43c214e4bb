//! Application lifecycle and execution modes
//!
//! - `lifetime::startup`: 构造存储、缓存和各个服务
//! - `lifetime::shutdown`: 等待退出信号并关闭数据库连接
//! - `modes::server`: HTTP 服务器
//! - `modes::seed`: 一次性写入初始广告位

pub mod lifetime;
pub mod modes;
