//! Configuration
//!
//! 静态配置从 `config.toml` + 环境变量加载，启动时构造一次，
//! 以 `Arc<StaticConfig>` 注入到各个服务中。

mod structs;

pub use structs::*;
