//! 统一错误处理系统
//!
//! ## 设计理念
//!
//! 1. **按模块划分**：优化器、元数据加载、配置各自定义错误枚举
//! 2. **调用方汇总**：命令行入口通过 anyhow 附加上下文
//! 3. **无结果不是错误**：没有推荐索引时返回空结果，而不是错误

pub mod catalog;
pub mod config;
pub mod optimize;

pub use catalog::{CatalogError, CatalogResult};
pub use config::{ConfigError, ConfigResult};
pub use optimize::{OptimizeError, OptimizeResult};
