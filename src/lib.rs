//! Index Advisor - 面向 MySQL/OceanBase 兼容负载的索引推荐引擎
//!
//! 根据查询的谓词形态、已有索引和可选的 NDV 统计信息，
//! 推荐查询应使用的已有索引，或建议新建组合索引。

pub mod config;
pub mod core;
pub mod metadata;
pub mod query;
pub mod utils;
