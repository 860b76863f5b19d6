//! 元数据模块
//!
//! 描述优化器可见的表、索引和 NDV 统计信息。
//! Catalog 由调用方提供，优化器只读取，不会修改。
//!
//! ## 模块结构
//!
//! - `catalog` - 表、列、索引和统计信息的数据模型
//! - `loader` - 从 JSON 加载 Catalog

pub mod catalog;
pub mod loader;

pub use catalog::{
    Catalog, Column, Index, IndexType, Selectivity, Statistics, Table, NDV_KEY_SEPARATOR,
};
pub use loader::{CatalogFormat, CatalogLoader};
