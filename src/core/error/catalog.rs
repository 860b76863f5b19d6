//! 元数据错误类型
//!
//! 涵盖 Catalog JSON 加载与校验过程中的错误

use thiserror::Error;

/// 元数据错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("JSON 解析错误: {0}")]
    Json(String),

    #[error("IO错误: {0}")]
    Io(String),

    #[error("无效的元数据: {0}")]
    InvalidCatalog(String),
}

/// 元数据结果类型
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Json(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}
