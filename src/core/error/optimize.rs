//! 优化器错误类型
//!
//! 索引推荐过程中的错误。统计信息缺失、代价无法计算都不是错误，
//! 优化器会退化为无统计信息打分或跳过该候选。

use thiserror::Error;

/// 优化器错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizeError {
    /// 查询形态不合法
    #[error("无效的查询形态: {0}")]
    InvalidQueryShape(String),
}

/// 优化器结果类型
pub type OptimizeResult<T> = Result<T, OptimizeError>;
