//! 代价计算模块
//!
//! 提供基于代价的索引选择功能
//!
//! ## 模块结构
//!
//! - `config` - 代价模型配置
//! - `selectivity` - NDV 组合与单列选择率估计
//! - `estimator` - 索引代价计算与 CBO 选择
//! - `heuristic` - 无统计信息时的索引打分

pub mod config;
pub mod estimator;
pub mod heuristic;
pub mod selectivity;

pub use config::CostModelConfig;
pub use estimator::{CostChoice, CostEstimator, CostModel, UNBOUNDED_COST};
pub use heuristic::{opt_weight, recommend_without_statistics, ScoredCandidate};
pub use selectivity::{NdvMap, SelectivityEstimator};
