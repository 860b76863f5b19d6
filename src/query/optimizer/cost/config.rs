//! 代价模型配置模块
//!
//! 提供可配置的代价参数，默认值取自 OceanBase 的猜测选择率
//!
//! ## 使用示例
//!
//! ```rust
//! use index_advisor::query::optimizer::cost::CostModelConfig;
//!
//! // 使用默认配置
//! let config = CostModelConfig::default();
//!
//! // 自定义配置
//! let custom_config = CostModelConfig {
//!     index_back_weight: 5.0,
//!     ..Default::default()
//! };
//! assert_eq!(custom_config.closed_range_sel, config.closed_range_sel);
//! ```

use serde::{Deserialize, Serialize};

/// 代价模型配置
///
/// 定义选择率估算与无统计信息打分所用的常量。
/// 代价公式为 `query_range + index_back_weight * index_back + order_penalty`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModelConfig {
    /// 回表代价权重
    ///
    /// 回表是随机 IO，默认值 10.0
    pub index_back_weight: f64,

    /// 排序惩罚系数
    ///
    /// 索引无法消除排序时，额外代价 = query_range * 该系数。默认值 0.01
    pub order_penalty_factor: f64,

    /// 单边开区间选择率（`a > ?`）。默认值 0.1
    pub half_open_range_sel: f64,

    /// 双边开区间选择率（`a > ? and a < ?`）。默认值 0.05
    pub closed_range_sel: f64,

    /// 默认选择率。默认值 0.5
    pub default_sel: f64,

    /// 缺少 NDV 时 `!=` 的选择率。默认值 0.5
    pub not_equal_default_sel: f64,

    /// 无法识别的操作符的选择率。默认值 1.0
    pub unknown_sel: f64,

    /// 无统计信息打分时，索引列位置的衰减系数。默认值 0.1
    pub position_decay: f64,

    /// 无统计信息打分时，interesting order 的加分。默认值 0.1
    pub interesting_order_bonus: f64,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            index_back_weight: 10.0,
            order_penalty_factor: 0.01,
            half_open_range_sel: 0.1,
            closed_range_sel: 0.05,
            default_sel: 0.5,
            not_equal_default_sel: 0.5,
            unknown_sel: 1.0,
            position_decay: 0.1,
            interesting_order_bonus: 0.1,
        }
    }
}

impl CostModelConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置回表代价权重
    pub fn with_index_back_weight(mut self, weight: f64) -> Self {
        self.index_back_weight = weight;
        self
    }

    /// 设置排序惩罚系数
    pub fn with_order_penalty_factor(mut self, factor: f64) -> Self {
        self.order_penalty_factor = factor;
        self
    }

    /// 设置单边开区间选择率
    pub fn with_half_open_range_sel(mut self, sel: f64) -> Self {
        self.half_open_range_sel = sel;
        self
    }

    /// 设置双边开区间选择率
    pub fn with_closed_range_sel(mut self, sel: f64) -> Self {
        self.closed_range_sel = sel;
        self
    }

    /// 设置默认选择率
    pub fn with_default_sel(mut self, sel: f64) -> Self {
        self.default_sel = sel;
        self
    }

    /// 检查参数是否合法，返回第一个非法参数的名称
    pub fn invalid_field(&self) -> Option<&'static str> {
        let fields = [
            ("index_back_weight", self.index_back_weight),
            ("order_penalty_factor", self.order_penalty_factor),
            ("half_open_range_sel", self.half_open_range_sel),
            ("closed_range_sel", self.closed_range_sel),
            ("default_sel", self.default_sel),
            ("not_equal_default_sel", self.not_equal_default_sel),
            ("unknown_sel", self.unknown_sel),
            ("position_decay", self.position_decay),
        ];
        fields
            .iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
            .map(|(name, _)| *name)
    }
}
