//! 基于代价的索引选择
//!
//! 代价 = 查询范围选择率 + 回表权重 × 回表选择率 + 排序惩罚。
//! 统计信息缺失（NDV 为空或行数为 0）时退化为无统计信息打分。

use crate::config::OptimizerConfig;
use crate::metadata::{IndexType, Statistics};
use crate::query::optimizer::annotator::CandidateIndex;
use crate::query::optimizer::cost::config::CostModelConfig;
use crate::query::optimizer::cost::heuristic::recommend_without_statistics;
use crate::query::optimizer::cost::selectivity::{NdvMap, SelectivityEstimator};
use crate::query::optimizer::opt_type::{column_opt_for_cost, OptType};
use crate::query::shape::{FilterColumn, QueryShape};

/// 只能全表扫描的索引的代价
pub const UNBOUNDED_COST: f64 = f64::MAX;

/// 代价模型
///
/// 启动时从配置构造一次，按引用传入优化器
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    config: CostModelConfig,
    max_ndv_split_columns: usize,
}

impl CostModel {
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self {
            config: config.cost,
            max_ndv_split_columns: config.max_ndv_split_columns,
        }
    }

    pub fn config(&self) -> &CostModelConfig {
        &self.config
    }

    /// 为一张表创建代价估算器
    pub fn estimator<'a>(
        &'a self,
        shape: &'a QueryShape,
        filters: &'a [FilterColumn],
        statistics: Option<&Statistics>,
        table_rows: u64,
    ) -> CostEstimator<'a> {
        CostEstimator {
            config: &self.config,
            selectivity: SelectivityEstimator::new(self.config),
            shape,
            filters,
            ndv_map: NdvMap::from_statistics(statistics, self.max_ndv_split_columns),
            table_rows,
        }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}

/// CBO 的选择结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CostChoice {
    pub recommended: Option<CandidateIndex>,
    /// 已有索引中的最小代价，未计算时为 None
    pub min_cost: Option<f64>,
}

/// 单张表上的代价估算器
#[derive(Debug)]
pub struct CostEstimator<'a> {
    config: &'a CostModelConfig,
    selectivity: SelectivityEstimator,
    shape: &'a QueryShape,
    filters: &'a [FilterColumn],
    ndv_map: NdvMap,
    table_rows: u64,
}

impl<'a> CostEstimator<'a> {
    /// NDV 与行数都可用
    pub fn has_statistics(&self) -> bool {
        !self.ndv_map.is_empty() && self.table_rows > 0
    }

    fn opt_type(&self, column: &str) -> OptType {
        column_opt_for_cost(column, self.filters)
    }

    /// 计算索引代价，统计信息不足以计算时返回 None
    pub fn calculate_selectivity(&self, candidate: &CandidateIndex) -> Option<f64> {
        if !candidate.has_interesting_order
            && candidate.extract_range.is_empty()
            && candidate.index_type != IndexType::Primary
        {
            return Some(UNBOUNDED_COST);
        }

        let range = &candidate.extract_range;
        // IN 列表长度按源顺序依次消费
        let mut in_counts = self.shape.in_count_list.iter().copied();
        let mut in_factor = 1.0;
        for column in range {
            if self.opt_type(column) == OptType::In {
                if let Some(count) = in_counts.next() {
                    in_factor *= count as f64;
                }
            }
        }

        let mut range_sel = match range.split_last() {
            None => 1.0,
            Some((last, prefix)) => {
                let last_opt = self.opt_type(last);
                if last_opt.is_equal_or_in() {
                    let ndv = self.ndv_map.combined_ndv(&range[..]);
                    if ndv == 0 {
                        return None;
                    }
                    in_factor / ndv as f64
                } else {
                    let ndv = self.ndv_map.combined_ndv(prefix);
                    if ndv == 0 && !prefix.is_empty() {
                        return None;
                    }
                    let base = if ndv > 0 { in_factor / ndv as f64 } else { 1.0 };
                    base * self
                        .selectivity
                        .op_selectivity(last_opt, self.ndv_map.get(last))
                }
            }
        };

        let mut back_sel = 0.0;
        if candidate.index_back {
            let remain: Vec<&String> = candidate
                .column_list
                .iter()
                .filter(|c| !range.contains(*c))
                .collect();
            if remain.is_empty() {
                return Some(range_sel);
            }

            let mut equal_columns = Vec::new();
            let mut other_columns = Vec::new();
            let mut back_in_factor = 1.0;
            for column in remain {
                let opt = self.opt_type(column);
                if opt.is_equal_or_in() {
                    if opt == OptType::In {
                        if let Some(count) = in_counts.next() {
                            back_in_factor *= count as f64;
                        }
                    }
                    equal_columns.push(column.as_str());
                } else {
                    other_columns.push((column.as_str(), opt));
                }
            }

            let ndv = self.ndv_map.combined_ndv(&equal_columns[..]);
            back_sel = if ndv > 0 {
                let equal_sel = back_in_factor / ndv as f64;
                if range_sel != 0.0 {
                    range_sel * equal_sel
                } else {
                    equal_sel
                }
            } else {
                range_sel
            };

            for (column, opt) in other_columns {
                let sel = self.selectivity.op_selectivity(opt, self.ndv_map.get(column));
                back_sel = if back_sel != 0.0 {
                    back_sel * sel
                } else {
                    range_sel * sel
                };
            }
        }

        // LIMIT 0 视为没有 LIMIT
        let limit = self.shape.limit_number.filter(|_| self.shape.has_limit());
        if let (Some(limit), true) = (limit, self.table_rows > 0) {
            let limit_sel = limit as f64 / self.table_rows as f64;
            let cover_all_filters = self
                .filters
                .iter()
                .all(|f| candidate.column_list.contains(&f.column_name));

            if cover_all_filters && self.shape.order_list.is_empty() {
                back_sel = back_sel.min(limit_sel);
            }
            if !self.shape.order_list.is_empty() && candidate.has_interesting_order {
                back_sel = limit_sel;
                range_sel = 0.0;
            }
        }

        let order_penalty = if candidate.has_interesting_order {
            0.0
        } else {
            range_sel * self.config.order_penalty_factor
        };

        Some(range_sel + self.config.index_back_weight * back_sel + order_penalty)
    }

    /// 从候选索引中选出代价最小者
    ///
    /// 只有一个候选时直接推荐；统计信息缺失时按无统计信息打分；
    /// 否则取代价最小者，代价相同取列数更少者，无法计算代价的候选被跳过。
    pub fn choose(&self, candidates: &[CandidateIndex]) -> CostChoice {
        match candidates {
            [] => return CostChoice::default(),
            [only] => {
                return CostChoice {
                    recommended: Some(only.clone()),
                    min_cost: None,
                }
            }
            _ => {}
        }

        if !self.has_statistics() {
            log::debug!("统计信息缺失，使用无统计信息打分");
            return CostChoice {
                recommended: recommend_without_statistics(candidates, self.filters, self.config)
                    .cloned(),
                min_cost: None,
            };
        }

        let mut best: Option<(&CandidateIndex, f64)> = None;
        for candidate in candidates {
            let Some(cost) = self.calculate_selectivity(candidate) else {
                log::debug!("索引 {} 的代价无法计算", candidate.name);
                continue;
            };
            log::debug!("索引 {} 的代价: {}", candidate.name, cost);

            let replace = match best {
                None => true,
                Some((current, min_cost)) => {
                    cost < min_cost
                        || (cost == min_cost && candidate.column_count < current.column_count)
                }
            };
            if replace {
                best = Some((candidate, cost));
            }
        }

        CostChoice {
            recommended: best.map(|(c, _)| c.clone()),
            min_cost: best.map(|(_, cost)| cost),
        }
    }
}
