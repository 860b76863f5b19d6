//! 新建索引建议
//!
//! 已有索引都不能完全等值命中时，根据过滤条件和排序列合成一个组合索引，
//! 与已有索引的最小代价比较后决定是否推荐。

use crate::metadata::{Index, IndexType};
use crate::query::optimizer::annotator::IndexAnnotator;
use crate::query::optimizer::cost::{CostEstimator, UNBOUNDED_COST};
use crate::query::optimizer::recommendation::{
    improvement_message, Recommendation, BETTER_RANGE_INDEX, BETTER_RANGE_INDEX_WITHOUT_STATISTICS,
};
use crate::query::shape::{FilterColumn, OrderItem};

/// 合成索引的名称前缀
pub const NEW_INDEX_PREFIX: &str = "idx_sqless_";

fn push_unique(columns: &mut Vec<String>, column: &str) {
    if !columns.iter().any(|c| c == column) {
        columns.push(column.to_string());
    }
}

/// 新建索引顾问
#[derive(Debug, Default, Clone, Copy)]
pub struct NewIndexAdvisor;

impl NewIndexAdvisor {
    pub fn new() -> Self {
        Self
    }

    /// 合成索引列
    ///
    /// 顺序为：等值列（`=`/`in`/`is`，按首次出现）、第一个范围列；
    /// 没有范围列时改为追加方向一致的排序列前缀；最后追加其余过滤列和排序列。
    pub fn synthesize_columns(filters: &[FilterColumn], order_list: &[OrderItem]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();

        for filter in filters.iter().filter(|f| f.operator.is_equality()) {
            push_unique(&mut columns, &filter.column_name);
        }

        let range_column = filters
            .iter()
            .filter(|f| f.operator.is_range())
            .map(|f| f.column_name.as_str())
            .find(|c| !columns.iter().any(|existing| existing == c));

        match range_column {
            Some(column) => push_unique(&mut columns, column),
            None => {
                if let Some(first) = order_list.first() {
                    for item in order_list.iter().take_while(|o| o.ordering == first.ordering) {
                        push_unique(&mut columns, &item.column_name);
                    }
                }
            }
        }

        for filter in filters {
            push_unique(&mut columns, &filter.column_name);
        }
        for item in order_list {
            push_unique(&mut columns, &item.column_name);
        }

        columns
    }

    /// 合成索引，没有可用列时返回 None
    ///
    /// 合成索引按主键类型标注，不计回表代价
    pub fn synthesize(filters: &[FilterColumn], order_list: &[OrderItem]) -> Option<Index> {
        let columns = Self::synthesize_columns(filters, order_list);
        if columns.is_empty() {
            return None;
        }

        let name = format!("{}{}", NEW_INDEX_PREFIX, columns.join("_"));
        Some(Index::new(name, columns, IndexType::Primary))
    }

    /// 决定是否推荐新建索引
    ///
    /// `min_cost` 为已有索引中的最小代价，未知或只能全表扫描时无条件推荐
    pub fn advise(
        &self,
        table_name: &str,
        annotator: &IndexAnnotator<'_>,
        estimator: &CostEstimator<'_>,
        order_list: &[OrderItem],
        min_cost: Option<f64>,
    ) -> Option<Recommendation> {
        let index = Self::synthesize(annotator.filters(), order_list)?;
        let candidate = annotator.annotate(&index);

        let reason = match min_cost.filter(|cost| *cost < UNBOUNDED_COST) {
            None => BETTER_RANGE_INDEX.to_string(),
            Some(old_cost) => match estimator.calculate_selectivity(&candidate) {
                None => BETTER_RANGE_INDEX_WITHOUT_STATISTICS.to_string(),
                Some(new_cost) if new_cost < old_cost => improvement_message(old_cost, new_cost),
                Some(new_cost) => {
                    log::debug!(
                        "新索引 {} 的代价 {} 不低于已有最小代价 {}",
                        candidate.name,
                        new_cost,
                        old_cost
                    );
                    return None;
                }
            },
        };

        log::info!("表 {} 建议新建索引 {}", table_name, candidate.name);
        Some(Recommendation::new_index(table_name, &candidate, reason))
    }
}
