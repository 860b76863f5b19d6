//! 无统计信息时的索引打分
//!
//! 逐列遍历索引：列出现在过滤条件中则命中，按操作符权重和位置衰减累加分数，
//! 遇到第一个未命中的列停止；具有 interesting order 的索引额外加分。
//! 命中数与分数只在一次选择中有效，保存在局部的 `ScoredCandidate` 中。

use std::cmp::Ordering;

use crate::metadata::IndexType;
use crate::query::optimizer::annotator::CandidateIndex;
use crate::query::optimizer::cost::config::CostModelConfig;
use crate::query::shape::{FilterColumn, PredicateOperator};

/// 单次选择中的打分记录
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a CandidateIndex,
    pub hit_num: usize,
    pub ops_score: f64,
}

impl ScoredCandidate<'_> {
    fn is_full_hit_unique(&self) -> bool {
        self.hit_num == self.candidate.column_count && self.candidate.index_type == IndexType::Unique
    }
}

/// 某列上谓词的权重
///
/// 单个谓词：`=`/`in` 为 3，limit 标记为 2，`<`/`<=`/`>`/`>=`/order 标记为 1，其余为 0。
/// 多个谓词：有 `=`/`in` 为 3；否则两侧区间为 2，单侧区间为 1，并与 limit/order 标记取大。
pub fn opt_weight(column_name: &str, filters: &[FilterColumn]) -> f64 {
    let predicates: Vec<PredicateOperator> = filters
        .iter()
        .filter(|f| f.column_name == column_name)
        .map(|f| f.operator)
        .collect();

    match predicates.as_slice() {
        [] => 0.0,
        [single] => single_weight(*single),
        multiple => multiple_weight(multiple),
    }
}

fn single_weight(operator: PredicateOperator) -> f64 {
    use PredicateOperator::*;

    match operator {
        Equal | In => 3.0,
        Limit => 2.0,
        LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual | Order => 1.0,
        _ => 0.0,
    }
}

fn multiple_weight(operators: &[PredicateOperator]) -> f64 {
    use PredicateOperator::*;

    if operators.iter().any(|op| matches!(op, Equal | In)) {
        return 3.0;
    }

    let mut weight: f64 = 0.0;
    let mut lower = false;
    let mut upper = false;
    for operator in operators {
        match operator {
            GreaterThan | GreaterThanOrEqual => lower = true,
            LessThan | LessThanOrEqual => upper = true,
            Limit => weight = weight.max(2.0),
            Order => weight = weight.max(1.0),
            _ => {}
        }
    }

    if weight < 2.0 && (lower || upper) {
        weight = if lower && upper { 2.0 } else { 1.0 };
    }
    weight
}

/// 为单个候选索引打分
pub fn score_candidate<'a>(
    candidate: &'a CandidateIndex,
    filters: &[FilterColumn],
    config: &CostModelConfig,
) -> ScoredCandidate<'a> {
    let mut hit_num = 0;
    let mut ops_score = 0.0;

    for (pos, column) in candidate.column_list.iter().enumerate() {
        if !filters.iter().any(|f| &f.column_name == column) {
            break;
        }
        hit_num += 1;
        ops_score += config.position_decay.powi(pos as i32) * opt_weight(column, filters);
    }

    if candidate.has_interesting_order {
        ops_score += config.interesting_order_bonus;
    }

    ScoredCandidate {
        candidate,
        hit_num,
        ops_score,
    }
}

/// 无统计信息时选择索引
///
/// 取最高分的一组，再按以下顺序决出：主键、全部命中的唯一索引、命中列数更多、
/// 列数更少、唯一索引优先于普通索引。
pub fn recommend_without_statistics<'a>(
    candidates: &'a [CandidateIndex],
    filters: &[FilterColumn],
    config: &CostModelConfig,
) -> Option<&'a CandidateIndex> {
    let mut scored: Vec<ScoredCandidate<'a>> = candidates
        .iter()
        .map(|c| score_candidate(c, filters, config))
        .collect();

    for s in &scored {
        log::debug!(
            "无统计信息打分: {} hit_num={} ops_score={}",
            s.candidate.name,
            s.hit_num,
            s.ops_score
        );
    }

    scored.sort_by(|a, b| b.ops_score.partial_cmp(&a.ops_score).unwrap_or(Ordering::Equal));

    let (first, rest) = scored.split_first()?;
    let top_score = first.ops_score;

    let mut best = *first;
    for other in rest.iter().take_while(|s| s.ops_score == top_score) {
        let best_type = best.candidate.index_type;
        let other_type = other.candidate.index_type;

        if other_type == IndexType::Primary && best_type != IndexType::Primary {
            best = *other;
            break;
        }

        if other.is_full_hit_unique() && !best_type.is_unique() {
            best = *other;
        } else if best.is_full_hit_unique() {
            continue;
        } else if other.hit_num > best.hit_num {
            best = *other;
        } else if other.hit_num == best.hit_num {
            let other_count = other.candidate.column_count;
            let best_count = best.candidate.column_count;
            if other_count < best_count
                || (other_count == best_count
                    && other_type == IndexType::Unique
                    && !best_type.is_unique())
            {
                best = *other;
            }
        }
    }

    Some(best.candidate)
}
