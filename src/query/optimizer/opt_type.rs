//! 操作符代价类型模块
//!
//! 将一列上的一个或多个谓词归类为 `OptType`，用于决定选择率公式。
//! 同一列上有多个谓词时取最好的情况，例如 `a > ? and a = ?` 按 `=` 计算。

use std::fmt;

use crate::query::shape::{FilterColumn, PredicateOperator};

/// 操作符代价类型
///
/// 序号越大，范围越小、代价越低
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum OptType {
    Unknown = -999_999,
    /// 其他
    Other = -1,
    /// `!=`、`not`、`not in`
    NotEqual = 0,
    /// `>=`、`<=`
    HalfOpenRangeEqual = 1,
    /// `>`、`<`
    HalfOpenRange = 2,
    /// `>= and <=`、`like_prefix`、`between`
    ClosedRangeEqualAll = 3,
    /// `>= and <`、`> and <=`
    ClosedRangeHalfEqual = 4,
    /// `> and <`
    ClosedRange = 5,
    In = 6,
    Equal = 7,
}

impl OptType {
    /// 序号
    pub fn ordinal(&self) -> i32 {
        *self as i32
    }

    /// `=` 或 `in`
    pub fn is_equal_or_in(&self) -> bool {
        matches!(self, OptType::Equal | OptType::In)
    }
}

impl fmt::Display for OptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.ordinal())
    }
}

/// 区间端点的出现情况
#[derive(Debug, Default)]
struct RangeBounds {
    lt: bool,
    le: bool,
    gt: bool,
    ge: bool,
}

impl RangeBounds {
    /// 记录一个操作符，返回与之前端点组合后的类型
    fn merge(&mut self, operator: PredicateOperator) -> OptType {
        match operator {
            PredicateOperator::LessThan => {
                self.lt = true;
                if self.gt {
                    OptType::ClosedRange
                } else if self.ge {
                    OptType::ClosedRangeHalfEqual
                } else {
                    OptType::HalfOpenRange
                }
            }
            PredicateOperator::GreaterThan => {
                self.gt = true;
                if self.lt {
                    OptType::ClosedRange
                } else if self.le {
                    OptType::ClosedRangeHalfEqual
                } else {
                    OptType::HalfOpenRange
                }
            }
            PredicateOperator::LessThanOrEqual => {
                self.le = true;
                if self.gt {
                    OptType::ClosedRangeHalfEqual
                } else if self.ge {
                    OptType::ClosedRangeEqualAll
                } else {
                    OptType::HalfOpenRangeEqual
                }
            }
            PredicateOperator::GreaterThanOrEqual => {
                self.ge = true;
                if self.lt {
                    OptType::ClosedRangeHalfEqual
                } else if self.le {
                    OptType::ClosedRangeEqualAll
                } else {
                    OptType::HalfOpenRangeEqual
                }
            }
            PredicateOperator::Between | PredicateOperator::LikePrefix => {
                OptType::ClosedRangeEqualAll
            }
            PredicateOperator::Equal | PredicateOperator::Is => OptType::Equal,
            PredicateOperator::In => OptType::In,
            PredicateOperator::NotEqual | PredicateOperator::Not | PredicateOperator::NotIn => {
                OptType::NotEqual
            }
            PredicateOperator::Like
            | PredicateOperator::Exists
            | PredicateOperator::Limit
            | PredicateOperator::Order
            | PredicateOperator::Other => OptType::Other,
        }
    }
}

/// 计算某列用于代价估算的操作符类型
///
/// 该列不在过滤条件中时返回 `OptType::Unknown`
pub fn column_opt_for_cost(column_name: &str, filters: &[FilterColumn]) -> OptType {
    let mut bounds = RangeBounds::default();
    let mut opt_type = OptType::Unknown;

    for filter in filters.iter().filter(|f| f.column_name == column_name) {
        let merged = bounds.merge(filter.operator);
        if merged == OptType::Equal {
            return OptType::Equal;
        }
        opt_type = opt_type.max(merged);
    }

    opt_type
}
