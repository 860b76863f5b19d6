//! 查询形态模块
//!
//! 查询形态由外部的 SQL 解析器/访问器产生，描述每张表上的过滤列、
//! 投影列、排序列、MIN/MAX 目标列、LIMIT 以及 IN 列表长度。
//! 优化器只依赖这里的结构，不接触 SQL 文本或语法树。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{OptimizeError, OptimizeResult};

/// 投影中的 `*`
pub const ALL_COLUMNS: &str = "*";

/// 谓词操作符
///
/// 封闭枚举，未识别的操作符统一归为 `Other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PredicateOperator {
    /// `=`
    Equal,
    /// `in`
    In,
    /// `is`
    Is,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<=`
    LessThanOrEqual,
    /// `between`
    Between,
    /// 前缀匹配的 LIKE，例如 `like 'a%'`
    LikePrefix,
    /// 非前缀匹配的 LIKE，例如 `like '%a'`
    Like,
    /// `!=` / `<>`
    NotEqual,
    /// `not`
    Not,
    /// `not in`
    NotIn,
    /// `exists`
    Exists,
    /// 隐式的 LIMIT 标记
    Limit,
    /// 隐式的 ORDER 标记
    Order,
    /// 其他操作符
    Other,
}

impl PredicateOperator {
    /// 操作符的文本形式
    pub fn as_str(&self) -> &'static str {
        match self {
            PredicateOperator::Equal => "=",
            PredicateOperator::In => "in",
            PredicateOperator::Is => "is",
            PredicateOperator::GreaterThan => ">",
            PredicateOperator::LessThan => "<",
            PredicateOperator::GreaterThanOrEqual => ">=",
            PredicateOperator::LessThanOrEqual => "<=",
            PredicateOperator::Between => "between",
            PredicateOperator::LikePrefix => "like_prefix",
            PredicateOperator::Like => "like",
            PredicateOperator::NotEqual => "!=",
            PredicateOperator::Not => "not",
            PredicateOperator::NotIn => "not in",
            PredicateOperator::Exists => "exists",
            PredicateOperator::Limit => "limit",
            PredicateOperator::Order => "order",
            PredicateOperator::Other => "other",
        }
    }

    /// `=`、`in`、`is`：可以继续向后延伸查询范围
    pub fn is_equality(&self) -> bool {
        matches!(
            self,
            PredicateOperator::Equal | PredicateOperator::In | PredicateOperator::Is
        )
    }

    /// 范围类操作符：纳入查询范围后终止
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            PredicateOperator::GreaterThan
                | PredicateOperator::LessThan
                | PredicateOperator::GreaterThanOrEqual
                | PredicateOperator::LessThanOrEqual
                | PredicateOperator::Between
                | PredicateOperator::LikePrefix
        )
    }

    /// 是否可能抽取出查询范围，`is` 不计入
    pub fn is_seekable(&self) -> bool {
        self.is_range()
            || matches!(
                self,
                PredicateOperator::Equal | PredicateOperator::In | PredicateOperator::Exists
            )
    }
}

impl From<&str> for PredicateOperator {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => PredicateOperator::Equal,
            "in" => PredicateOperator::In,
            "is" => PredicateOperator::Is,
            ">" => PredicateOperator::GreaterThan,
            "<" => PredicateOperator::LessThan,
            ">=" => PredicateOperator::GreaterThanOrEqual,
            "<=" => PredicateOperator::LessThanOrEqual,
            "between" => PredicateOperator::Between,
            "like_prefix" => PredicateOperator::LikePrefix,
            "like" => PredicateOperator::Like,
            "!=" | "<>" => PredicateOperator::NotEqual,
            "not" => PredicateOperator::Not,
            "not in" | "not_in" => PredicateOperator::NotIn,
            "exists" => PredicateOperator::Exists,
            "limit" => PredicateOperator::Limit,
            "order" => PredicateOperator::Order,
            _ => PredicateOperator::Other,
        }
    }
}

impl From<String> for PredicateOperator {
    fn from(s: String) -> Self {
        PredicateOperator::from(s.as_str())
    }
}

impl From<PredicateOperator> for String {
    fn from(op: PredicateOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for PredicateOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 过滤列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterColumn {
    pub column_name: String,
    #[serde(rename = "opt", alias = "operator")]
    pub operator: PredicateOperator,
}

impl FilterColumn {
    pub fn new(column_name: impl Into<String>, operator: PredicateOperator) -> Self {
        Self {
            column_name: column_name.into(),
            operator,
        }
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ordering {
    #[serde(alias = "ASC")]
    Asc,
    #[serde(alias = "DESC")]
    Desc,
}

impl Default for Ordering {
    fn default() -> Self {
        Ordering::Asc
    }
}

/// 排序项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub column_name: String,
    #[serde(default)]
    pub ordering: Ordering,
}

impl OrderItem {
    pub fn new(column_name: impl Into<String>, ordering: Ordering) -> Self {
        Self {
            column_name: column_name.into(),
            ordering,
        }
    }
}

/// 单表的查询形态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    pub table_name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub filter_column_list: Vec<FilterColumn>,
}

impl TableShape {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            alias: String::new(),
            filter_column_list: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// 追加一个过滤列，保持源顺序
    pub fn filter(mut self, column_name: impl Into<String>, operator: PredicateOperator) -> Self {
        self.filter_column_list
            .push(FilterColumn::new(column_name, operator));
        self
    }
}

/// 语句级查询形态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryShape {
    #[serde(default)]
    pub table_list: Vec<TableShape>,
    #[serde(default)]
    pub projection_column_list: Vec<String>,
    #[serde(default)]
    pub order_list: Vec<OrderItem>,
    #[serde(default)]
    pub min_max_list: Vec<String>,
    #[serde(default)]
    pub limit_number: Option<u64>,
    /// 每个 IN 谓词的列表长度，按源顺序
    #[serde(default)]
    pub in_count_list: Vec<u64>,
}

impl QueryShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: TableShape) -> Self {
        self.table_list.push(table);
        self
    }

    pub fn with_projection(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.projection_column_list = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order(mut self, column_name: impl Into<String>, ordering: Ordering) -> Self {
        self.order_list.push(OrderItem::new(column_name, ordering));
        self
    }

    pub fn with_min_max(mut self, column_name: impl Into<String>) -> Self {
        self.min_max_list.push(column_name.into());
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit_number = Some(limit);
        self
    }

    pub fn with_in_count(mut self, count: u64) -> Self {
        self.in_count_list.push(count);
        self
    }

    /// 排序列名，按 ORDER BY 顺序
    pub fn order_columns(&self) -> Vec<&str> {
        self.order_list
            .iter()
            .map(|o| o.column_name.as_str())
            .collect()
    }

    /// LIMIT 是否存在且大于 0
    pub fn has_limit(&self) -> bool {
        self.limit_number.map(|l| l > 0).unwrap_or(false)
    }

    /// 查询语句带投影列，写语句的投影为空
    pub fn is_select(&self) -> bool {
        !self.projection_column_list.is_empty()
    }

    /// 语句中所有表的过滤列
    pub fn all_filters(&self) -> impl Iterator<Item = &FilterColumn> {
        self.table_list
            .iter()
            .flat_map(|t| t.filter_column_list.iter())
    }

    /// 校验查询形态
    pub fn validate(&self) -> OptimizeResult<()> {
        for table in &self.table_list {
            if table.table_name.trim().is_empty() {
                return Err(OptimizeError::InvalidQueryShape(
                    "table_name 不能为空".to_string(),
                ));
            }
            if let Some(filter) = table
                .filter_column_list
                .iter()
                .find(|f| f.column_name.trim().is_empty())
            {
                return Err(OptimizeError::InvalidQueryShape(format!(
                    "表 {} 的过滤列名为空 (opt: {})",
                    table.table_name, filter.operator
                )));
            }
        }
        if self.order_list.iter().any(|o| o.column_name.trim().is_empty()) {
            return Err(OptimizeError::InvalidQueryShape(
                "排序列名不能为空".to_string(),
            ));
        }
        Ok(())
    }
}
