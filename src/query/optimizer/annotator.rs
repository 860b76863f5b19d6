//! 索引标注模块
//!
//! 针对一条查询的谓词形态，为每个候选索引计算：
//! - 是否需要回表
//! - 能抽取的最长查询范围（索引列前缀）
//! - 是否所有索引列都是等值匹配
//! - 是否具有 interesting order（可消除排序或 MIN/MAX）
//!
//! 标注结果是每次调用新建的 `CandidateIndex`，不会修改调用方的 Catalog。

use serde::Serialize;

use crate::metadata::{Index, IndexType, Table};
use crate::query::optimizer::opt_type::{column_opt_for_cost, OptType};
use crate::query::shape::{FilterColumn, QueryShape, TableShape, ALL_COLUMNS};

/// 标注后的候选索引
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateIndex {
    pub name: String,
    pub column_list: Vec<String>,
    pub index_type: IndexType,
    pub column_count: usize,
    pub index_back: bool,
    /// 查询范围，`column_list` 的前缀
    pub extract_range: Vec<String>,
    pub index_all_match: bool,
    pub has_interesting_order: bool,
}

impl CandidateIndex {
    /// 索引列以逗号连接
    pub fn joined_columns(&self) -> String {
        self.column_list.join(",")
    }

    /// 是否具备范围或排序能力
    pub fn has_range_or_order(&self) -> bool {
        !self.extract_range.is_empty() || self.has_interesting_order
    }
}

/// 判断是否需要回表
///
/// 主键永远不回表。投影为 `*` 时要求表的全部列都在索引中，
/// 表列未知时视为需要回表；投影为空（写语句）视为覆盖。
pub fn is_index_back(
    idx_cols: &[String],
    filters: &[FilterColumn],
    projected_cols: &[String],
    order_cols: &[&str],
    index_type: IndexType,
    table_columns: &[&str],
) -> bool {
    if index_type == IndexType::Primary {
        return false;
    }

    let contains = |column: &str| idx_cols.iter().any(|c| c == column);

    for projected in projected_cols {
        if projected == ALL_COLUMNS {
            if table_columns.is_empty() || !table_columns.iter().all(|c| contains(c)) {
                return true;
            }
        } else if !contains(projected) {
            return true;
        }
    }

    if !filters.iter().all(|f| contains(&f.column_name)) {
        return true;
    }

    !order_cols.iter().all(|c| contains(c))
}

/// 抽取查询范围
///
/// 从左到右遍历索引列：没有谓词则停止；等值类谓词纳入并继续；
/// 范围类谓词纳入后停止；其余谓词直接停止。
pub fn extract_range(idx_cols: &[String], filters: &[FilterColumn]) -> Vec<String> {
    let mut range = Vec::new();

    for column in idx_cols {
        let mut predicates = filters.iter().filter(|f| &f.column_name == column).peekable();
        if predicates.peek().is_none() {
            break;
        }

        let mut has_equality = false;
        let mut has_range = false;
        for predicate in predicates {
            has_equality |= predicate.operator.is_equality();
            has_range |= predicate.operator.is_range();
        }

        if has_equality {
            range.push(column.clone());
        } else if has_range {
            range.push(column.clone());
            break;
        } else {
            break;
        }
    }

    range
}

/// 索引列是否全部为等值匹配
///
/// 与列顺序无关：每个索引列都必须出现在过滤条件中，且其所有谓词都是 `=`/`in`/`is`
pub fn index_all_match(idx_cols: &[String], filters: &[FilterColumn]) -> bool {
    if idx_cols.is_empty() || filters.is_empty() {
        return false;
    }

    idx_cols.iter().all(|column| {
        let mut predicates = filters.iter().filter(|f| &f.column_name == column).peekable();
        predicates.peek().is_some() && predicates.all(|f| f.operator.is_equality())
    })
}

/// 判断索引是否具有 interesting order
pub fn has_interesting_order(
    idx_cols: &[String],
    order_cols: &[&str],
    min_max_cols: &[String],
    extract_range: &[String],
    filters: &[FilterColumn],
) -> bool {
    if idx_cols.is_empty() {
        return false;
    }

    let remain: Vec<&str> = idx_cols
        .iter()
        .filter(|c| !extract_range.contains(*c))
        .map(String::as_str)
        .collect();
    let last_range = extract_range.last().map(String::as_str);

    if !min_max_cols.is_empty() {
        let is_min_max = |column: &str| min_max_cols.iter().any(|m| m == column);

        // max(b) where a = ?          index: a,b
        if remain.first().map(|c| is_min_max(*c)).unwrap_or(false) {
            return true;
        }
        // max(a) where a > ?          index: a
        if last_range.map(is_min_max).unwrap_or(false) {
            return true;
        }
    }

    if order_cols.is_empty() {
        return false;
    }

    // where a = ? order by b,c           index: b,c
    if starts_with(idx_cols.iter().map(String::as_str), order_cols) {
        return true;
    }

    // where a = ? and b = ? order by b           index: a,b
    if let Some(last) = last_range {
        if order_cols.contains(&last) {
            let prefix = &extract_range[..extract_range.len() - 1];
            if prefix
                .iter()
                .all(|c| column_opt_for_cost(c, filters) == OptType::Equal)
            {
                return true;
            }
        }
    }

    // where a = ? order by b           index: a,b,c
    if let Some(last) = last_range {
        if column_opt_for_cost(last, filters) == OptType::Equal
            && (starts_with(remain.iter().copied(), order_cols)
                || remain.first() == order_cols.first())
        {
            return true;
        }
    }

    false
}

/// 按逗号拼接后做字符串前缀比较
fn starts_with<'a>(columns: impl Iterator<Item = &'a str>, prefix: &[&str]) -> bool {
    let columns: Vec<&str> = columns.collect();
    columns.join(",").starts_with(&prefix.join(","))
}

/// 索引标注器
///
/// 绑定一条查询在某张表上的形态，对该表的索引逐个标注
#[derive(Debug)]
pub struct IndexAnnotator<'a> {
    filters: &'a [FilterColumn],
    projection: &'a [String],
    order_cols: Vec<&'a str>,
    min_max_cols: &'a [String],
    table_columns: Vec<&'a str>,
}

impl<'a> IndexAnnotator<'a> {
    /// 创建标注器，`table` 为 Catalog 中的表（不存在时为 None）
    pub fn new(shape: &'a QueryShape, table_shape: &'a TableShape, table: Option<&'a Table>) -> Self {
        Self {
            filters: &table_shape.filter_column_list,
            projection: &shape.projection_column_list,
            order_cols: shape.order_columns(),
            min_max_cols: &shape.min_max_list,
            table_columns: table.map(Table::column_names).unwrap_or_default(),
        }
    }

    /// 标注单个索引
    pub fn annotate(&self, index: &Index) -> CandidateIndex {
        let columns = &index.column_list;
        let index_back = is_index_back(
            columns,
            self.filters,
            self.projection,
            &self.order_cols,
            index.index_type,
            &self.table_columns,
        );
        let extract_range = extract_range(columns, self.filters);
        let index_all_match = index_all_match(columns, self.filters);
        let has_interesting_order = has_interesting_order(
            columns,
            &self.order_cols,
            self.min_max_cols,
            &extract_range,
            self.filters,
        );

        debug_assert!(columns.starts_with(&extract_range));
        debug_assert!(!index_all_match || extract_range == *columns);

        let candidate = CandidateIndex {
            name: index.name.clone(),
            column_list: columns.clone(),
            index_type: index.index_type,
            column_count: columns.len(),
            index_back,
            extract_range,
            index_all_match,
            has_interesting_order,
        };
        log::debug!(
            "索引标注: {}({}) range={:?} index_back={} all_match={} interesting_order={}",
            candidate.name,
            candidate.joined_columns(),
            candidate.extract_range,
            candidate.index_back,
            candidate.index_all_match,
            candidate.has_interesting_order
        );
        candidate
    }

    /// 标注一组索引，保持原有顺序
    pub fn annotate_all(&self, indexes: &[Index]) -> Vec<CandidateIndex> {
        indexes.iter().map(|index| self.annotate(index)).collect()
    }

    pub fn filters(&self) -> &'a [FilterColumn] {
        self.filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::shape::PredicateOperator::{self, *};
    use crate::query::shape::Ordering;

    fn cols(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    fn filters(list: &[(&str, PredicateOperator)]) -> Vec<FilterColumn> {
        list.iter()
            .map(|(name, op)| FilterColumn::new(*name, *op))
            .collect()
    }

    #[test]
    fn test_primary_never_index_back() {
        let f = filters(&[("z", Equal)]);
        for projection in [cols(&["*"]), cols(&["x", "y"]), cols(&[])] {
            assert!(!is_index_back(
                &cols(&["a"]),
                &f,
                &projection,
                &["q"],
                IndexType::Primary,
                &[]
            ));
        }
    }

    #[test]
    fn test_index_back_covering() {
        let idx = cols(&["a", "b"]);
        let f = filters(&[("a", Equal)]);
        assert!(!is_index_back(&idx, &f, &cols(&["b"]), &[], IndexType::Normal, &[]));
        assert!(is_index_back(&idx, &f, &cols(&["c"]), &[], IndexType::Normal, &[]));
        // 写语句没有投影
        assert!(!is_index_back(&idx, &f, &[], &["b"], IndexType::Normal, &[]));
        assert!(is_index_back(&idx, &f, &[], &["c"], IndexType::Normal, &[]));
        let f = filters(&[("c", Equal)]);
        assert!(is_index_back(&idx, &f, &[], &[], IndexType::Unique, &[]));
    }

    #[test]
    fn test_index_back_star_projection() {
        let idx = cols(&["a", "b"]);
        let star = cols(&["*"]);
        assert!(!is_index_back(&idx, &[], &star, &[], IndexType::Normal, &["a", "b"]));
        assert!(is_index_back(&idx, &[], &star, &[], IndexType::Normal, &["a", "b", "c"]));
        assert!(is_index_back(&idx, &[], &star, &[], IndexType::Normal, &[]));
    }

    #[test]
    fn test_extract_range() {
        let idx = cols(&["a", "b", "c"]);
        let f = filters(&[("a", Equal), ("b", GreaterThan), ("c", Equal)]);
        assert_eq!(extract_range(&idx, &f), cols(&["a", "b"]));

        let f = filters(&[("a", In), ("b", Is), ("c", LikePrefix)]);
        assert_eq!(extract_range(&idx, &f), cols(&["a", "b", "c"]));

        let f = filters(&[("a", Equal), ("b", NotEqual), ("c", Equal)]);
        assert_eq!(extract_range(&idx, &f), cols(&["a"]));

        let f = filters(&[("b", Equal)]);
        assert!(extract_range(&idx, &f).is_empty());

        // 同列上有等值谓词时按等值处理
        let f = filters(&[("a", GreaterThan), ("a", Equal), ("b", Between)]);
        assert_eq!(extract_range(&idx, &f), cols(&["a", "b"]));
    }

    #[test]
    fn test_extract_range_is_prefix() {
        let idx = cols(&["a", "b", "c", "d"]);
        let ops = [Equal, In, Is, GreaterThan, Between, NotEqual, Like, Other];
        for op_a in ops {
            for op_b in ops {
                let f = filters(&[("b", op_b), ("a", op_a), ("d", Equal)]);
                let range = extract_range(&idx, &f);
                assert!(idx.starts_with(&range));
            }
        }
    }

    #[test]
    fn test_index_all_match() {
        let f = filters(&[("b", Equal), ("a", In), ("c", GreaterThan)]);
        assert!(index_all_match(&cols(&["a", "b"]), &f));
        assert!(!index_all_match(&cols(&["a", "c"]), &f));
        assert!(!index_all_match(&cols(&["a", "d"]), &f));
        assert!(!index_all_match(&[], &f));
        assert!(!index_all_match(&cols(&["a"]), &[]));

        let f = filters(&[("a", Equal), ("a", GreaterThan)]);
        assert!(!index_all_match(&cols(&["a"]), &f));
    }

    #[test]
    fn test_all_match_implies_full_range() {
        let ops = [Equal, In, Is, GreaterThan, NotEqual];
        let idx = cols(&["a", "b"]);
        for op_a in ops {
            for op_b in ops {
                let f = filters(&[("a", op_a), ("b", op_b)]);
                if index_all_match(&idx, &f) {
                    assert_eq!(extract_range(&idx, &f), idx);
                }
            }
        }
    }

    #[test]
    fn test_interesting_order_by_prefix() {
        // where a = ? order by b,c    index: b,c
        let f = filters(&[("a", Equal)]);
        let idx = cols(&["b", "c"]);
        let range = extract_range(&idx, &f);
        assert!(has_interesting_order(&idx, &["b", "c"], &[], &range, &f));
        assert!(!has_interesting_order(&idx, &["c"], &[], &range, &f));
    }

    #[test]
    fn test_interesting_order_joined_prefix() {
        // 拼接后的字符串前缀：索引 ab,c 满足 order by a
        let f = filters(&[("x", NotEqual)]);
        let idx = cols(&["ab", "c"]);
        let range = extract_range(&idx, &f);
        assert!(has_interesting_order(&idx, &["a"], &[], &range, &f));
        assert!(has_interesting_order(&idx, &["ab", "c"], &[], &range, &f));
        assert!(!has_interesting_order(&idx, &["ab", "d"], &[], &range, &f));
    }

    #[test]
    fn test_interesting_order_after_equality() {
        // where a = ? order by b    index: a,b,c
        let f = filters(&[("a", Equal)]);
        let idx = cols(&["a", "b", "c"]);
        let range = extract_range(&idx, &f);
        assert!(has_interesting_order(&idx, &["b"], &[], &range, &f));

        // where a in (?) order by b    index: a,b
        let f = filters(&[("a", In)]);
        let range = extract_range(&idx, &f);
        assert!(!has_interesting_order(&idx, &["b"], &[], &range, &f));

        // where a = ? and b = ? order by b    index: a,b
        let f = filters(&[("a", Equal), ("b", Equal)]);
        let idx = cols(&["a", "b"]);
        let range = extract_range(&idx, &f);
        assert!(has_interesting_order(&idx, &["b"], &[], &range, &f));

        // where a > ? and b > ? order by b    index: a,b
        let f = filters(&[("a", GreaterThan), ("b", GreaterThan)]);
        let idx = cols(&["a", "b"]);
        let range = extract_range(&idx, &f);
        assert!(!has_interesting_order(&idx, &["b"], &[], &range, &f));
    }

    #[test]
    fn test_interesting_order_min_max() {
        // max(b) where a = ?    index: a,b
        let f = filters(&[("a", Equal)]);
        let idx = cols(&["a", "b"]);
        let range = extract_range(&idx, &f);
        assert!(has_interesting_order(&idx, &[], &cols(&["b"]), &range, &f));

        // max(a) where a > ?    index: a
        let f = filters(&[("a", GreaterThan)]);
        let idx = cols(&["a"]);
        let range = extract_range(&idx, &f);
        assert!(has_interesting_order(&idx, &[], &cols(&["a"]), &range, &f));
        assert!(!has_interesting_order(&idx, &[], &cols(&["z"]), &range, &f));
        assert!(!has_interesting_order(&[], &["a"], &cols(&["a"]), &[], &f));
    }

    #[test]
    fn test_annotate_is_deterministic() {
        let shape = QueryShape::new()
            .with_table(TableShape::new("t").filter("a", Equal).filter("b", GreaterThan))
            .with_projection(["a", "b", "c"])
            .with_order("b", Ordering::Asc);
        let table = Table::new("t").with_columns(["a", "b", "c"]);
        let annotator = IndexAnnotator::new(&shape, &shape.table_list[0], Some(&table));

        let index = Index::new("idx_a_b", ["a", "b"], IndexType::Normal);
        let first = annotator.annotate(&index);
        let second = annotator.annotate(&index);
        assert_eq!(first, second);
        assert_eq!(first.extract_range, cols(&["a", "b"]));
        assert!(first.index_back);
        assert!(!first.index_all_match);
        assert!(first.has_interesting_order);
        assert_eq!(first.column_count, 2);
    }
}
