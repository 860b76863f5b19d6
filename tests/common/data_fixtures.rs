//! 测试数据生成模块
//!
//! 提供常用的 Catalog 与查询形态

use index_advisor::metadata::{Catalog, Index, IndexType, Statistics, Table};
use index_advisor::query::shape::{PredicateOperator, QueryShape, TableShape};

/// 只有主键 (a, b, c) 的表
pub fn primary_only_catalog() -> Catalog {
    Catalog::new(
        vec![Table::new("t1")
            .with_columns(["a", "b", "c", "d"])
            .with_index(Index::new("PRIMARY", ["a", "b", "c"], IndexType::Primary))],
        Vec::new(),
    )
}

/// 索引 idx_a(a) 与 idx_ab(a, b)，带 NDV 统计
pub fn two_index_catalog() -> Catalog {
    Catalog::new(
        vec![Table::new("t1")
            .with_columns(["id", "a", "b", "c"])
            .with_index(Index::new("PRIMARY", ["id"], IndexType::Primary))
            .with_index(Index::new("idx_a", ["a"], IndexType::Normal))
            .with_index(Index::new("idx_ab", ["a", "b"], IndexType::Normal))
            .with_row_count(1_000_000)],
        vec![Statistics::new("t1").with_ndv("a", 10).with_ndv("a|b", 1000)],
    )
}

/// 单表查询形态
pub fn single_table_shape(table_name: &str, filters: &[(&str, PredicateOperator)]) -> QueryShape {
    let table = filters
        .iter()
        .fold(TableShape::new(table_name), |table, (column, op)| {
            table.filter(*column, *op)
        });
    QueryShape::new().with_table(table).with_projection(["*"])
}
