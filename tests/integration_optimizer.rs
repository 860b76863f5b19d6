//! 索引优化器集成测试
//!
//! 测试范围：
//! - 主键等值命中、CBO 选择、全表扫描风险、新建索引四个典型场景
//! - 全表扫描风险按整条语句判断
//! - 新建索引的预计提升与缺少统计信息的提示
//! - 多表顺序、批量优化、并发调用
//! - 标注与剪枝的性质

mod common;

use common::{
    assertions::{assert_count, assert_err_with, assert_no_new_index, assert_ok, assert_recommends},
    data_fixtures::{primary_only_catalog, single_table_shape, two_index_catalog},
};
use index_advisor::config::OptimizerConfig;
use index_advisor::metadata::{Catalog, Index, IndexType, Statistics, Table};
use index_advisor::query::optimizer::{
    skyline_compare, CostModel, IndexAnnotator, IndexOptimizer, RuleSet,
};
use index_advisor::query::shape::{Ordering, PredicateOperator::*, QueryShape, TableShape};

// ==================== 典型场景 ====================

#[test]
fn test_primary_key_all_equal() {
    let optimizer = IndexOptimizer::default();
    let shape = single_table_shape("t1", &[("a", Equal), ("b", Equal), ("c", Equal)]);

    let report = assert_ok(optimizer.optimize(&shape, &primary_only_catalog()));
    assert_count(&report.recommendations, 1, "推荐");
    let rec = assert_recommends(
        &report,
        "Among the existing indexes, the optimal index is: PRIMARY(a,b,c)",
    );
    assert_eq!(
        rec.diagnosis_reason,
        "Query Range : [a, b, c] , Index Back : false , Interesting Order : false"
    );
    assert!(report.findings.is_empty());
}

#[test]
fn test_cbo_prefers_more_selective_index() {
    let optimizer = IndexOptimizer::default();
    let shape = single_table_shape("t1", &[("a", Equal), ("b", Equal)]);

    let report = assert_ok(optimizer.optimize(&shape, &two_index_catalog()));
    assert_count(&report.recommendations, 1, "推荐");
    assert_recommends(
        &report,
        "Among the existing indexes, the optimal index is: idx_ab(a,b)",
    );
    assert_no_new_index(&report);
}

#[test]
fn test_full_scan_finding() {
    let catalog = Catalog::new(
        vec![Table::new("t1")
            .with_columns(["id", "c1"])
            .with_index(Index::new("idx_c1", ["c1"], IndexType::Normal))],
        Vec::new(),
    );
    let shape = single_table_shape("t1", &[("c1", NotEqual)]);

    let optimizer = IndexOptimizer::default();
    let report = assert_ok(optimizer.optimize(&shape, &catalog));
    assert_count(&report.findings, 1, "风险");
    assert_eq!(report.findings[0].table_name, "t1");
    assert_eq!(report.findings[0].rule, "FullScanRule");
    assert_eq!(report.findings[0].message, "Full table scan risk");

    // 推荐结果与不启用任何规则时一致
    let without_rules = IndexOptimizer::new(CostModel::default(), RuleSet::empty());
    let baseline = assert_ok(without_rules.optimize(&shape, &catalog));
    assert_eq!(report.recommendations, baseline.recommendations);
    assert!(baseline.findings.is_empty());

    // 有 LIMIT 时不提示
    let limited = shape.clone().with_limit(10);
    let report = assert_ok(optimizer.optimize(&limited, &catalog));
    assert!(report.findings.is_empty());
}

#[test]
fn test_full_scan_is_statement_level() {
    let catalog = Catalog::new(
        vec![
            Table::new("t1").with_columns(["a", "b"]),
            Table::new("t2").with_columns(["c", "d"]),
        ],
        Vec::new(),
    );
    let optimizer = IndexOptimizer::default();

    // 另一张表上有可以抽取范围的条件
    let join = QueryShape::new()
        .with_table(TableShape::new("t1").filter("a", Equal))
        .with_table(TableShape::new("t2").filter("c", NotEqual))
        .with_projection(["*"]);
    assert!(assert_ok(optimizer.optimize(&join, &catalog)).findings.is_empty());

    // 写语句
    let update = QueryShape::new().with_table(TableShape::new("t2").filter("c", NotEqual));
    assert!(assert_ok(optimizer.optimize(&update, &catalog)).findings.is_empty());

    // is 无法抽取范围
    let is_null = single_table_shape("t1", &[("a", Is)]);
    let report = assert_ok(optimizer.optimize(&is_null, &catalog));
    assert_count(&report.findings, 1, "风险");
    assert_eq!(report.findings[0].rule, "FullScanRule");
}

#[test]
fn test_new_index_without_statistics() {
    let catalog = Catalog::new(
        vec![Table::new("t1").with_columns(["id", "x", "y", "z"])],
        Vec::new(),
    );
    let shape = single_table_shape("t1", &[("x", Equal), ("y", GreaterThan)]);

    let report = assert_ok(IndexOptimizer::default().optimize(&shape, &catalog));
    assert_count(&report.recommendations, 1, "推荐");
    let rec = assert_recommends(&report, "alter table t1 add index idx_sqless_x_y(x,y)");
    assert_eq!(rec.diagnosis_reason, "This is a better query range index");
}

// ==================== 新建索引的决策 ====================

fn range_catalog(statistics: Statistics) -> Catalog {
    Catalog::new(
        vec![Table::new("t1")
            .with_columns(["id", "a", "b"])
            .with_index(Index::new("PRIMARY", ["id"], IndexType::Primary))
            .with_index(Index::new("idx_b", ["b"], IndexType::Normal))
            .with_row_count(1000)],
        vec![statistics],
    )
}

#[test]
fn test_new_index_improvement() {
    let catalog = range_catalog(Statistics::new("t1").with_ndv("a", 10).with_ndv("b", 100));
    let shape = single_table_shape("t1", &[("a", Equal), ("b", GreaterThan)]);

    let report = assert_ok(IndexOptimizer::default().optimize(&shape, &catalog));
    assert_count(&report.recommendations, 2, "推荐");
    assert_recommends(
        &report,
        "Among the existing indexes, the optimal index is: idx_b(b)",
    );
    let rec = assert_recommends(&report, "alter table t1 add index idx_sqless_a_b(a,b)");
    assert_eq!(
        rec.diagnosis_reason,
        "This new index is expected to improve performance by 89.90% percent"
    );
}

#[test]
fn test_new_index_has_no_index_back_cost() {
    let catalog = Catalog::new(
        vec![Table::new("t")
            .with_columns(["id", "a", "b", "d", "e"])
            .with_index(Index::new("PRIMARY", ["id"], IndexType::Primary))
            .with_index(Index::new("idx_b", ["b"], IndexType::Normal))
            .with_row_count(1000)],
        vec![Statistics::new("t").with_ndv("a", 10).with_ndv("b", 100)],
    );
    let shape = single_table_shape("t", &[("a", Equal), ("b", GreaterThan)])
        .with_order("d", Ordering::Asc);

    let report = assert_ok(IndexOptimizer::default().optimize(&shape, &catalog));
    assert_count(&report.recommendations, 2, "推荐");
    assert_recommends(
        &report,
        "Among the existing indexes, the optimal index is: idx_b(b)",
    );
    let rec = assert_recommends(&report, "alter table t add index idx_sqless_a_b_d(a,b,d)");
    assert_eq!(
        rec.diagnosis_reason,
        "This new index is expected to improve performance by 89.90% percent"
    );
}

#[test]
fn test_new_index_unmeasurable() {
    let catalog = range_catalog(Statistics::new("t1").with_ndv("b", 100));
    let shape = single_table_shape("t1", &[("a", Equal), ("b", GreaterThan)]);

    let report = assert_ok(IndexOptimizer::default().optimize(&shape, &catalog));
    let rec = assert_recommends(&report, "alter table t1 add index idx_sqless_a_b(a,b)");
    assert_eq!(
        rec.diagnosis_reason,
        "This is a better query range index , but due to lack of statistics, it is not possible to calculate the specific improved performance"
    );
}

// ==================== 多表与批量 ====================

#[test]
fn test_recommendations_follow_table_order() {
    let mut catalog = two_index_catalog();
    catalog.table_list.push(
        Table::new("t2")
            .with_columns(["k", "v"])
            .with_index(Index::new("PRIMARY", ["k"], IndexType::Primary)),
    );
    let shape = QueryShape::new()
        .with_table(TableShape::new("t2").with_alias("b").filter("k", Equal))
        .with_table(TableShape::new("t1").with_alias("a").filter("a", Equal).filter("b", Equal))
        .with_projection(["*"]);

    let report = assert_ok(IndexOptimizer::default().optimize(&shape, &catalog));
    assert_count(&report.recommendations, 2, "推荐");
    assert!(report.recommendations[0].index_recommendation.ends_with("PRIMARY(k)"));
    assert!(report.recommendations[1].index_recommendation.ends_with("idx_ab(a,b)"));
}

#[test]
fn test_batch_isolates_failures() {
    let optimizer = IndexOptimizer::from_config(&OptimizerConfig::default());
    let shapes = vec![
        single_table_shape("t1", &[("a", Equal), ("b", Equal)]),
        single_table_shape("t1", &[("", Equal)]),
        single_table_shape("t1", &[("a", Equal)]),
    ];

    let results = optimizer.optimize_batch(&shapes, &two_index_catalog());
    assert_count(&results, 3, "结果");
    assert!(results[0].is_ok());
    assert_err_with(results[1].clone(), "无效的查询形态");
    assert!(results[2].is_ok());
}

#[test]
fn test_concurrent_calls() {
    let optimizer = IndexOptimizer::default();
    let catalog = two_index_catalog();
    let shape = single_table_shape("t1", &[("a", Equal), ("b", Equal)]);
    let expected = assert_ok(optimizer.optimize(&shape, &catalog));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| optimizer.optimize(&shape, &catalog)))
            .collect();
        for handle in handles {
            let report = assert_ok(handle.join().expect("线程不应 panic"));
            assert_eq!(report, expected);
        }
    });
}

#[test]
fn test_catalog_is_not_mutated() {
    let catalog = two_index_catalog();
    let snapshot = catalog.clone();
    let shape = single_table_shape("t1", &[("a", Equal), ("b", GreaterThan)])
        .with_order("b", Ordering::Asc)
        .with_limit(5);

    assert_ok(IndexOptimizer::default().optimize(&shape, &catalog));
    assert_eq!(catalog, snapshot);
}

// ==================== 性质 ====================

#[test]
fn test_annotation_properties() {
    let catalog = two_index_catalog();
    let table = catalog.table("t1").expect("表应存在");
    let operators = [Equal, In, GreaterThan, Between, NotEqual, Like];

    for op_a in operators {
        for op_b in operators {
            let shape = single_table_shape("t1", &[("b", op_b), ("a", op_a)])
                .with_order("b", Ordering::Desc);
            let annotator = IndexAnnotator::new(&shape, &shape.table_list[0], Some(table));
            let candidates = annotator.annotate_all(&table.indexes);

            for candidate in &candidates {
                assert!(candidate.column_list.starts_with(&candidate.extract_range));
                assert_eq!(candidate.column_count, candidate.column_list.len());
                if candidate.index_all_match {
                    assert_eq!(candidate.extract_range, candidate.column_list);
                }
                if candidate.index_type == IndexType::Primary {
                    assert!(!candidate.index_back);
                }
            }
            assert_eq!(candidates, annotator.annotate_all(&table.indexes));

            for left in &candidates {
                for right in &candidates {
                    assert_eq!(
                        skyline_compare(left, right, 2),
                        skyline_compare(right, left, 2).inverse()
                    );
                }
            }
        }
    }
}
