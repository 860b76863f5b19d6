//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use index_advisor::query::optimizer::{OptimizationReport, Recommendation};

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(result: Result<T, E>, expected_msg: &str) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言集合包含指定数量的元素
pub fn assert_count<T>(collection: &[T], expected: usize, item_name: &str) {
    assert_eq!(
        collection.len(),
        expected,
        "{}数量不匹配: 期望 {}, 实际 {}",
        item_name,
        expected,
        collection.len()
    );
}

/// 断言报告中存在指定文案的推荐，返回该推荐
pub fn assert_recommends<'a>(report: &'a OptimizationReport, index_recommendation: &str) -> &'a Recommendation {
    report
        .recommendations
        .iter()
        .find(|r| r.index_recommendation == index_recommendation)
        .unwrap_or_else(|| {
            panic!(
                "期望推荐 '{}', 实际推荐 {:?}",
                index_recommendation, report.recommendations
            )
        })
}

/// 断言报告中没有新建索引的推荐
pub fn assert_no_new_index(report: &OptimizationReport) {
    assert!(
        report
            .recommendations
            .iter()
            .all(|r| !r.index_recommendation.starts_with("alter table")),
        "不应推荐新建索引, 实际推荐 {:?}",
        report.recommendations
    );
}
