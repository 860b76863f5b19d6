//! 推荐结果与输出文案
//!
//! 输出分两个通道：
//! - `recommendations`：已有最优索引或新建索引的推荐
//! - `findings`：启发式规则发现的风险（例如全表扫描），不属于索引推荐
//!
//! 文案会被下游按字面匹配，修改时需保持格式一致。

use serde::{Deserialize, Serialize};

use crate::core::error::OptimizeResult;
use crate::query::optimizer::annotator::CandidateIndex;

pub const BETTER_RANGE_INDEX: &str = "This is a better query range index";

pub const BETTER_RANGE_INDEX_WITHOUT_STATISTICS: &str = "This is a better query range index , but due to lack of statistics, it is not possible to calculate the specific improved performance";

pub const NOTHING_TO_DO: &str = "Current table index is so good , nothing to do";

/// 单条推荐
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub index_recommendation: String,
    pub diagnosis_reason: String,
}

impl Recommendation {
    /// 已有索引中的最优索引
    pub fn existing(candidate: &CandidateIndex) -> Self {
        Self {
            index_recommendation: format!(
                "Among the existing indexes, the optimal index is: {}({})",
                candidate.name,
                candidate.joined_columns()
            ),
            diagnosis_reason: diagnosis_reason(candidate),
        }
    }

    /// 新建索引
    pub fn new_index(table_name: &str, candidate: &CandidateIndex, reason: impl Into<String>) -> Self {
        Self {
            index_recommendation: format!(
                "alter table {} add index {}({})",
                table_name,
                candidate.name,
                candidate.joined_columns()
            ),
            diagnosis_reason: reason.into(),
        }
    }
}

/// 诊断信息，例如 `Query Range : [a, b] , Index Back : true , Interesting Order : false`
pub fn diagnosis_reason(candidate: &CandidateIndex) -> String {
    format!(
        "Query Range : [{}] , Index Back : {} , Interesting Order : {}",
        candidate.extract_range.join(", "),
        candidate.index_back,
        candidate.has_interesting_order
    )
}

/// 新索引相对已有最优索引的预计提升，保留两位小数
pub fn improvement_message(old_cost: f64, new_cost: f64) -> String {
    let pct = (old_cost - new_cost) / old_cost * 100.0;
    format!(
        "This new index is expected to improve performance by {:.2}% percent",
        pct
    )
}

/// 启发式规则发现的风险
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeuristicFinding {
    pub table_name: String,
    pub rule: String,
    pub message: String,
}

impl HeuristicFinding {
    pub fn new(table_name: impl Into<String>, rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// 一条语句的优化报告
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// 按查询中表的顺序排列
    pub recommendations: Vec<Recommendation>,
    pub findings: Vec<HeuristicFinding>,
}

impl OptimizationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// 摘要：没有推荐时给出固定文案，否则逐行列出推荐
    pub fn summary(&self) -> String {
        if self.recommendations.is_empty() {
            return NOTHING_TO_DO.to_string();
        }

        self.recommendations
            .iter()
            .map(|r| format!("{}\n{}", r.index_recommendation, r.diagnosis_reason))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// 批量结果转为 JSON 数组，失败的语句输出 `{"error": ...}`
    pub fn batch_to_json(
        results: &[OptimizeResult<OptimizationReport>],
    ) -> serde_json::Result<serde_json::Value> {
        let values = results
            .iter()
            .map(|result| match result {
                Ok(report) => serde_json::to_value(report),
                Err(e) => Ok(serde_json::json!({ "error": e.to_string() })),
            })
            .collect::<serde_json::Result<Vec<_>>>()?;
        Ok(serde_json::Value::Array(values))
    }
}
