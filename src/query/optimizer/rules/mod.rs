//! 启发式规则模块
//!
//! 不依赖统计信息的索引选择规则，按顺序应用，第一条命中的规则生效：
//! - `FullScanRule` - 整条语句的全表扫描风险，输出到 findings 通道
//! - `UniqueIndexWithIndexBackRule` - 等值命中的主键/唯一索引
//! - `NormalIndexWithoutIndexBackRule` - 等值命中且不回表的普通索引
//!
//! 规则集在启动时显式构造并传入优化器，不存在全局单例。

use std::fmt;

use crate::query::optimizer::annotator::CandidateIndex;
use crate::query::optimizer::recommendation::HeuristicFinding;
use crate::query::shape::{FilterColumn, QueryShape};

pub mod full_scan;
pub mod normal_index;
pub mod unique_index;

pub use full_scan::FullScanRule;
pub use normal_index::NormalIndexWithoutIndexBackRule;
pub use unique_index::UniqueIndexWithIndexBackRule;

/// 规则执行的上下文，作用于单张表
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub table_name: &'a str,
    /// 整条语句的查询形态
    pub shape: &'a QueryShape,
    pub filters: &'a [FilterColumn],
    /// 剪枝后剩余的候选索引
    pub candidates: &'a [CandidateIndex],
}

/// 规则命中后的结果
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// 直接推荐某个已有索引
    Recommend(CandidateIndex),
    /// 风险提示，不产生索引推荐
    Finding(HeuristicFinding),
}

/// 启发式规则 trait
pub trait HeuristicRule: fmt::Debug + Send + Sync {
    /// 规则名称
    fn name(&self) -> &'static str;

    /// 应用规则，未命中返回 None
    fn apply(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome>;
}

/// 有序规则集
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Box<dyn HeuristicRule>>,
}

impl RuleSet {
    /// 空规则集
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl HeuristicRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// 按顺序应用规则，返回第一条命中规则的结果
    pub fn apply(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        for rule in &self.rules {
            if let Some(outcome) = rule.apply(ctx) {
                log::info!("表 {} 命中启发式规则 {}", ctx.table_name, rule.name());
                return Some(outcome);
            }
        }
        None
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::empty()
            .with_rule(FullScanRule)
            .with_rule(UniqueIndexWithIndexBackRule)
            .with_rule(NormalIndexWithoutIndexBackRule)
    }
}
