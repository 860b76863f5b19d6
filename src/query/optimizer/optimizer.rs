//! 索引优化器
//!
//! 对查询中的每张表依次执行：
//! 1. 标注全部已有索引
//! 2. Skyline 剪枝
//! 3. 启发式规则，命中索引推荐时跳过 CBO
//! 4. CBO（有统计信息）或无统计信息打分
//! 5. 剩余候选都无法完全等值命中时，尝试新建索引
//!
//! 每次调用的中间状态都是局部的，优化器本身只持有启动时构造的代价模型和规则集，
//! 可以在多个线程间共享。

use crate::config::OptimizerConfig;
use crate::core::error::OptimizeResult;
use crate::metadata::Catalog;
use crate::query::optimizer::advisor::NewIndexAdvisor;
use crate::query::optimizer::annotator::IndexAnnotator;
use crate::query::optimizer::cost::CostModel;
use crate::query::optimizer::pruning::SkylinePruner;
use crate::query::optimizer::recommendation::{OptimizationReport, Recommendation};
use crate::query::optimizer::rules::{RuleContext, RuleOutcome, RuleSet};
use crate::query::shape::{QueryShape, TableShape};

/// 索引优化器
#[derive(Debug)]
pub struct IndexOptimizer {
    cost_model: CostModel,
    rules: RuleSet,
    pruner: SkylinePruner,
    advisor: NewIndexAdvisor,
}

impl IndexOptimizer {
    pub fn new(cost_model: CostModel, rules: RuleSet) -> Self {
        Self {
            cost_model,
            rules,
            pruner: SkylinePruner::new(),
            advisor: NewIndexAdvisor::new(),
        }
    }

    /// 使用默认规则集
    pub fn from_config(config: &OptimizerConfig) -> Self {
        Self::new(CostModel::from_config(config), RuleSet::default())
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.cost_model
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// 优化单条语句，推荐按查询中表的顺序排列
    pub fn optimize(&self, shape: &QueryShape, catalog: &Catalog) -> OptimizeResult<OptimizationReport> {
        shape.validate()?;

        let mut report = OptimizationReport::new();
        for table_shape in &shape.table_list {
            self.optimize_table(shape, table_shape, catalog, &mut report);
        }
        Ok(report)
    }

    fn optimize_table(
        &self,
        shape: &QueryShape,
        table_shape: &TableShape,
        catalog: &Catalog,
        report: &mut OptimizationReport,
    ) {
        let table_name = table_shape.table_name.as_str();
        let filters = table_shape.filter_column_list.as_slice();
        let table = catalog.table(table_name);
        if table.is_none() {
            log::debug!("Catalog 中不存在表 {}，没有候选索引", table_name);
        }

        let annotator = IndexAnnotator::new(shape, table_shape, table);
        let candidates = table
            .map(|t| annotator.annotate_all(&t.indexes))
            .unwrap_or_default();
        let candidates = self.pruner.prune(candidates, filters.len());

        let table_rows = table.map(|t| t.row_count).unwrap_or(0);
        let estimator =
            self.cost_model
                .estimator(shape, filters, catalog.statistics(table_name), table_rows);

        let ctx = RuleContext {
            table_name,
            shape,
            filters,
            candidates: &candidates,
        };

        let mut min_cost = None;
        let selected = match self.rules.apply(&ctx) {
            Some(RuleOutcome::Recommend(candidate)) => Some(candidate),
            outcome => {
                // 语句级风险只记录一次
                if let Some(RuleOutcome::Finding(finding)) = outcome {
                    if !report.findings.iter().any(|f| f.rule == finding.rule) {
                        report.findings.push(finding);
                    }
                }
                let choice = estimator.choose(&candidates);
                min_cost = choice.min_cost;
                choice.recommended
            }
        };

        if let Some(candidate) = &selected {
            log::info!(
                "表 {} 的最优已有索引: {}({})",
                table_name,
                candidate.name,
                candidate.joined_columns()
            );
            report.recommendations.push(Recommendation::existing(candidate));
        }

        if !candidates.iter().any(|c| c.index_all_match) {
            if let Some(recommendation) =
                self.advisor
                    .advise(table_name, &annotator, &estimator, &shape.order_list, min_cost)
            {
                report.recommendations.push(recommendation);
            }
        }
    }

    /// 批量优化，单条语句失败时记录日志并继续
    pub fn optimize_batch(
        &self,
        shapes: &[QueryShape],
        catalog: &Catalog,
    ) -> Vec<OptimizeResult<OptimizationReport>> {
        shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| {
                let result = self.optimize(shape, catalog);
                if let Err(e) = &result {
                    log::warn!("第 {} 条语句优化失败: {}", i, e);
                }
                result
            })
            .collect()
    }
}

impl Default for IndexOptimizer {
    fn default() -> Self {
        Self::from_config(&OptimizerConfig::default())
    }
}
