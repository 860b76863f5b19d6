//! 全表扫描规则

use super::{HeuristicRule, RuleContext, RuleOutcome};
use crate::query::optimizer::recommendation::HeuristicFinding;

/// 语句级规则：查询语句没有 LIMIT，且所有表的过滤条件为空或全部无法抽取范围
/// （`!=`、`not in`、`is`、`like '%a'` 等）时命中。写语句不检查。
#[derive(Debug, Default, Clone, Copy)]
pub struct FullScanRule;

impl FullScanRule {
    pub const MESSAGE: &'static str = "Full table scan risk";
}

impl HeuristicRule for FullScanRule {
    fn name(&self) -> &'static str {
        "FullScanRule"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        if !ctx.shape.is_select() || ctx.shape.limit_number.is_some() {
            return None;
        }
        if ctx.shape.all_filters().any(|f| f.operator.is_seekable()) {
            return None;
        }

        Some(RuleOutcome::Finding(HeuristicFinding::new(
            ctx.table_name,
            self.name(),
            Self::MESSAGE,
        )))
    }
}
