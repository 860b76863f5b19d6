//! 唯一索引等值命中规则

use super::{HeuristicRule, RuleContext, RuleOutcome};
use crate::metadata::IndexType;

/// 主键或唯一索引的所有列都被等值命中时，直接推荐该索引
///
/// 最多返回一行，回表代价可以忽略
#[derive(Debug, Default, Clone, Copy)]
pub struct UniqueIndexWithIndexBackRule;

impl HeuristicRule for UniqueIndexWithIndexBackRule {
    fn name(&self) -> &'static str {
        "UniqueIndexWithIndexBackRule"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        ctx.candidates
            .iter()
            .find(|c| {
                matches!(c.index_type, IndexType::Primary | IndexType::Unique) && c.index_all_match
            })
            .cloned()
            .map(RuleOutcome::Recommend)
    }
}
