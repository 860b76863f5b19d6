//! 普通索引等值命中且不回表规则

use super::{HeuristicRule, RuleContext, RuleOutcome};
use crate::metadata::IndexType;
use crate::query::optimizer::annotator::CandidateIndex;

/// 普通索引全部列等值命中且不回表时，推荐列数最少的一个，列数相同取先出现者
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalIndexWithoutIndexBackRule;

impl HeuristicRule for NormalIndexWithoutIndexBackRule {
    fn name(&self) -> &'static str {
        "NormalIndexWithoutIndexBackRule"
    }

    fn apply(&self, ctx: &RuleContext<'_>) -> Option<RuleOutcome> {
        let mut best: Option<&CandidateIndex> = None;
        for candidate in ctx.candidates.iter().filter(|c| {
            c.index_type == IndexType::Normal && c.index_all_match && !c.index_back
        }) {
            match best {
                Some(current) if candidate.column_count >= current.column_count => {}
                _ => best = Some(candidate),
            }
        }
        best.cloned().map(RuleOutcome::Recommend)
    }
}
