//! 查询优化器模块
//!
//! 为查询推荐已有索引或新建索引
//!
//! ## 模块结构
//!
//! - `opt_type` - 谓词到代价类型的归类
//! - `annotator` - 候选索引标注
//! - `pruning` - Skyline 剪枝
//! - `rules` - 启发式规则
//! - `cost` - 代价模型与无统计信息打分
//! - `advisor` - 新建索引建议
//! - `recommendation` - 推荐结果与输出文案
//! - `optimizer` - 优化器入口
//!
//! ## 使用示例
//!
//! ```rust
//! use index_advisor::metadata::{Catalog, Index, IndexType, Table};
//! use index_advisor::query::optimizer::IndexOptimizer;
//! use index_advisor::query::shape::{PredicateOperator, QueryShape, TableShape};
//!
//! let catalog = Catalog::new(
//!     vec![Table::new("t1")
//!         .with_columns(["a", "b", "c"])
//!         .with_index(Index::new("PRIMARY", ["a", "b", "c"], IndexType::Primary))],
//!     Vec::new(),
//! );
//! let shape = QueryShape::new().with_table(
//!     TableShape::new("t1")
//!         .filter("a", PredicateOperator::Equal)
//!         .filter("b", PredicateOperator::Equal)
//!         .filter("c", PredicateOperator::Equal),
//! );
//!
//! let optimizer = IndexOptimizer::default();
//! let report = optimizer.optimize(&shape, &catalog).unwrap();
//! assert_eq!(
//!     report.recommendations[0].index_recommendation,
//!     "Among the existing indexes, the optimal index is: PRIMARY(a,b,c)"
//! );
//! ```

pub mod advisor;
pub mod annotator;
pub mod cost;
pub mod opt_type;
pub mod optimizer;
pub mod pruning;
pub mod recommendation;
pub mod rules;

pub use advisor::NewIndexAdvisor;
pub use annotator::{CandidateIndex, IndexAnnotator};
pub use cost::{CostChoice, CostEstimator, CostModel, CostModelConfig, UNBOUNDED_COST};
pub use opt_type::{column_opt_for_cost, OptType};
pub use optimizer::IndexOptimizer;
pub use pruning::{skyline_compare, CompareStat, SkylinePruner};
pub use recommendation::{HeuristicFinding, OptimizationReport, Recommendation};
pub use rules::{HeuristicRule, RuleContext, RuleOutcome, RuleSet};
