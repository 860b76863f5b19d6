// Query module for the index advisor
//
// - shape: predicate shape of a statement, produced by the external parser/visitor
// - optimizer: index annotation, pruning, rules, cost model and new index advice

pub mod optimizer;
pub mod shape;

pub use shape::{FilterColumn, OrderItem, Ordering, PredicateOperator, QueryShape, TableShape};
