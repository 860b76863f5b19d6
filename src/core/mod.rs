// 错误和结果类型
pub mod error;

pub use error::{
    CatalogError, CatalogResult, ConfigError, ConfigResult, OptimizeError, OptimizeResult,
};
