use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{ConfigError, ConfigResult};
use crate::query::optimizer::cost::CostModelConfig;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "index-advisor".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct OptimizerConfig {
    pub cost: CostModelConfig,
    /// 多列 NDV 拆分搜索允许的最大列数，超过后只做整键查找
    pub max_ndv_split_columns: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cost: CostModelConfig::default(),
            max_ndv_split_columns: 8,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(field) = self.optimizer.cost.invalid_field() {
            return Err(ConfigError::Invalid(format!(
                "optimizer.cost.{} 必须为正数",
                field
            )));
        }
        if self.optimizer.max_ndv_split_columns == 0 {
            return Err(ConfigError::Invalid(
                "optimizer.max_ndv_split_columns 必须大于 0".to_string(),
            ));
        }
        if self.log.level.trim().is_empty() {
            return Err(ConfigError::Invalid("log.level 不能为空".to_string()));
        }
        Ok(())
    }
}
