//! 选择率估计模块
//!
//! - `NdvMap`：表级 NDV 查找表，支持多列 NDV 的拆分组合
//! - `SelectivityEstimator`：按操作符代价类型估算单列选择率

use std::collections::HashMap;

use crate::metadata::catalog::composite_key;
use crate::metadata::Statistics;
use crate::query::optimizer::cost::config::CostModelConfig;
use crate::query::optimizer::opt_type::OptType;

/// NDV 查找表
///
/// 只保存 NDV 大于 0 的条目，NDV 为 0 表示未知
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NdvMap {
    entries: HashMap<String, u64>,
    max_split_columns: usize,
}

impl NdvMap {
    /// 创建空表，`max_split_columns` 为允许拆分搜索的最大列数
    pub fn new(max_split_columns: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_split_columns,
        }
    }

    /// 从表级统计信息构建，丢弃非正的 NDV
    pub fn from_statistics(statistics: Option<&Statistics>, max_split_columns: usize) -> Self {
        let mut map = Self::new(max_split_columns);
        if let Some(statistics) = statistics {
            for selectivity in &statistics.selectivity_list {
                if selectivity.ndv > 0 {
                    map.insert(selectivity.key.clone(), selectivity.ndv as u64);
                } else {
                    log::warn!(
                        "表 {} 的 NDV 条目 {} 不可用: {}",
                        statistics.table_name,
                        selectivity.key,
                        selectivity.ndv
                    );
                }
            }
        }
        map
    }

    pub fn insert(&mut self, key: impl Into<String>, ndv: u64) {
        if ndv > 0 {
            self.entries.insert(key.into(), ndv);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 按键精确查找，未知返回 0
    pub fn get(&self, key: &str) -> u64 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// 有序多列的组合 NDV，未知返回 0
    ///
    /// 整键存在时直接返回；否则从大到小枚举列子集，把列拆成两部分，
    /// 两部分都可求出时取乘积最大的拆分。
    pub fn combined_ndv<S: AsRef<str>>(&self, columns: &[S]) -> u64 {
        let columns: Vec<&str> = columns.iter().map(|c| c.as_ref()).collect();
        if columns.is_empty() {
            return 0;
        }

        let full = self.get(&composite_key(&columns[..]));
        if full > 0 || columns.len() == 1 {
            return full;
        }
        if columns.len() > self.max_split_columns {
            return 0;
        }

        self.split_ndv(&columns)
    }

    fn split_ndv(&self, columns: &[&str]) -> u64 {
        let mut best = 0u64;

        for size in (1..columns.len()).rev() {
            for combination in combinations(columns.len(), size) {
                let picked: Vec<&str> = combination.iter().map(|&i| columns[i]).collect();
                let picked_ndv = self.get(&composite_key(&picked[..]));
                if picked_ndv == 0 {
                    continue;
                }

                let remain: Vec<&str> = columns
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !combination.contains(i))
                    .map(|(_, c)| *c)
                    .collect();
                let remain_ndv = self.combined_ndv(&remain[..]);
                if remain_ndv == 0 {
                    continue;
                }

                best = best.max(picked_ndv.saturating_mul(remain_ndv));
            }
        }

        best
    }
}

/// 按字典序枚举 `0..n` 中 `k` 个下标的组合
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut result = Vec::new();
    if k == 0 || k > n {
        return result;
    }

    let mut current: Vec<usize> = (0..k).collect();
    loop {
        result.push(current.clone());

        let mut i = k;
        while i > 0 && current[i - 1] == n - k + i - 1 {
            i -= 1;
        }
        if i == 0 {
            break;
        }
        current[i - 1] += 1;
        for j in i..k {
            current[j] = current[j - 1] + 1;
        }
    }

    result
}

/// 选择率估计器
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectivityEstimator {
    config: CostModelConfig,
}

impl SelectivityEstimator {
    pub fn new(config: CostModelConfig) -> Self {
        Self { config }
    }

    /// 单列选择率，`ndv` 为 0 表示未知
    pub fn op_selectivity(&self, opt_type: OptType, ndv: u64) -> f64 {
        let inverse = if ndv > 0 { 1.0 / ndv as f64 } else { 0.0 };

        match opt_type {
            OptType::Unknown => self.config.unknown_sel,
            OptType::ClosedRange => self.config.closed_range_sel,
            OptType::ClosedRangeHalfEqual => self.config.closed_range_sel + inverse,
            OptType::ClosedRangeEqualAll => self.config.closed_range_sel + 2.0 * inverse,
            OptType::HalfOpenRange => self.config.half_open_range_sel,
            OptType::HalfOpenRangeEqual => self.config.half_open_range_sel + inverse,
            OptType::NotEqual => {
                if ndv > 0 {
                    (ndv - 1) as f64 / ndv as f64
                } else {
                    self.config.not_equal_default_sel
                }
            }
            OptType::Equal | OptType::In | OptType::Other => self.config.default_sel,
        }
    }

    pub fn config(&self) -> &CostModelConfig {
        &self.config
    }
}
