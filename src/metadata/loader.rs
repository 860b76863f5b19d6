//! Catalog 加载模块
//!
//! 支持三种 JSON 形式：
//!
//! - `Native` - `Catalog` 自身的 serde 形式
//! - `InformationSchema` - 从 information_schema 导出的 tables/columns/indexes 行
//! - `ManualStatistics` - 手工录入的列基数 `manually_statistics`

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::catalog::{composite_key, Catalog, Column, Index, IndexType, Selectivity, Statistics, Table};
use crate::core::error::{CatalogError, CatalogResult};

/// 手工统计信息没有行数时使用的默认行数
const MANUAL_STATISTICS_ROWS: u64 = 100;

/// 主键索引名称
const PRIMARY_INDEX_NAME: &str = "PRIMARY";

/// Catalog JSON 形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Native,
    InformationSchema,
    ManualStatistics,
}

impl FromStr for CatalogFormat {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(CatalogFormat::Native),
            "information-schema" | "information_schema" => Ok(CatalogFormat::InformationSchema),
            "manual" | "manual-statistics" | "manually_statistics" => {
                Ok(CatalogFormat::ManualStatistics)
            }
            other => Err(CatalogError::InvalidCatalog(format!(
                "未知的 Catalog 格式: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InformationSchemaCatalog {
    #[serde(default)]
    tables: Vec<TableRow>,
    #[serde(default)]
    columns: Vec<ColumnRow>,
    #[serde(default)]
    indexes: Vec<IndexRow>,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    schema: Option<String>,
    table: String,
    #[serde(default)]
    rows: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ColumnRow {
    table: String,
    name: String,
    #[serde(default, rename = "type")]
    column_type: Option<String>,
    #[serde(default)]
    nullable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct IndexRow {
    table: String,
    name: String,
    column: String,
    #[serde(default)]
    cardinality: Option<i64>,
    #[serde(default)]
    unique: bool,
}

#[derive(Debug, Deserialize)]
struct ManualStatisticsCatalog {
    manually_statistics: Vec<ManualStatisticsRow>,
}

#[derive(Debug, Deserialize)]
struct ManualStatisticsRow {
    #[serde(default)]
    schema: Option<String>,
    table: String,
    name: String,
    #[serde(default)]
    cardinality: i64,
}

/// Catalog 加载器
pub struct CatalogLoader;

impl CatalogLoader {
    /// 从文件加载
    pub fn from_path<P: AsRef<Path>>(path: P, format: Option<CatalogFormat>) -> CatalogResult<Catalog> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content, format)
    }

    /// 从 JSON 文本加载，未指定格式时自动识别
    pub fn from_json_str(json: &str, format: Option<CatalogFormat>) -> CatalogResult<Catalog> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let format = format.unwrap_or_else(|| Self::detect(&value));
        log::debug!("按 {:?} 格式加载 Catalog", format);

        let catalog = match format {
            CatalogFormat::Native => serde_json::from_value(value)?,
            CatalogFormat::InformationSchema => {
                Self::from_information_schema(serde_json::from_value(value)?)
            }
            CatalogFormat::ManualStatistics => {
                Self::from_manual_statistics(serde_json::from_value(value)?)
            }
        };
        Self::validate(&catalog)?;
        Ok(catalog)
    }

    /// 根据顶层字段识别格式
    pub fn detect(value: &serde_json::Value) -> CatalogFormat {
        if value.get("manually_statistics").is_some() {
            CatalogFormat::ManualStatistics
        } else if value.get("table_list").is_some() || value.get("statistics_list").is_some() {
            CatalogFormat::Native
        } else {
            CatalogFormat::InformationSchema
        }
    }

    fn validate(catalog: &Catalog) -> CatalogResult<()> {
        let mut seen = HashSet::new();
        for table in &catalog.table_list {
            if table.name.trim().is_empty() {
                return Err(CatalogError::InvalidCatalog("表名不能为空".to_string()));
            }
            if !seen.insert(table.name.as_str()) {
                log::warn!("Catalog 中存在重复的表: {}，仅使用第一个", table.name);
            }
            for index in &table.indexes {
                if index.column_list.is_empty() {
                    return Err(CatalogError::InvalidCatalog(format!(
                        "索引 {}.{} 没有列",
                        table.name, index.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn from_information_schema(raw: InformationSchemaCatalog) -> Catalog {
        let mut table_list = Vec::with_capacity(raw.tables.len());
        let mut statistics_list = Vec::with_capacity(raw.tables.len());

        for table_row in &raw.tables {
            let table_name = table_row.table.as_str();
            let index_rows: Vec<&IndexRow> = raw
                .indexes
                .iter()
                .filter(|row| row.table == table_name)
                .collect();

            // 按名称分组，保持首次出现的顺序
            let mut index_order: Vec<&str> = Vec::new();
            let mut index_columns: HashMap<&str, Vec<&IndexRow>> = HashMap::new();
            for row in index_rows.iter().copied() {
                if !index_columns.contains_key(row.name.as_str()) {
                    index_order.push(row.name.as_str());
                }
                index_columns.entry(row.name.as_str()).or_default().push(row);
            }

            let has_named_primary = index_order.iter().any(|name| *name == PRIMARY_INDEX_NAME);
            let mut primary_assigned = false;
            let mut indexes = Vec::with_capacity(index_order.len());
            let mut selectivity_list: Vec<Selectivity> = Vec::new();
            let mut known_keys: HashSet<String> = HashSet::new();

            for name in index_order {
                let rows = &index_columns[name];
                let unique = rows.first().map(|r| r.unique).unwrap_or(false);
                let index_type = if name == PRIMARY_INDEX_NAME
                    || (unique && !has_named_primary && !primary_assigned)
                {
                    primary_assigned = true;
                    IndexType::Primary
                } else if unique {
                    IndexType::Unique
                } else {
                    IndexType::Normal
                };

                let column_list: Vec<String> = rows.iter().map(|r| r.column.clone()).collect();

                // 每一行的基数对应以该列结尾的索引前缀
                for (pos, row) in rows.iter().enumerate() {
                    let key = composite_key(&column_list[..=pos]);
                    if let Some(cardinality) = row.cardinality {
                        if known_keys.insert(key.clone()) {
                            selectivity_list.push(Selectivity::new(key, cardinality));
                        }
                    }
                }

                indexes.push(Index {
                    name: name.to_string(),
                    column_list,
                    index_type,
                });
            }

            let columns = raw
                .columns
                .iter()
                .filter(|c| c.table == table_name)
                .map(|c| Column {
                    name: c.name.clone(),
                    column_type: c.column_type.clone(),
                    nullable: c.nullable,
                })
                .collect();

            table_list.push(Table {
                schema: table_row.schema.clone(),
                name: table_name.to_string(),
                columns,
                indexes,
                row_count: table_row.rows.unwrap_or(0).max(0) as u64,
            });
            statistics_list.push(Statistics {
                schema: table_row.schema.clone(),
                table_name: table_name.to_string(),
                selectivity_list,
            });
        }

        Catalog::new(table_list, statistics_list)
    }

    fn from_manual_statistics(raw: ManualStatisticsCatalog) -> Catalog {
        let mut rows = raw.manually_statistics;
        rows.sort_by(|a, b| (&a.schema, &a.table).cmp(&(&b.schema, &b.table)));

        let mut table_list: Vec<Table> = Vec::new();
        let mut statistics_list: Vec<Statistics> = Vec::new();

        for row in rows {
            let is_same_table = table_list
                .last()
                .map(|t| t.schema == row.schema && t.name == row.table)
                .unwrap_or(false);
            if !is_same_table {
                table_list.push(Table {
                    schema: row.schema.clone(),
                    name: row.table.clone(),
                    columns: Vec::new(),
                    indexes: Vec::new(),
                    row_count: MANUAL_STATISTICS_ROWS,
                });
                statistics_list.push(Statistics {
                    schema: row.schema.clone(),
                    table_name: row.table.clone(),
                    selectivity_list: Vec::new(),
                });
            }
            if let (Some(table), Some(stats)) = (table_list.last_mut(), statistics_list.last_mut()) {
                table.columns.push(Column::new(row.name.clone()));
                stats
                    .selectivity_list
                    .push(Selectivity::new(row.name, row.cardinality));
            }
        }

        Catalog::new(table_list, statistics_list)
    }
}
