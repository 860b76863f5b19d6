//! Catalog 数据模型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 多列 NDV 键的列分隔符，例如 `a|b`
pub const NDV_KEY_SEPARATOR: &str = "|";

/// 索引类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexType {
    #[serde(rename = "primary", alias = "PRIMARY")]
    Primary,
    #[serde(rename = "unique", alias = "UNIQUE")]
    Unique,
    #[serde(rename = "normal", alias = "NORMAL")]
    Normal,
}

impl IndexType {
    /// 是否为主键或唯一索引
    pub fn is_unique(&self) -> bool {
        matches!(self, IndexType::Primary | IndexType::Unique)
    }
}

impl fmt::Display for IndexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexType::Primary => write!(f, "PRIMARY"),
            IndexType::Unique => write!(f, "UNIQUE"),
            IndexType::Normal => write!(f, "NORMAL"),
        }
    }
}

/// 列定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, rename = "type")]
    pub column_type: Option<String>,
    #[serde(default)]
    pub nullable: Option<bool>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
            nullable: None,
        }
    }
}

/// 已存在的索引定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub column_list: Vec<String>,
    pub index_type: IndexType,
}

impl Index {
    pub fn new(
        name: impl Into<String>,
        column_list: impl IntoIterator<Item = impl Into<String>>,
        index_type: IndexType,
    ) -> Self {
        Self {
            name: name.into(),
            column_list: column_list.into_iter().map(Into::into).collect(),
            index_type,
        }
    }
}

/// 表定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub row_count: u64,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
            columns: Vec::new(),
            indexes: Vec::new(),
            row_count: 0,
        }
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Column::new).collect();
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    pub fn with_row_count(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    /// 全部列名，按定义顺序
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// 单列或多列的 NDV
///
/// 多列键使用 `|` 连接，列顺序有意义：`a|b` 与 `b|a` 是不同的键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selectivity {
    pub key: String,
    pub ndv: i64,
}

impl Selectivity {
    pub fn new(key: impl Into<String>, ndv: i64) -> Self {
        Self {
            key: key.into(),
            ndv,
        }
    }

    /// 由有序列构造多列键
    pub fn composite<S: AsRef<str>>(columns: &[S], ndv: i64) -> Self {
        Self::new(composite_key(columns), ndv)
    }
}

/// 将有序列连接为 NDV 键
pub fn composite_key<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(NDV_KEY_SEPARATOR)
}

/// 表级统计信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub schema: Option<String>,
    pub table_name: String,
    #[serde(default)]
    pub selectivity_list: Vec<Selectivity>,
}

impl Statistics {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema: None,
            table_name: table_name.into(),
            selectivity_list: Vec::new(),
        }
    }

    pub fn with_ndv(mut self, key: impl Into<String>, ndv: i64) -> Self {
        self.selectivity_list.push(Selectivity::new(key, ndv));
        self
    }
}

/// 表、索引和统计信息的只读快照
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub table_list: Vec<Table>,
    #[serde(default)]
    pub statistics_list: Vec<Statistics>,
}

impl Catalog {
    pub fn new(table_list: Vec<Table>, statistics_list: Vec<Statistics>) -> Self {
        Self {
            table_list,
            statistics_list,
        }
    }

    /// 按表名查找表
    pub fn table(&self, table_name: &str) -> Option<&Table> {
        self.table_list.iter().find(|t| t.name == table_name)
    }

    /// 按表名查找统计信息
    pub fn statistics(&self, table_name: &str) -> Option<&Statistics> {
        self.statistics_list
            .iter()
            .find(|s| s.table_name == table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_type_unique() {
        assert!(IndexType::Primary.is_unique());
        assert!(IndexType::Unique.is_unique());
        assert!(!IndexType::Normal.is_unique());
    }

    #[test]
    fn test_composite_key_keeps_order() {
        assert_eq!(composite_key(&["a", "b"]), "a|b");
        assert_eq!(composite_key(&["b", "a"]), "b|a");
        assert_eq!(Selectivity::composite(&["x"], 3).key, "x");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(
            vec![Table::new("t1").with_row_count(10)],
            vec![Statistics::new("t1").with_ndv("a", 5)],
        );
        assert_eq!(catalog.table("t1").map(|t| t.row_count), Some(10));
        assert!(catalog.table("t2").is_none());
        assert_eq!(
            catalog.statistics("t1").map(|s| s.selectivity_list.len()),
            Some(1)
        );
    }

    #[test]
    fn test_catalog_serde_defaults() {
        let json = r#"{"table_list":[{"name":"t1","indexes":[{"name":"PRIMARY","column_list":["id"],"index_type":"primary"}]}]}"#;
        let catalog: Catalog = serde_json::from_str(json).expect("解析 Catalog 失败");
        let table = catalog.table("t1").expect("表应该存在");
        assert_eq!(table.row_count, 0);
        assert_eq!(table.indexes[0].index_type, IndexType::Primary);
        assert!(catalog.statistics_list.is_empty());
    }
}
