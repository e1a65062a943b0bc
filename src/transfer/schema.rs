use crate::domain::{is_valid_label_key, is_valid_slug, ColumnType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    #[serde(default)]
    pub exported_at: Option<String>,
    pub charts: Vec<ChartRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRecord {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    /// 测量说明 key
    #[serde(default)]
    pub measurement_instructions: Vec<String>,
    pub columns: Vec<ColumnRecord>,
    /// 列名 -> 单元格值，缺失或 null 为空
    #[serde(default)]
    pub rows: Vec<BTreeMap<String, Option<CellJson>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub category: String,
    pub subcategory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_type: Option<String>,
}

/// 数字为英寸；`{min,max}` 为区间；`{labelKey}` 引用标签；字符串为文本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellJson {
    Number(f64),
    Text(String),
    #[serde(rename_all = "camelCase")]
    Label {
        label_key: String,
    },
    Range {
        min: f64,
        max: f64,
    },
}

impl ExportDocument {
    /// 导入前的整体校验，任何一处不合法整个请求返回 400
    pub fn validate(&self) -> Result<(), String> {
        if self.version != EXPORT_VERSION {
            return Err(format!("unsupported export version: {}", self.version));
        }
        let mut slugs = HashSet::new();
        for chart in &self.charts {
            chart
                .validate()
                .map_err(|e| format!("chart {:?}: {}", chart.slug, e))?;
            if !slugs.insert(chart.slug.as_str()) {
                return Err(format!("duplicate slug in document: {}", chart.slug));
            }
        }
        Ok(())
    }
}

impl ChartRecord {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".into());
        }
        if !is_valid_slug(&self.slug) {
            return Err("invalid slug".into());
        }
        if self.columns.is_empty() {
            return Err("at least one column is required".into());
        }
        let mut names = HashSet::new();
        for col in &self.columns {
            if col.name.trim().is_empty() {
                return Err("column name is required".into());
            }
            if !names.insert(col.name.to_lowercase()) {
                return Err(format!("duplicate column name: {}", col.name));
            }
            if let Some(t) = &col.label_type {
                if !is_valid_label_key(t) {
                    return Err(format!("invalid label type: {}", t));
                }
            }
        }
        let known: HashSet<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        for (idx, row) in self.rows.iter().enumerate() {
            for (key, value) in row {
                if !known.contains(key.as_str()) {
                    return Err(format!("row {} references unknown column {:?}", idx + 1, key));
                }
                match value {
                    Some(CellJson::Number(n)) if !n.is_finite() || *n < 0.0 => {
                        return Err(format!("row {}: invalid measurement {}", idx + 1, n));
                    }
                    Some(CellJson::Range { min, max })
                        if !min.is_finite() || !max.is_finite() || *min < 0.0 || min > max =>
                    {
                        return Err(format!("row {}: invalid range {}-{}", idx + 1, min, max));
                    }
                    Some(CellJson::Label { label_key }) if !is_valid_label_key(label_key) => {
                        return Err(format!("row {}: invalid label key {}", idx + 1, label_key));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
