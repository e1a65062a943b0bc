use crate::units::{inches_to_cm, normalize_inches};
use serde::{Deserialize, Serialize};

/// 单元格的值。一个单元格最多只有一种表示。
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    /// 单值，单位英寸
    Measurement(f64),
    /// 区间，单位英寸
    Range { min: f64, max: f64 },
    Label(i32),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error("measurement must not be negative")]
    Negative,
    #[error("range minimum {min} is greater than maximum {max}")]
    InvertedRange { min: f64, max: f64 },
    #[error("measurement requires inches or cm")]
    MissingMeasurement,
    #[error("not a number: {0}")]
    InvalidNumber(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    pub fn measurement(inches: f64) -> Result<Self, CellError> {
        if !inches.is_finite() {
            return Err(CellError::InvalidNumber(inches.to_string()));
        }
        if inches < 0.0 {
            return Err(CellError::Negative);
        }
        Ok(CellValue::Measurement(inches))
    }

    pub fn range(min: f64, max: f64) -> Result<Self, CellError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(CellError::InvalidNumber(format!("{}-{}", min, max)));
        }
        if min < 0.0 || max < 0.0 {
            return Err(CellError::Negative);
        }
        if min > max {
            return Err(CellError::InvertedRange { min, max });
        }
        Ok(CellValue::Range { min, max })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn label_id(&self) -> Option<i32> {
        match self {
            CellValue::Label(id) => Some(*id),
            _ => None,
        }
    }

    /// 落库字段：只填充一组，其余为 NULL；厘米一律由英寸推导
    pub fn to_columns(&self) -> CellColumns {
        let mut cols = CellColumns::default();
        match self {
            CellValue::Empty => {}
            CellValue::Text(t) => cols.value_text = Some(t.clone()),
            CellValue::Measurement(i) => {
                cols.value_inches = Some(*i);
                cols.value_cm = Some(inches_to_cm(*i));
            }
            CellValue::Range { min, max } => {
                cols.value_min_inches = Some(*min);
                cols.value_max_inches = Some(*max);
                cols.value_min_cm = Some(inches_to_cm(*min));
                cols.value_max_cm = Some(inches_to_cm(*max));
            }
            CellValue::Label(id) => cols.label_id = Some(*id),
        }
        cols
    }

    /// 读取顺序：label > range > measurement > text
    pub fn from_columns(cols: &CellColumns) -> Self {
        if let Some(id) = cols.label_id {
            return CellValue::Label(id);
        }
        let min = normalize_inches(cols.value_min_inches, cols.value_min_cm);
        let max = normalize_inches(cols.value_max_inches, cols.value_max_cm);
        if let (Some(min), Some(max)) = (min, max) {
            return CellValue::Range { min, max };
        }
        if let Some(i) = normalize_inches(cols.value_inches, cols.value_cm) {
            return CellValue::Measurement(i);
        }
        match &cols.value_text {
            Some(t) => CellValue::text(t.clone()),
            None => CellValue::Empty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellColumns {
    pub value_text: Option<String>,
    pub value_inches: Option<f64>,
    pub value_cm: Option<f64>,
    pub value_min_inches: Option<f64>,
    pub value_max_inches: Option<f64>,
    pub value_min_cm: Option<f64>,
    pub value_max_cm: Option<f64>,
    pub label_id: Option<i32>,
}

/// 管理端提交的单元格
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellInput {
    Empty,
    Text {
        text: String,
    },
    Measurement {
        inches: Option<f64>,
        cm: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Range {
        min_inches: Option<f64>,
        max_inches: Option<f64>,
        min_cm: Option<f64>,
        max_cm: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Label {
        label_id: i32,
    },
}

impl CellInput {
    /// 提交的 cm 只有在缺少英寸时才会被使用
    pub fn into_value(self) -> Result<CellValue, CellError> {
        match self {
            CellInput::Empty => Ok(CellValue::Empty),
            CellInput::Text { text } => Ok(CellValue::text(text)),
            CellInput::Measurement { inches, cm } => {
                let inches = normalize_inches(inches, cm).ok_or(CellError::MissingMeasurement)?;
                CellValue::measurement(inches)
            }
            CellInput::Range {
                min_inches,
                max_inches,
                min_cm,
                max_cm,
            } => {
                let min = normalize_inches(min_inches, min_cm).ok_or(CellError::MissingMeasurement)?;
                let max = normalize_inches(max_inches, max_cm).ok_or(CellError::MissingMeasurement)?;
                CellValue::range(min, max)
            }
            CellInput::Label { label_id } => Ok(CellValue::Label(label_id)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DualUnit {
    pub inches: f64,
    pub cm: f64,
}

impl DualUnit {
    pub fn from_inches(inches: f64) -> Self {
        Self {
            inches,
            cm: inches_to_cm(inches),
        }
    }
}

/// 对外输出：度量值同时携带英寸和厘米
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellView {
    Empty,
    Text {
        text: String,
    },
    Measurement {
        inches: f64,
        cm: f64,
    },
    Range {
        min: DualUnit,
        max: DualUnit,
    },
    #[serde(rename_all = "camelCase")]
    Label {
        label_id: i32,
        key: String,
        display_value: String,
    },
}

impl CellView {
    /// label 由调用方解析成 (key, displayValue)；找不到时退化为空
    pub fn from_value(value: &CellValue, label: Option<(&str, &str)>) -> Self {
        match value {
            CellValue::Empty => CellView::Empty,
            CellValue::Text(t) => CellView::Text { text: t.clone() },
            CellValue::Measurement(i) => {
                let d = DualUnit::from_inches(*i);
                CellView::Measurement {
                    inches: d.inches,
                    cm: d.cm,
                }
            }
            CellValue::Range { min, max } => CellView::Range {
                min: DualUnit::from_inches(*min),
                max: DualUnit::from_inches(*max),
            },
            CellValue::Label(id) => match label {
                Some((key, display)) => CellView::Label {
                    label_id: *id,
                    key: key.to_string(),
                    display_value: display.to_string(),
                },
                None => CellView::Empty,
            },
        }
    }
}
