use crate::domain::{CellError, CellValue, ColumnType};
use crate::units::{cm_to_inches, format_number};

#[derive(Debug, Clone, PartialEq)]
pub struct LabelOption {
    pub id: i32,
    pub key: String,
    pub display_value: String,
    pub label_type: String,
}

/// 单元格在输入框里的文本形式
pub fn display_text(value: &CellValue, labels: &[LabelOption]) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Text(t) => t.clone(),
        CellValue::Measurement(i) => format_number(*i),
        CellValue::Range { min, max } => format!("{}-{}", format_number(*min), format_number(*max)),
        CellValue::Label(id) => labels
            .iter()
            .find(|l| l.id == *id)
            .map(|l| l.display_value.clone())
            .unwrap_or_default(),
    }
}

/// 按列类型解析输入：
/// - MEASUREMENT: `34` / `34.5` / `34-36` / `34 – 36` / `34 to 36` / `86 cm`
/// - 基于 label 的列：按 displayValue 或 key 匹配，匹配不到存为文本
/// - TEXT: 原样
pub fn parse_cell_input(
    input: &str,
    column_type: ColumnType,
    label_type: Option<&str>,
    labels: &[LabelOption],
) -> Result<CellValue, CellError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(CellValue::Empty);
    }
    match column_type {
        ColumnType::Measurement => parse_measurement(input),
        ColumnType::Text => Ok(CellValue::text(input)),
        _ => Ok(match find_label(input, label_type, labels) {
            Some(id) => CellValue::Label(id),
            None => CellValue::text(input),
        }),
    }
}

fn find_label(input: &str, label_type: Option<&str>, labels: &[LabelOption]) -> Option<i32> {
    labels
        .iter()
        .filter(|l| label_type.map_or(true, |t| l.label_type == t))
        .find(|l| {
            l.display_value.eq_ignore_ascii_case(input) || l.key.eq_ignore_ascii_case(input)
        })
        .map(|l| l.id)
}

fn parse_measurement(input: &str) -> Result<CellValue, CellError> {
    if input.starts_with('-') {
        return Err(CellError::Negative);
    }
    let normalized = input.to_ascii_lowercase().replace(" to ", "-");
    let parts: Vec<&str> = normalized
        .split(|c| c == '-' || c == '–' || c == '—')
        .map(str::trim)
        .collect();
    match parts.as_slice() {
        [single] => CellValue::measurement(parse_number(single)?),
        [min, max] => CellValue::range(parse_number(min)?, parse_number(max)?),
        _ => Err(CellError::InvalidNumber(input.to_string())),
    }
}

/// 支持 `"` / `in` 后缀（英寸）以及 `cm` 后缀（换算成英寸）
fn parse_number(raw: &str) -> Result<f64, CellError> {
    let lower = raw.trim().to_ascii_lowercase();
    let (number, is_cm) = if let Some(n) = lower.strip_suffix("cm") {
        (n.trim(), true)
    } else if let Some(n) = lower.strip_suffix("in") {
        (n.trim(), false)
    } else if let Some(n) = lower.strip_suffix('"') {
        (n.trim(), false)
    } else {
        (lower.as_str(), false)
    };
    let value: f64 = number
        .parse()
        .map_err(|_| CellError::InvalidNumber(raw.trim().to_string()))?;
    if !value.is_finite() {
        return Err(CellError::InvalidNumber(raw.trim().to_string()));
    }
    Ok(if is_cm { cm_to_inches(value) } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<LabelOption> {
        vec![
            LabelOption {
                id: 1,
                key: "SIZE_SM".into(),
                display_value: "SM".into(),
                label_type: "ALPHA".into(),
            },
            LabelOption {
                id: 2,
                key: "BAND_34".into(),
                display_value: "34".into(),
                label_type: "BAND".into(),
            },
        ]
    }

    #[test]
    fn measurement_inputs() {
        let p = |s| parse_cell_input(s, ColumnType::Measurement, None, &[]);
        assert_eq!(p("34"), Ok(CellValue::Measurement(34.0)));
        assert_eq!(p(" 34.5\" "), Ok(CellValue::Measurement(34.5)));
        assert_eq!(p("34-36"), Ok(CellValue::Range { min: 34.0, max: 36.0 }));
        assert_eq!(p("34 – 36"), Ok(CellValue::Range { min: 34.0, max: 36.0 }));
        assert_eq!(p("34 to 36"), Ok(CellValue::Range { min: 34.0, max: 36.0 }));
        assert_eq!(p("86.36 cm"), Ok(CellValue::Measurement(34.0)));
        assert_eq!(p(""), Ok(CellValue::Empty));
        assert!(matches!(p("abc"), Err(CellError::InvalidNumber(_))));
        assert!(matches!(p("36-34"), Err(CellError::InvertedRange { .. })));
        assert_eq!(p("-3"), Err(CellError::Negative));
        assert!(p("1-2-3").is_err());
    }

    #[test]
    fn label_columns_match_display_value_or_key() {
        let labels = labels();
        assert_eq!(
            parse_cell_input("sm", ColumnType::SizeLabel, None, &labels),
            Ok(CellValue::Label(1))
        );
        assert_eq!(
            parse_cell_input("size_sm", ColumnType::SizeLabel, Some("ALPHA"), &labels),
            Ok(CellValue::Label(1))
        );
        // labelType 过滤
        assert_eq!(
            parse_cell_input("SM", ColumnType::SizeLabel, Some("BAND"), &labels),
            Ok(CellValue::Text("SM".into()))
        );
        assert_eq!(
            parse_cell_input("34", ColumnType::BandSize, Some("BAND"), &labels),
            Ok(CellValue::Label(2))
        );
    }

    #[test]
    fn text_columns_keep_input() {
        assert_eq!(
            parse_cell_input("34-36", ColumnType::Text, None, &[]),
            Ok(CellValue::Text("34-36".into()))
        );
    }

    #[test]
    fn display_text_round_trips_through_parse() {
        let labels = labels();
        let v = CellValue::Range { min: 28.0, max: 30.5 };
        assert_eq!(display_text(&v, &labels), "28-30.5");
        assert_eq!(display_text(&CellValue::Label(1), &labels), "SM");
        assert_eq!(
            parse_cell_input(&display_text(&v, &labels), ColumnType::Measurement, None, &labels),
            Ok(v)
        );
    }
}
