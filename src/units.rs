//! 英寸 / 厘米换算。英寸是唯一的真实来源，厘米总是写入时由英寸推导。

pub const CM_PER_INCH: f64 = 2.54;

/// 保留一位小数：round(inches * 2.54 * 10) / 10
pub fn inches_to_cm(inches: f64) -> f64 {
    (inches * CM_PER_INCH * 10.0).round() / 10.0
}

/// 仅在只提供了厘米值时使用，保留两位小数
pub fn cm_to_inches(cm: f64) -> f64 {
    (cm / CM_PER_INCH * 100.0).round() / 100.0
}

/// 写入时统一的归一化：优先使用英寸；只有厘米时先换算成英寸
pub fn normalize_inches(inches: Option<f64>, cm: Option<f64>) -> Option<f64> {
    match (inches, cm) {
        (Some(i), _) => Some(i),
        (None, Some(c)) => Some(cm_to_inches(c)),
        (None, None) => None,
    }
}

/// 34.0 -> "34", 34.5 -> "34.5"
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_inches_with_one_decimal() {
        assert_eq!(inches_to_cm(34.0), 86.4);
        assert_eq!(inches_to_cm(10.0), 25.4);
        assert_eq!(inches_to_cm(0.0), 0.0);
        assert_eq!(inches_to_cm(32.5), 82.6);
    }

    #[test]
    fn cm_only_input_is_converted_to_inches() {
        assert_eq!(normalize_inches(None, Some(86.4)), Some(34.02));
        assert_eq!(normalize_inches(Some(34.0), Some(999.0)), Some(34.0));
        assert_eq!(normalize_inches(None, None), None);
    }

    #[test]
    fn formats_numbers_without_trailing_zeros() {
        assert_eq!(format_number(34.0), "34");
        assert_eq!(format_number(34.5), "34.5");
        assert_eq!(format_number(7.25), "7.25");
    }
}
