use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    SizeLabel,
    Measurement,
    Text,
    ShoeSize,
    BandSize,
    CupSize,
    RegionalSize,
}

impl ColumnType {
    pub const ALL: [ColumnType; 7] = [
        ColumnType::SizeLabel,
        ColumnType::Measurement,
        ColumnType::Text,
        ColumnType::ShoeSize,
        ColumnType::BandSize,
        ColumnType::CupSize,
        ColumnType::RegionalSize,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::SizeLabel => "SIZE_LABEL",
            ColumnType::Measurement => "MEASUREMENT",
            ColumnType::Text => "TEXT",
            ColumnType::ShoeSize => "SHOE_SIZE",
            ColumnType::BandSize => "BAND_SIZE",
            ColumnType::CupSize => "CUP_SIZE",
            ColumnType::RegionalSize => "REGIONAL_SIZE",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown column type: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_form_matches_serde_form() {
        for t in ColumnType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.as_str()));
            assert_eq!(t.as_str().parse::<ColumnType>().unwrap(), t);
        }
    }

    #[test]
    fn rejects_unknown_type() {
        assert!("WEIGHT".parse::<ColumnType>().is_err());
        assert!(serde_json::from_str::<ColumnType>("\"measurement\"").is_err());
    }
}
