pub mod api_keys;
pub mod charts;

pub use api_keys::{generate_api_key, parse_api_key, verify_api_key, GeneratedKey, Scope};
pub use charts::{ChartInput, ChartService, ColumnInput, RowInput};
