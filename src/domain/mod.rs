pub mod cell;
pub mod column_type;
pub mod slug;

pub use cell::{CellError, CellInput, CellValue, CellView, DualUnit};
pub use column_type::ColumnType;
pub use slug::{is_valid_label_key, is_valid_slug, slugify};
