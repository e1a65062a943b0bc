//! 尺码表 JSON 导入导出。以 slug / key 等自然键引用分类、标签和测量说明。

pub mod export;
pub mod import;
pub mod schema;

pub use export::export_charts;
pub use import::{import_charts, ImportMode, ImportReport, ImportRequest};
pub use schema::{CellJson, ChartRecord, ExportDocument, EXPORT_VERSION};
