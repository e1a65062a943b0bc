//! 尺码表模板目录、模板应用以及演示数据重置。

pub mod apply;
pub mod catalog;
pub mod demo;

pub use apply::{apply_template, ApplyTemplateInput};
pub use catalog::{find_template, ChartTemplate, TemplateDetailDto, TemplateSummaryDto, TEMPLATES};
pub use demo::{is_protected, reset_demo_data, seed_if_empty, DemoClock, DemoSummary};
