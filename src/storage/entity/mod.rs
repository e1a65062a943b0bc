pub mod api_key;
pub mod category;
pub mod measurement_instruction;
pub mod size_chart;
pub mod size_chart_cell;
pub mod size_chart_column;
pub mod size_chart_measurement_instruction;
pub mod size_chart_row;
pub mod size_chart_subcategory;
pub mod size_label;
pub mod subcategory;

pub use api_key::Entity as ApiKey;
pub use category::Entity as Category;
pub use measurement_instruction::Entity as MeasurementInstruction;
pub use size_chart::Entity as SizeChart;
pub use size_chart_cell::Entity as SizeChartCell;
pub use size_chart_column::Entity as SizeChartColumn;
pub use size_chart_measurement_instruction::Entity as SizeChartMeasurementInstruction;
pub use size_chart_row::Entity as SizeChartRow;
pub use size_chart_subcategory::Entity as SizeChartSubcategory;
pub use size_label::Entity as SizeLabel;
pub use subcategory::Entity as Subcategory;
