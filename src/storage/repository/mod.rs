pub mod api_key_repo;
pub mod category_repo;
pub mod instruction_repo;
pub mod label_repo;
pub mod size_chart_repo;

pub use api_key_repo::{ApiKeyDto, ApiKeyRepository};
pub use category_repo::{CategoryDto, CategoryRepository, SubcategoryDto};
pub use instruction_repo::{InstructionDefinition, InstructionRepository};
pub use label_repo::{LabelDefinition, LabelRepository};
pub use size_chart_repo::{
    ChartDefinition, ChartFilter, ColumnDefinition, RowDefinition, SizeChartDto,
    SizeChartRepository, SizeChartSummaryDto,
};
