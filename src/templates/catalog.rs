//! 内置模板目录：标准尺码标签、测量说明、演示分类以及各类尺码表模板。
//!
//! 模板中的测量值均以英寸记录，写库时再换算厘米。

use crate::domain::ColumnType;
use crate::units::inches_to_cm;
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct LabelSpec {
    pub key: &'static str,
    pub display_value: &'static str,
    pub label_type: &'static str,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct InstructionSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub instruction: &'static str,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub name: &'static str,
    pub slug: &'static str,
    /// (name, slug)
    pub subcategories: &'static [(&'static str, &'static str)],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TemplateCell {
    Empty,
    Label { key: &'static str },
    Measurement { inches: f64 },
    Range { min: f64, max: f64 },
    Text { text: &'static str },
}

const fn l(key: &'static str) -> TemplateCell {
    TemplateCell::Label { key }
}

const fn i(inches: f64) -> TemplateCell {
    TemplateCell::Measurement { inches }
}

const fn r(min: f64, max: f64) -> TemplateCell {
    TemplateCell::Range { min, max }
}

const fn t(text: &'static str) -> TemplateCell {
    TemplateCell::Text { text }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateColumn {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub label_type: Option<&'static str>,
}

const fn col(
    name: &'static str,
    column_type: ColumnType,
    label_type: Option<&'static str>,
) -> TemplateColumn {
    TemplateColumn {
        name,
        column_type,
        label_type,
    }
}

pub type Rows = &'static [&'static [TemplateCell]];

#[derive(Debug, Clone, Copy)]
pub struct TemplateVariant {
    pub id: &'static str,
    pub name: &'static str,
    pub rows: Rows,
}

#[derive(Debug, Clone, Copy)]
pub struct ChartTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// 演示数据中使用的 slug，也是演示模式下受保护的 slug
    pub slug: &'static str,
    /// 建议挂载位置 (category slug, subcategory slug)
    pub placements: &'static [(&'static str, &'static str)],
    pub instructions: &'static [&'static str],
    pub columns: &'static [TemplateColumn],
    pub rows: Rows,
    pub variants: &'static [TemplateVariant],
}

impl ChartTemplate {
    /// None 表示默认行集；未知变体返回 None
    pub fn rows_for(&self, variant: Option<&str>) -> Option<Rows> {
        match variant {
            None => Some(self.rows),
            Some(id) => self.variants.iter().find(|v| v.id == id).map(|v| v.rows),
        }
    }

    pub fn variant(&self, id: &str) -> Option<&TemplateVariant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// 模板引用到的全部 label key（去重，保持出现顺序）
    pub fn label_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = Vec::new();
        let all_rows = self
            .rows
            .iter()
            .chain(self.variants.iter().flat_map(|v| v.rows.iter()));
        for row in all_rows {
            for cell in row.iter() {
                if let TemplateCell::Label { key } = *cell {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
        }
        keys
    }
}

pub fn find_template(id: &str) -> Option<&'static ChartTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn find_label_spec(key: &str) -> Option<&'static LabelSpec> {
    STANDARD_LABELS.iter().find(|l| l.key == key)
}

pub fn find_instruction_spec(key: &str) -> Option<&'static InstructionSpec> {
    STANDARD_INSTRUCTIONS.iter().find(|i| i.key == key)
}

// ---- 接口返回结构 ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummaryDto {
    pub id: &'static str,
    pub name: &'static str,
    pub row_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummaryDto {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub slug: &'static str,
    pub suggested_placements: Vec<PlacementDto>,
    pub column_count: usize,
    pub row_count: usize,
    pub variants: Vec<VariantSummaryDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDto {
    pub category: &'static str,
    pub subcategory: &'static str,
}

/// 预览单元格，附带厘米值方便前端展示
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewCellDto {
    #[serde(flatten)]
    pub cell: TemplateCell,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDetailDto {
    pub id: &'static str,
    pub name: &'static str,
    pub rows: Vec<Vec<PreviewCellDto>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDetailDto {
    #[serde(flatten)]
    pub summary: TemplateSummaryDto,
    pub measurement_instructions: Vec<&'static str>,
    pub columns: &'static [TemplateColumn],
    pub rows: Vec<Vec<PreviewCellDto>>,
    pub variant_rows: Vec<VariantDetailDto>,
}

fn preview_rows(rows: Rows) -> Vec<Vec<PreviewCellDto>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| PreviewCellDto {
                    cell: *cell,
                    cm: match cell {
                        TemplateCell::Measurement { inches } => Some(inches_to_cm(*inches)),
                        _ => None,
                    },
                    display_value: match cell {
                        TemplateCell::Label { key } => find_label_spec(key).map(|l| l.display_value),
                        _ => None,
                    },
                })
                .collect()
        })
        .collect()
}

impl From<&ChartTemplate> for TemplateSummaryDto {
    fn from(t: &ChartTemplate) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            slug: t.slug,
            suggested_placements: t
                .placements
                .iter()
                .map(|&(category, subcategory)| PlacementDto {
                    category,
                    subcategory,
                })
                .collect(),
            column_count: t.columns.len(),
            row_count: t.rows.len(),
            variants: t
                .variants
                .iter()
                .map(|v| VariantSummaryDto {
                    id: v.id,
                    name: v.name,
                    row_count: v.rows.len(),
                })
                .collect(),
        }
    }
}

impl From<&ChartTemplate> for TemplateDetailDto {
    fn from(t: &ChartTemplate) -> Self {
        Self {
            summary: t.into(),
            measurement_instructions: t.instructions.to_vec(),
            columns: t.columns,
            rows: preview_rows(t.rows),
            variant_rows: t
                .variants
                .iter()
                .map(|v| VariantDetailDto {
                    id: v.id,
                    name: v.name,
                    rows: preview_rows(v.rows),
                })
                .collect(),
        }
    }
}

// ---- 标准数据 ----

macro_rules! label {
    ($key:expr, $display:expr, $ty:expr, $order:expr) => {
        LabelSpec {
            key: $key,
            display_value: $display,
            label_type: $ty,
            sort_order: $order,
        }
    };
}

pub const STANDARD_LABELS: &[LabelSpec] = &[
    label!("SIZE_XS", "XS", "ALPHA", 10),
    label!("SIZE_SM", "SM", "ALPHA", 20),
    label!("SIZE_MD", "MD", "ALPHA", 30),
    label!("SIZE_LG", "LG", "ALPHA", 40),
    label!("SIZE_XL", "XL", "ALPHA", 50),
    label!("SIZE_XXL", "XXL", "ALPHA", 60),
    label!("BAND_32", "32", "BAND", 10),
    label!("BAND_34", "34", "BAND", 20),
    label!("BAND_36", "36", "BAND", 30),
    label!("BAND_38", "38", "BAND", 40),
    label!("CUP_A", "A", "CUP", 10),
    label!("CUP_B", "B", "CUP", 20),
    label!("CUP_C", "C", "CUP", 30),
    label!("CUP_D", "D", "CUP", 40),
    label!("CUP_DD", "DD", "CUP", 50),
    label!("SHOE_US_7", "7", "SHOE_US", 10),
    label!("SHOE_US_8", "8", "SHOE_US", 20),
    label!("SHOE_US_9", "9", "SHOE_US", 30),
    label!("SHOE_US_10", "10", "SHOE_US", 40),
    label!("SHOE_US_11", "11", "SHOE_US", 50),
    label!("SHOE_US_12", "12", "SHOE_US", 60),
    label!("KIDS_4", "4", "KIDS", 10),
    label!("KIDS_6", "6", "KIDS", 20),
    label!("KIDS_8", "8", "KIDS", 30),
    label!("KIDS_10", "10", "KIDS", 40),
    label!("KIDS_12", "12", "KIDS", 50),
];

pub const STANDARD_INSTRUCTIONS: &[InstructionSpec] = &[
    InstructionSpec {
        key: "CHEST",
        name: "Chest",
        instruction: "Measure around the fullest part of the chest, keeping the tape level under the arms.",
        sort_order: 10,
    },
    InstructionSpec {
        key: "BUST",
        name: "Bust",
        instruction: "Measure around the fullest part of the bust with the tape parallel to the floor.",
        sort_order: 20,
    },
    InstructionSpec {
        key: "UNDERBUST",
        name: "Underbust",
        instruction: "Measure snugly around the rib cage directly beneath the bust.",
        sort_order: 30,
    },
    InstructionSpec {
        key: "WAIST",
        name: "Waist",
        instruction: "Measure around the natural waistline, above the belly button and below the rib cage.",
        sort_order: 40,
    },
    InstructionSpec {
        key: "HIP",
        name: "Hip",
        instruction: "Stand with feet together and measure around the fullest part of the hips.",
        sort_order: 50,
    },
    InstructionSpec {
        key: "INSEAM",
        name: "Inseam",
        instruction: "Measure from the top of the inner thigh down to the ankle bone.",
        sort_order: 60,
    },
    InstructionSpec {
        key: "SLEEVE",
        name: "Sleeve",
        instruction: "From the center back of the neck, measure across the shoulder and down to the wrist.",
        sort_order: 70,
    },
    InstructionSpec {
        key: "FOOT_LENGTH",
        name: "Foot length",
        instruction: "Stand on a sheet of paper, mark heel and longest toe, and measure the distance.",
        sort_order: 80,
    },
    InstructionSpec {
        key: "HEIGHT",
        name: "Height",
        instruction: "Stand straight against a wall without shoes and measure from the floor to the top of the head.",
        sort_order: 90,
    },
];

pub const DEMO_CATEGORIES: &[CategorySpec] = &[
    CategorySpec {
        name: "Men",
        slug: "mens",
        subcategories: &[("Tops", "tops"), ("Bottoms", "bottoms"), ("Shoes", "shoes")],
    },
    CategorySpec {
        name: "Women",
        slug: "womens",
        subcategories: &[("Dresses", "dresses"), ("Bras", "bras"), ("Shoes", "shoes")],
    },
    CategorySpec {
        name: "Kids",
        slug: "kids",
        subcategories: &[("Tops", "tops")],
    },
];

// ---- 模板 ----

const ALPHA: Option<&str> = Some("ALPHA");
const SIZE: ColumnType = ColumnType::SizeLabel;
const MEAS: ColumnType = ColumnType::Measurement;

const MENS_TOPS_COLUMNS: &[TemplateColumn] = &[
    col("Size", SIZE, ALPHA),
    col("Chest", MEAS, None),
    col("Waist", MEAS, None),
    col("Sleeve", MEAS, None),
];

const MENS_TOPS_ROWS: Rows = &[
    &[l("SIZE_XS"), r(32.0, 34.0), r(26.0, 28.0), i(32.0)],
    &[l("SIZE_SM"), r(35.0, 37.0), r(29.0, 31.0), i(33.0)],
    &[l("SIZE_MD"), r(38.0, 40.0), r(32.0, 34.0), i(34.0)],
    &[l("SIZE_LG"), r(41.0, 43.0), r(35.0, 37.0), i(35.0)],
    &[l("SIZE_XL"), r(44.0, 46.0), r(38.0, 40.0), i(36.0)],
    &[l("SIZE_XXL"), r(47.0, 49.0), r(41.0, 43.0), i(37.0)],
];

const MENS_TOPS_TALL_ROWS: Rows = &[
    &[l("SIZE_MD"), r(38.0, 40.0), r(32.0, 34.0), i(36.0)],
    &[l("SIZE_LG"), r(41.0, 43.0), r(35.0, 37.0), i(37.0)],
    &[l("SIZE_XL"), r(44.0, 46.0), r(38.0, 40.0), i(38.0)],
    &[l("SIZE_XXL"), r(47.0, 49.0), r(41.0, 43.0), i(39.0)],
];

const MENS_BOTTOMS_COLUMNS: &[TemplateColumn] = &[
    col("Size", SIZE, ALPHA),
    col("Waist", MEAS, None),
    col("Hip", MEAS, None),
    col("Inseam", MEAS, None),
];

const MENS_BOTTOMS_SHORT_ROWS: Rows = &[
    &[l("SIZE_SM"), r(29.0, 31.0), r(35.0, 37.0), i(30.0)],
    &[l("SIZE_MD"), r(32.0, 34.0), r(38.0, 40.0), i(30.0)],
    &[l("SIZE_LG"), r(35.0, 37.0), r(41.0, 43.0), i(30.0)],
    &[l("SIZE_XL"), r(38.0, 40.0), r(44.0, 46.0), i(30.0)],
];

const MENS_BOTTOMS_REGULAR_ROWS: Rows = &[
    &[l("SIZE_SM"), r(29.0, 31.0), r(35.0, 37.0), i(32.0)],
    &[l("SIZE_MD"), r(32.0, 34.0), r(38.0, 40.0), i(32.0)],
    &[l("SIZE_LG"), r(35.0, 37.0), r(41.0, 43.0), i(32.0)],
    &[l("SIZE_XL"), r(38.0, 40.0), r(44.0, 46.0), i(32.0)],
];

const MENS_BOTTOMS_LONG_ROWS: Rows = &[
    &[l("SIZE_SM"), r(29.0, 31.0), r(35.0, 37.0), i(34.0)],
    &[l("SIZE_MD"), r(32.0, 34.0), r(38.0, 40.0), i(34.0)],
    &[l("SIZE_LG"), r(35.0, 37.0), r(41.0, 43.0), i(34.0)],
    &[l("SIZE_XL"), r(38.0, 40.0), r(44.0, 46.0), i(34.0)],
];

const WOMENS_DRESSES_COLUMNS: &[TemplateColumn] = &[
    col("Size", SIZE, ALPHA),
    col("Bust", MEAS, None),
    col("Waist", MEAS, None),
    col("Hip", MEAS, None),
];

const WOMENS_DRESSES_ROWS: Rows = &[
    &[l("SIZE_XS"), r(31.0, 32.0), r(24.0, 25.0), r(34.0, 35.0)],
    &[l("SIZE_SM"), r(33.0, 34.0), r(26.0, 27.0), r(36.0, 37.0)],
    &[l("SIZE_MD"), r(35.0, 36.0), r(28.0, 29.0), r(38.0, 39.0)],
    &[l("SIZE_LG"), r(37.5, 39.0), r(30.5, 32.0), r(40.5, 42.0)],
    &[l("SIZE_XL"), r(40.5, 42.0), r(33.5, 35.0), r(43.5, 45.0)],
];

const WOMENS_BRAS_COLUMNS: &[TemplateColumn] = &[
    col("Band", ColumnType::BandSize, Some("BAND")),
    col("Cup", ColumnType::CupSize, Some("CUP")),
    col("Underbust", MEAS, None),
    col("Bust", MEAS, None),
];

const WOMENS_BRAS_ROWS: Rows = &[
    &[l("BAND_32"), l("CUP_A"), r(27.0, 29.0), i(33.0)],
    &[l("BAND_32"), l("CUP_B"), r(27.0, 29.0), i(34.0)],
    &[l("BAND_34"), l("CUP_B"), r(29.0, 31.0), i(36.0)],
    &[l("BAND_34"), l("CUP_C"), r(29.0, 31.0), i(37.0)],
    &[l("BAND_36"), l("CUP_C"), r(31.0, 33.0), i(39.0)],
    &[l("BAND_36"), l("CUP_D"), r(31.0, 33.0), i(40.0)],
    &[l("BAND_38"), l("CUP_D"), r(33.0, 35.0), i(42.0)],
    &[l("BAND_38"), l("CUP_DD"), r(33.0, 35.0), i(43.0)],
];

const SHOES_COLUMNS: &[TemplateColumn] = &[
    col("US", ColumnType::ShoeSize, Some("SHOE_US")),
    col("EU", ColumnType::RegionalSize, None),
    col("Foot length", MEAS, None),
];

const SHOES_ROWS: Rows = &[
    &[l("SHOE_US_7"), t("40"), i(9.625)],
    &[l("SHOE_US_8"), t("41"), i(10.0)],
    &[l("SHOE_US_9"), t("42"), i(10.25)],
    &[l("SHOE_US_10"), t("43"), i(10.625)],
    &[l("SHOE_US_11"), t("44"), i(11.0)],
    &[l("SHOE_US_12"), t("45"), i(11.25)],
];

const KIDS_TOPS_COLUMNS: &[TemplateColumn] = &[
    col("Size", SIZE, Some("KIDS")),
    col("Chest", MEAS, None),
    col("Height", MEAS, None),
    col("Age", ColumnType::Text, None),
];

const KIDS_TOPS_ROWS: Rows = &[
    &[l("KIDS_4"), i(23.0), r(39.0, 42.0), t("3-4 yrs")],
    &[l("KIDS_6"), i(24.5), r(43.0, 47.0), t("5-6 yrs")],
    &[l("KIDS_8"), i(26.0), r(48.0, 52.0), t("7-8 yrs")],
    &[l("KIDS_10"), i(28.0), r(53.0, 56.0), t("9-10 yrs")],
    &[l("KIDS_12"), i(30.0), r(57.0, 60.0), t("11-12 yrs")],
];

pub const TEMPLATES: &[ChartTemplate] = &[
    ChartTemplate {
        id: "mens-tops",
        name: "Men's Tops",
        description: "Shirts, tees and sweaters in alpha sizes.",
        slug: "mens-tops",
        placements: &[("mens", "tops")],
        instructions: &["CHEST", "WAIST", "SLEEVE"],
        columns: MENS_TOPS_COLUMNS,
        rows: MENS_TOPS_ROWS,
        variants: &[TemplateVariant {
            id: "tall",
            name: "Tall",
            rows: MENS_TOPS_TALL_ROWS,
        }],
    },
    ChartTemplate {
        id: "mens-bottoms",
        name: "Men's Bottoms",
        description: "Trousers and jeans with short, regular and long inseams.",
        slug: "mens-bottoms",
        placements: &[("mens", "bottoms")],
        instructions: &["WAIST", "HIP", "INSEAM"],
        columns: MENS_BOTTOMS_COLUMNS,
        rows: MENS_BOTTOMS_REGULAR_ROWS,
        variants: &[
            TemplateVariant {
                id: "short",
                name: "Short",
                rows: MENS_BOTTOMS_SHORT_ROWS,
            },
            TemplateVariant {
                id: "regular",
                name: "Regular",
                rows: MENS_BOTTOMS_REGULAR_ROWS,
            },
            TemplateVariant {
                id: "long",
                name: "Long",
                rows: MENS_BOTTOMS_LONG_ROWS,
            },
        ],
    },
    ChartTemplate {
        id: "womens-dresses",
        name: "Women's Dresses",
        description: "Dresses in alpha sizes by bust, waist and hip.",
        slug: "womens-dresses",
        placements: &[("womens", "dresses")],
        instructions: &["BUST", "WAIST", "HIP"],
        columns: WOMENS_DRESSES_COLUMNS,
        rows: WOMENS_DRESSES_ROWS,
        variants: &[],
    },
    ChartTemplate {
        id: "womens-bras",
        name: "Women's Bras",
        description: "Band and cup sizes with underbust and bust measurements.",
        slug: "womens-bras",
        placements: &[("womens", "bras")],
        instructions: &["UNDERBUST", "BUST"],
        columns: WOMENS_BRAS_COLUMNS,
        rows: WOMENS_BRAS_ROWS,
        variants: &[],
    },
    ChartTemplate {
        id: "unisex-shoes",
        name: "Unisex Shoes",
        description: "US and EU shoe sizes by foot length.",
        slug: "unisex-shoes",
        placements: &[("mens", "shoes"), ("womens", "shoes")],
        instructions: &["FOOT_LENGTH"],
        columns: SHOES_COLUMNS,
        rows: SHOES_ROWS,
        variants: &[],
    },
    ChartTemplate {
        id: "kids-tops",
        name: "Kids' Tops",
        description: "Children's tops by chest and height.",
        slug: "kids-tops",
        placements: &[("kids", "tops")],
        instructions: &["CHEST", "HEIGHT"],
        columns: KIDS_TOPS_COLUMNS,
        rows: KIDS_TOPS_ROWS,
        variants: &[],
    },
];
