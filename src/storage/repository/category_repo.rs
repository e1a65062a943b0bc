use crate::storage::entity::category::{
    self, ActiveModel as CategoryActiveModel, Entity as Category, Model as CategoryModel,
};
use crate::storage::entity::size_chart::{self, Entity as SizeChart};
use crate::storage::entity::size_chart_subcategory::{
    self, ActiveModel as ChartLinkActiveModel, Entity as SizeChartSubcategory,
};
use crate::storage::entity::subcategory::{
    self, ActiveModel as SubcategoryActiveModel, Entity as Subcategory, Model as SubcategoryModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubcategoryDto {
    pub id: i32,
    pub category_id: i32,
    pub name: String,
    pub slug: String,
    pub display_order: i32,
    pub chart_count: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub display_order: i32,
    pub subcategories: Vec<SubcategoryDto>,
}

impl CategoryDto {
    fn build(model: CategoryModel, subs: Vec<SubcategoryModel>, counts: &HashMap<i32, u64>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            display_order: model.display_order,
            subcategories: subs
                .into_iter()
                .map(|s| SubcategoryDto {
                    chart_count: counts.get(&s.id).copied().unwrap_or(0),
                    id: s.id,
                    category_id: s.category_id,
                    name: s.name,
                    slug: s.slug,
                    display_order: s.display_order,
                })
                .collect(),
        }
    }
}

pub struct CategoryRepository;

impl CategoryRepository {
    /// 全部分类及其子分类；published_only 只统计已发布的尺码表
    pub async fn list_tree<C: ConnectionTrait>(
        db: &C,
        published_only: bool,
    ) -> Result<Vec<CategoryDto>, DbErr> {
        let categories = Category::find()
            .order_by_asc(category::Column::DisplayOrder)
            .order_by_asc(category::Column::Name)
            .all(db)
            .await?;
        let mut subs_by_category: HashMap<i32, Vec<SubcategoryModel>> = HashMap::new();
        for s in Subcategory::find()
            .order_by_asc(subcategory::Column::DisplayOrder)
            .order_by_asc(subcategory::Column::Name)
            .all(db)
            .await?
        {
            subs_by_category.entry(s.category_id).or_default().push(s);
        }
        let counts = Self::chart_counts(db, published_only).await?;

        Ok(categories
            .into_iter()
            .map(|c| {
                let subs = subs_by_category.remove(&c.id).unwrap_or_default();
                CategoryDto::build(c, subs, &counts)
            })
            .collect())
    }

    pub async fn load_tree<C: ConnectionTrait>(
        db: &C,
        model: CategoryModel,
    ) -> Result<CategoryDto, DbErr> {
        let subs = Self::subcategories_of(db, model.id).await?;
        let counts = Self::chart_counts(db, false).await?;
        Ok(CategoryDto::build(model, subs, &counts))
    }

    /// subcategory_id -> 关联尺码表数量
    pub async fn chart_counts<C: ConnectionTrait>(
        db: &C,
        published_only: bool,
    ) -> Result<HashMap<i32, u64>, DbErr> {
        let links = SizeChartSubcategory::find().all(db).await?;
        let published: Option<HashSet<i32>> = if published_only {
            Some(
                SizeChart::find()
                    .filter(size_chart::Column::IsPublished.eq(true))
                    .all(db)
                    .await?
                    .into_iter()
                    .map(|c| c.id)
                    .collect(),
            )
        } else {
            None
        };

        let mut counts = HashMap::new();
        for link in links {
            if let Some(set) = &published {
                if !set.contains(&link.size_chart_id) {
                    continue;
                }
            }
            *counts.entry(link.subcategory_id).or_insert(0u64) += 1;
        }
        Ok(counts)
    }

    pub async fn find<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<CategoryModel>, DbErr> {
        Category::find_by_id(id).one(db).await
    }

    pub async fn find_by_slug<C: ConnectionTrait>(
        db: &C,
        slug: &str,
    ) -> Result<Option<CategoryModel>, DbErr> {
        Category::find()
            .filter(category::Column::Slug.eq(slug))
            .one(db)
            .await
    }

    pub async fn slug_taken<C: ConnectionTrait>(
        db: &C,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = Category::find().filter(category::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(category::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    pub async fn insert<C: ConnectionTrait>(
        db: &C,
        name: String,
        slug: String,
        display_order: i32,
    ) -> Result<CategoryModel, DbErr> {
        let now = Utc::now().timestamp();
        CategoryActiveModel {
            name: Set(name),
            slug: Set(slug),
            display_order: Set(display_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update<C: ConnectionTrait>(
        db: &C,
        model: CategoryModel,
        name: String,
        slug: String,
        display_order: i32,
    ) -> Result<CategoryModel, DbErr> {
        let mut am: CategoryActiveModel = model.into();
        am.name = Set(name);
        am.slug = Set(slug);
        am.display_order = Set(display_order);
        am.updated_at = Set(Utc::now().timestamp());
        am.update(db).await
    }

    pub async fn next_display_order<C: ConnectionTrait>(db: &C) -> Result<i32, DbErr> {
        let last = Category::find()
            .order_by_desc(category::Column::DisplayOrder)
            .one(db)
            .await?;
        Ok(last.map(|c| c.display_order + 1).unwrap_or(0))
    }

    /// 先删子分类，再删分类本身
    pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
        let sub_ids: Vec<i32> = Self::subcategories_of(db, id)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        if !sub_ids.is_empty() {
            SizeChartSubcategory::delete_many()
                .filter(size_chart_subcategory::Column::SubcategoryId.is_in(sub_ids.clone()))
                .exec(db)
                .await?;
            Subcategory::delete_many()
                .filter(subcategory::Column::Id.is_in(sub_ids))
                .exec(db)
                .await?;
        }
        let res = Category::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }

    // ---- 子分类 ----

    pub async fn subcategories_of<C: ConnectionTrait>(
        db: &C,
        category_id: i32,
    ) -> Result<Vec<SubcategoryModel>, DbErr> {
        Subcategory::find()
            .filter(subcategory::Column::CategoryId.eq(category_id))
            .order_by_asc(subcategory::Column::DisplayOrder)
            .order_by_asc(subcategory::Column::Name)
            .all(db)
            .await
    }

    pub async fn find_subcategory<C: ConnectionTrait>(
        db: &C,
        id: i32,
    ) -> Result<Option<SubcategoryModel>, DbErr> {
        Subcategory::find_by_id(id).one(db).await
    }

    pub async fn find_subcategories<C: ConnectionTrait>(
        db: &C,
        ids: Vec<i32>,
    ) -> Result<Vec<SubcategoryModel>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Subcategory::find()
            .filter(subcategory::Column::Id.is_in(ids))
            .all(db)
            .await
    }

    /// 按自然键 (category slug, subcategory slug) 查找
    pub async fn find_subcategory_by_slugs<C: ConnectionTrait>(
        db: &C,
        category_slug: &str,
        subcategory_slug: &str,
    ) -> Result<Option<SubcategoryModel>, DbErr> {
        let Some(category) = Self::find_by_slug(db, category_slug).await? else {
            return Ok(None);
        };
        Subcategory::find()
            .filter(subcategory::Column::CategoryId.eq(category.id))
            .filter(subcategory::Column::Slug.eq(subcategory_slug))
            .one(db)
            .await
    }

    pub async fn subcategory_slug_taken<C: ConnectionTrait>(
        db: &C,
        category_id: i32,
        slug: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, DbErr> {
        let mut query = Subcategory::find()
            .filter(subcategory::Column::CategoryId.eq(category_id))
            .filter(subcategory::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(subcategory::Column::Id.ne(id));
        }
        Ok(query.count(db).await? > 0)
    }

    pub async fn insert_subcategory<C: ConnectionTrait>(
        db: &C,
        category_id: i32,
        name: String,
        slug: String,
        display_order: i32,
    ) -> Result<SubcategoryModel, DbErr> {
        let now = Utc::now().timestamp();
        SubcategoryActiveModel {
            category_id: Set(category_id),
            name: Set(name),
            slug: Set(slug),
            display_order: Set(display_order),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update_subcategory<C: ConnectionTrait>(
        db: &C,
        model: SubcategoryModel,
        name: String,
        slug: String,
        display_order: i32,
    ) -> Result<SubcategoryModel, DbErr> {
        let mut am: SubcategoryActiveModel = model.into();
        am.name = Set(name);
        am.slug = Set(slug);
        am.display_order = Set(display_order);
        am.updated_at = Set(Utc::now().timestamp());
        am.update(db).await
    }

    pub async fn delete_subcategory<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, DbErr> {
        SizeChartSubcategory::delete_many()
            .filter(size_chart_subcategory::Column::SubcategoryId.eq(id))
            .exec(db)
            .await?;
        let res = Subcategory::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected)
    }

    pub async fn count_attached_charts<C: ConnectionTrait>(
        db: &C,
        subcategory_ids: Vec<i32>,
    ) -> Result<u64, DbErr> {
        if subcategory_ids.is_empty() {
            return Ok(0);
        }
        SizeChartSubcategory::find()
            .filter(size_chart_subcategory::Column::SubcategoryId.is_in(subcategory_ids))
            .count(db)
            .await
    }

    /// 把关联从 from_ids 迁移到 target；目标上已存在的关联不重复创建
    pub async fn reassign_charts<C: ConnectionTrait>(
        db: &C,
        from_ids: Vec<i32>,
        target: i32,
    ) -> Result<u64, DbErr> {
        if from_ids.is_empty() {
            return Ok(0);
        }
        let links = SizeChartSubcategory::find()
            .filter(size_chart_subcategory::Column::SubcategoryId.is_in(from_ids.clone()))
            .order_by_asc(size_chart_subcategory::Column::Id)
            .all(db)
            .await?;
        let mut already: HashSet<i32> = SizeChartSubcategory::find()
            .filter(size_chart_subcategory::Column::SubcategoryId.eq(target))
            .all(db)
            .await?
            .into_iter()
            .map(|l| l.size_chart_id)
            .collect();

        let mut moved = 0u64;
        for link in links {
            if already.insert(link.size_chart_id) {
                ChartLinkActiveModel {
                    size_chart_id: Set(link.size_chart_id),
                    subcategory_id: Set(target),
                    display_order: Set(link.display_order),
                    ..Default::default()
                }
                .insert(db)
                .await?;
                moved += 1;
            }
        }
        SizeChartSubcategory::delete_many()
            .filter(size_chart_subcategory::Column::SubcategoryId.is_in(from_ids))
            .exec(db)
            .await?;
        Ok(moved)
    }

    pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
        SizeChartSubcategory::delete_many().exec(db).await?;
        Subcategory::delete_many().exec(db).await?;
        Category::delete_many().exec(db).await?;
        Ok(())
    }
}
