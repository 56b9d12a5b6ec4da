//! Category use cases.
//!
//! Each use case is a plain async function over a repository and a unit of
//! work. Validation failures return before anything is staged, so nothing
//! reaches storage.

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    error::Result,
    models::{
        category::{Category, CategoryModelOutput},
        search::{SearchInput, SearchOrder, SearchOutput},
    },
    repository::{CategoryRepository, UnitOfWork},
};

pub const DEFAULT_PER_PAGE: i64 = 15;

#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl CreateCategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_active: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetCategoryInput {
    pub id: Uuid,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCategoryInput {
    pub id: Uuid,
}

#[derive(Debug, Clone, Validate)]
pub struct UpdateCategoryInput {
    #[validate(custom(function = "not_nil"))]
    pub id: Uuid,
    pub name: String,
    /// `None` keeps the current description.
    pub description: Option<String>,
    /// `None` keeps the current activity flag.
    pub is_active: Option<bool>,
}

fn not_nil(id: &Uuid) -> std::result::Result<(), ValidationError> {
    if id.is_nil() {
        let mut err = ValidationError::new("not_nil");
        err.message = Some("Id should not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// List query. Field names match the `/api/categories` query string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ListCategoriesInput {
    pub page: i64,
    pub per_page: i64,
    pub search: String,
    pub sort: String,
    pub dir: SearchOrder,
}

impl Default for ListCategoriesInput {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: String::new(),
            sort: String::new(),
            dir: SearchOrder::Asc,
        }
    }
}

pub type ListCategoriesOutput = SearchOutput<CategoryModelOutput>;

pub async fn create_category(
    repo: &dyn CategoryRepository,
    uow: &dyn UnitOfWork,
    input: CreateCategoryInput,
) -> Result<CategoryModelOutput> {
    let category = Category::new(
        input.name,
        input.description.unwrap_or_default(),
        input.is_active.unwrap_or(true),
    )?;

    repo.insert(&category).await?;
    uow.commit().await?;

    tracing::info!(category_id = %category.id(), "Category created");
    Ok(CategoryModelOutput::from(&category))
}

pub async fn get_category(
    repo: &dyn CategoryRepository,
    input: GetCategoryInput,
) -> Result<CategoryModelOutput> {
    let category = repo.get(input.id).await?;
    Ok(CategoryModelOutput::from(&category))
}

pub async fn update_category(
    repo: &dyn CategoryRepository,
    uow: &dyn UnitOfWork,
    input: UpdateCategoryInput,
) -> Result<CategoryModelOutput> {
    input.validate()?;

    let mut category = repo.get(input.id).await?;
    category.update(input.name, input.description)?;

    match input.is_active {
        Some(true) if !category.is_active() => category.activate(),
        Some(false) if category.is_active() => category.deactivate(),
        _ => {}
    }

    repo.update(&category).await?;
    uow.commit().await?;

    tracing::info!(category_id = %category.id(), "Category updated");
    Ok(CategoryModelOutput::from(&category))
}

pub async fn delete_category(
    repo: &dyn CategoryRepository,
    uow: &dyn UnitOfWork,
    input: DeleteCategoryInput,
) -> Result<()> {
    let category = repo.get(input.id).await?;

    repo.delete(&category).await?;
    uow.commit().await?;

    tracing::info!(category_id = %category.id(), "Category deleted");
    Ok(())
}

pub async fn list_categories(
    repo: &dyn CategoryRepository,
    input: ListCategoriesInput,
) -> Result<ListCategoriesOutput> {
    let output = repo
        .search(&SearchInput::new(
            input.page,
            input.per_page,
            input.search,
            input.sort,
            input.dir,
        ))
        .await?;

    Ok(output.map(|category| CategoryModelOutput::from(&category)))
}
