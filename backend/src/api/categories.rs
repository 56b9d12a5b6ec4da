use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::category::{CategoryModelOutput, CreateCategoryRequest, UpdateCategoryRequest},
    repository::PgCatalogContext,
    use_cases::category::{
        self as use_case, CreateCategoryInput, DeleteCategoryInput, GetCategoryInput,
        ListCategoriesInput, ListCategoriesOutput, UpdateCategoryInput,
    },
};

pub async fn list(
    State(pool): State<PgPool>,
    Query(params): Query<ListCategoriesInput>,
) -> Result<Json<ListCategoriesOutput>> {
    let ctx = PgCatalogContext::new(pool);
    let output = use_case::list_categories(&ctx, params).await?;
    Ok(Json(output))
}

pub async fn create(
    State(pool): State<PgPool>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryModelOutput>)> {
    let ctx = PgCatalogContext::new(pool);
    let category = use_case::create_category(
        &ctx,
        &ctx,
        CreateCategoryInput {
            name: req.name,
            description: req.description,
            is_active: req.is_active,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_one(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryModelOutput>> {
    let ctx = PgCatalogContext::new(pool);
    let category = use_case::get_category(&ctx, GetCategoryInput { id }).await?;
    Ok(Json(category))
}

pub async fn update(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryModelOutput>> {
    let ctx = PgCatalogContext::new(pool);
    let category = use_case::update_category(
        &ctx,
        &ctx,
        UpdateCategoryInput {
            id,
            name: req.name,
            description: req.description,
            is_active: req.is_active,
        },
    )
    .await?;

    Ok(Json(category))
}

pub async fn delete(State(pool): State<PgPool>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let ctx = PgCatalogContext::new(pool);
    use_case::delete_category(&ctx, &ctx, DeleteCategoryInput { id }).await?;
    Ok(StatusCode::NO_CONTENT)
}
