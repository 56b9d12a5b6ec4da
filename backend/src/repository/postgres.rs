use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{PgConnection, PgPool};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{category_not_found, CategoryRepository, StagedChange, UnitOfWork};
use crate::{
    error::{AppError, Result},
    models::{
        category::{Category, CategoryRow},
        search::{SearchInput, SearchOrder, SearchOutput, SortField},
    },
};

const SELECT_COLUMNS: &str = "id, name, description, is_active, created_at";

// `$1` is NULL when the search is blank. strpos keeps the match ordinal and
// case-sensitive, with no LIKE wildcards to escape.
const FILTER_CLAUSE: &str = "($1::TEXT IS NULL OR strpos(name, $1::TEXT) > 0)";

/// Per-request catalog context over a Postgres pool.
///
/// Acts as both the category repository and its unit of work; staged
/// writes run inside a single transaction on commit.
pub struct PgCatalogContext {
    pool: PgPool,
    staged: Mutex<Vec<StagedChange>>,
}

impl PgCatalogContext {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            staged: Mutex::new(Vec::new()),
        }
    }
}

fn order_expression(field: SortField) -> &'static str {
    match field {
        // Byte-wise collation so ordering does not depend on the server locale.
        SortField::Name => r#"name COLLATE "C""#,
        SortField::Id => "id",
        SortField::CreatedAt => "created_at",
    }
}

fn direction(order: SearchOrder) -> &'static str {
    match order {
        SearchOrder::Asc => "ASC",
        SearchOrder::Desc => "DESC",
    }
}

// Postgres text cannot hold NUL (character_not_in_repertoire, 22021).
fn reject_nul(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("22021") {
            return AppError::BadRequest("Text values must not contain NUL characters".into());
        }
    }
    AppError::Database(err)
}

async fn apply(conn: &mut PgConnection, change: &StagedChange) -> Result<()> {
    match change {
        StagedChange::Insert(category) => {
            sqlx::query(
                "INSERT INTO categories (id, name, description, is_active, created_at)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(category.id())
            .bind(category.name())
            .bind(category.description())
            .bind(category.is_active())
            .bind(category.created_at())
            .execute(&mut *conn)
            .await
            .map_err(reject_nul)?;
        }
        StagedChange::Update(category) => {
            let result = sqlx::query(
                "UPDATE categories
                 SET name = $2, description = $3, is_active = $4
                 WHERE id = $1",
            )
            .bind(category.id())
            .bind(category.name())
            .bind(category.description())
            .bind(category.is_active())
            .execute(&mut *conn)
            .await
            .map_err(reject_nul)?;

            if result.rows_affected() == 0 {
                return Err(category_not_found(category.id()));
            }
        }
        StagedChange::Delete(id) => {
            let result = sqlx::query("DELETE FROM categories WHERE id = $1")
                .bind(id)
                .execute(&mut *conn)
                .await?;

            if result.rows_affected() == 0 {
                return Err(category_not_found(*id));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl CategoryRepository for PgCatalogContext {
    async fn insert(&self, category: &Category) -> Result<()> {
        self.staged
            .lock()
            .await
            .push(StagedChange::Insert(category.clone()));
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Category> {
        let sql = format!("SELECT {} FROM categories WHERE id = $1", SELECT_COLUMNS);
        sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Category::from)
            .ok_or_else(|| category_not_found(id))
    }

    async fn update(&self, category: &Category) -> Result<()> {
        self.staged
            .lock()
            .await
            .push(StagedChange::Update(category.clone()));
        Ok(())
    }

    async fn delete(&self, category: &Category) -> Result<()> {
        self.staged
            .lock()
            .await
            .push(StagedChange::Delete(category.id()));
        Ok(())
    }

    async fn search(&self, input: &SearchInput) -> Result<SearchOutput<Category>> {
        let filter = input.filter();
        let (field, order) = input.sort();

        // No stored name can contain NUL, and Postgres refuses it as a parameter.
        if filter.is_some_and(|needle| needle.contains('\0')) {
            return Ok(SearchOutput {
                current_page: input.page(),
                per_page: input.per_page(),
                total: 0,
                items: Vec::new(),
            });
        }

        let count_sql = format!("SELECT COUNT(*) FROM categories WHERE {}", FILTER_CLAUSE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(filter)
            .fetch_one(&self.pool)
            .await?;

        let page_sql = format!(
            "SELECT {} FROM categories WHERE {} ORDER BY {} {}, id ASC LIMIT $2 OFFSET $3",
            SELECT_COLUMNS,
            FILTER_CLAUSE,
            order_expression(field),
            direction(order),
        );
        let items: Vec<Category> = sqlx::query_as::<_, CategoryRow>(&page_sql)
            .bind(filter)
            .bind(input.per_page())
            .bind(input.offset())
            .fetch(&self.pool)
            .map_ok(Category::from)
            .try_collect()
            .await?;

        Ok(SearchOutput {
            current_page: input.page(),
            per_page: input.per_page(),
            total,
            items,
        })
    }
}

#[async_trait]
impl UnitOfWork for PgCatalogContext {
    async fn commit(&self) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.lock().await);
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for change in &staged {
            apply(&mut *tx, change).await?;
        }
        tx.commit().await?;

        tracing::debug!(changes = staged.len(), "Committed catalog changes");
        Ok(())
    }
}
