//! Persistence seams for the catalog.
//!
//! Writes are staged on the repository and only become visible once the
//! owning [`UnitOfWork`] commits. Reads always see committed state.

pub mod in_memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{
        category::Category,
        search::{SearchInput, SearchOutput},
    },
};

pub use in_memory::{InMemoryCatalog, InMemoryCatalogContext};
pub use postgres::PgCatalogContext;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: &Category) -> Result<()>;

    /// Fails with [`AppError::NotFound`] when no category has this id.
    async fn get(&self, id: Uuid) -> Result<Category>;

    async fn update(&self, category: &Category) -> Result<()>;

    async fn delete(&self, category: &Category) -> Result<()>;

    async fn search(&self, input: &SearchInput) -> Result<SearchOutput<Category>>;
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Apply every staged change atomically. The stage is emptied whether or
    /// not the commit succeeds.
    async fn commit(&self) -> Result<()>;
}

/// A write waiting for the next commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedChange {
    Insert(Category),
    Update(Category),
    Delete(Uuid),
}

pub(crate) fn category_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}
