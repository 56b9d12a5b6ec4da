use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{category_not_found, CategoryRepository, StagedChange, UnitOfWork};
use crate::{
    error::{AppError, Result},
    models::{
        category::Category,
        search::{SearchInput, SearchOrder, SearchOutput, SortField},
    },
};

/// Process-local category store. Cloning shares the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    rows: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a context with its own stage over the shared rows.
    pub fn context(&self) -> InMemoryCatalogContext {
        InMemoryCatalogContext {
            rows: Arc::clone(&self.rows),
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Store categories directly, bypassing the stage.
    pub async fn seed(&self, categories: impl IntoIterator<Item = Category>) {
        let mut rows = self.rows.write().await;
        for category in categories {
            rows.insert(category.id(), category);
        }
    }

    pub async fn find(&self, id: Uuid) -> Option<Category> {
        self.rows.read().await.get(&id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

pub struct InMemoryCatalogContext {
    rows: Arc<RwLock<HashMap<Uuid, Category>>>,
    staged: Mutex<Vec<StagedChange>>,
}

impl InMemoryCatalogContext {
    pub async fn staged(&self) -> Vec<StagedChange> {
        self.staged.lock().await.clone()
    }
}

fn compare(a: &Category, b: &Category, field: SortField, order: SearchOrder) -> Ordering {
    let ordering = match field {
        SortField::Name => a.name().cmp(b.name()),
        SortField::Id => a.id().cmp(&b.id()),
        SortField::CreatedAt => a.created_at().cmp(&b.created_at()),
    };
    let ordering = match order {
        SearchOrder::Asc => ordering,
        SearchOrder::Desc => ordering.reverse(),
    };
    ordering.then_with(|| a.id().cmp(&b.id()))
}

/// Run a search over a set of categories: filter, order, then slice the page.
pub fn search_categories<'a>(
    categories: impl IntoIterator<Item = &'a Category>,
    input: &SearchInput,
) -> SearchOutput<Category> {
    let mut matches: Vec<&Category> = match input.filter() {
        Some(needle) => categories
            .into_iter()
            .filter(|c| c.name().contains(needle))
            .collect(),
        None => categories.into_iter().collect(),
    };

    let (field, order) = input.sort();
    matches.sort_by(|a, b| compare(a, b, field, order));

    let skip = usize::try_from(input.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(input.per_page()).unwrap_or(usize::MAX);

    SearchOutput {
        current_page: input.page(),
        per_page: input.per_page(),
        total: i64::try_from(matches.len()).unwrap_or(i64::MAX),
        items: matches.into_iter().skip(skip).take(take).cloned().collect(),
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogContext {
    async fn insert(&self, category: &Category) -> Result<()> {
        self.staged
            .lock()
            .await
            .push(StagedChange::Insert(category.clone()));
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Category> {
        self.rows
            .read()
            .await
            .get(&id)
            .cloned()
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
        let rows = self.rows.read().await;
        Ok(search_categories(rows.values(), input))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryCatalogContext {
    async fn commit(&self) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.lock().await);
        if staged.is_empty() {
            return Ok(());
        }

        let mut rows = self.rows.write().await;
        // Work on a copy so a failing change leaves the committed rows alone.
        let mut next = rows.clone();
        for change in &staged {
            match change {
                StagedChange::Insert(category) => {
                    if next.contains_key(&category.id()) {
                        return Err(AppError::Internal(anyhow::anyhow!(
                            "Category {} already exists",
                            category.id()
                        )));
                    }
                    next.insert(category.id(), category.clone());
                }
                StagedChange::Update(category) => match next.get_mut(&category.id()) {
                    Some(row) => *row = category.clone(),
                    None => return Err(category_not_found(category.id())),
                },
                StagedChange::Delete(id) => {
                    if next.remove(id).is_none() {
                        return Err(category_not_found(*id));
                    }
                }
            }
        }
        *rows = next;

        tracing::debug!(changes = staged.len(), "Committed catalog changes");
        Ok(())
    }
}
