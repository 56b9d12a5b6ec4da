use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::EntityValidationError;

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 255;
pub const DESCRIPTION_MAX_LENGTH: usize = 10_000;

/// Catalog category aggregate.
///
/// Fields are only reachable through accessors; state changes go through
/// [`Category::update`], [`Category::activate`] and [`Category::deactivate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: Uuid,
    name: String,
    description: String,
    is_active: bool,
    created_at: OffsetDateTime,
}

impl Category {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        is_active: bool,
    ) -> Result<Self, EntityValidationError> {
        let name = name.into();
        let description = description.into();
        validate(&name, &description)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            is_active,
            created_at: now_micros(),
        })
    }

    /// Rehydrate a category from storage. No validation, no fresh id or timestamp.
    pub fn restore(
        id: Uuid,
        name: String,
        description: String,
        is_active: bool,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            name,
            description,
            is_active,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Replace the name, and the description when one is given.
    ///
    /// The candidate values are validated before anything is assigned, so a
    /// failed update leaves the category untouched.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), EntityValidationError> {
        let name = name.into();
        validate(&name, description.as_deref().unwrap_or(&self.description))?;

        self.name = name;
        if let Some(description) = description {
            self.description = description;
        }
        Ok(())
    }
}

// Rules run in order and stop at the first failure.
fn validate(name: &str, description: &str) -> Result<(), EntityValidationError> {
    if name.trim().is_empty() {
        return Err(EntityValidationError::new("Name should not be empty or null"));
    }

    let name_len = name.chars().count();
    if name_len < NAME_MIN_LENGTH {
        return Err(EntityValidationError::new(format!(
            "Name should be at least {} characters long",
            NAME_MIN_LENGTH
        )));
    }
    if name_len > NAME_MAX_LENGTH {
        return Err(EntityValidationError::new(format!(
            "Name should be less or equal {} characters long",
            NAME_MAX_LENGTH
        )));
    }

    if description.chars().count() > DESCRIPTION_MAX_LENGTH {
        return Err(EntityValidationError::new(format!(
            "Description should be less or equal {} characters long",
            DESCRIPTION_MAX_LENGTH
        )));
    }

    Ok(())
}

/// Postgres `timestamptz` keeps microseconds; drop the rest so a stored
/// category reads back identical.
fn now_micros() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - time::Duration::nanoseconds(i64::from(now.nanosecond() % 1_000))
}

/// Storage row for the `categories` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category::restore(row.id, row.name, row.description, row.is_active, row.created_at)
    }
}

/// Category as returned to callers of the use cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryModelOutput {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&Category> for CategoryModelOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_string(),
            description: category.description().to_string(),
            is_active: category.is_active(),
            created_at: category.created_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}
