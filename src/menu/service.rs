//! Menu orchestration: validation, id generation, repository calls, and
//! mapping of misses to user-facing error categories.

use crate::error::AppError;
use crate::menu::repository::MenuRepository;
use crate::menu::types::{CreateMenuInput, MenuFilters, MenuRecord, UpdateMenuInput};
use crate::menu::validation;
use crate::response::Pagination;
use crate::sql::SortDir;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Clone)]
pub struct MenuService {
    repo: MenuRepository,
}

impl MenuService {
    pub fn new(pool: PgPool) -> Self {
        MenuService {
            repo: MenuRepository::new(pool),
        }
    }

    pub async fn create(&self, input: CreateMenuInput) -> Result<MenuRecord, AppError> {
        validation::validate_create(&input)?;
        let id = Uuid::new_v4();
        let record = self.repo.create(id, &input).await?;
        tracing::info!(id = %record.id, name = %record.name, "menu created");
        Ok(record)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<MenuRecord, AppError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("menu {}", id)))
    }

    pub async fn list(&self) -> Result<Vec<MenuRecord>, AppError> {
        self.repo.list().await
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        input: UpdateMenuInput,
    ) -> Result<MenuRecord, AppError> {
        validation::validate_update(&input)?;
        let record = self
            .repo
            .update_by_id(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("menu {}", id)))?;
        tracing::info!(id = %record.id, "menu updated");
        Ok(record)
    }

    pub async fn soft_delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_by_id(id).await? {
            return Err(AppError::NotFound(format!("menu {}", id)));
        }
        tracing::info!(%id, "menu soft-deleted");
        Ok(())
    }

    pub async fn search(
        &self,
        filters: MenuFilters,
        page: Option<i64>,
        per_page: Option<i64>,
        sort_column: Option<String>,
        sort_dir: Option<SortDir>,
    ) -> Result<(Vec<MenuRecord>, Pagination), AppError> {
        let sort = match (&sort_column, sort_dir) {
            (Some(col), Some(dir)) => Some((col.as_str(), dir)),
            _ => None,
        };
        self.repo.search(&filters, page, per_page, sort).await
    }

    pub async fn count_by_category(&self) -> Result<BTreeMap<String, i64>, AppError> {
        self.repo.count_by_category().await
    }

    pub async fn group_by_category(
        &self,
        per_category: i64,
    ) -> Result<BTreeMap<String, Vec<MenuRecord>>, AppError> {
        self.repo.group_by_category(per_category.max(1)).await
    }
}
