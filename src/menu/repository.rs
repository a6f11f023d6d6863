//! Menu persistence: CRUD, filtered search with the count-then-paginate
//! protocol, and category aggregations. All reads and mutations exclude
//! soft-deleted rows; deletion only stamps `deleted_at`.

use crate::clock;
use crate::error::AppError;
use crate::menu::types::{
    join_ingredients, split_ingredients, CreateMenuInput, MenuFilters, MenuRecord,
    UpdateMenuInput,
};
use crate::response::Pagination;
use crate::sql::{
    build_count, build_insert_returning_id, build_select, build_update, exec, Cond, SelectSpec,
    SortDir, SqlParam, TableRef,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

const TABLE: &str = "public.menu";
const ALIAS: &str = "t";

/// Columns permitted in a caller-supplied sort, qualified with the select
/// alias. Anything else is dropped by the builder.
const SORTABLE: &[&str] = &["t.name", "t.category", "t.calories", "t.price"];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// NUMERIC price is selected as text and coerced client-side.
fn select_columns() -> Vec<String> {
    [
        "t.id",
        "t.name",
        "t.category",
        "t.calories",
        "t.price::text AS price",
        "t.ingredients",
        "t.description",
        "t.created_at",
        "t.updated_at",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn decode_err(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> AppError {
    AppError::Store(sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    })
}

fn row_to_menu(row: &PgRow) -> Result<MenuRecord, AppError> {
    let price_text: String = row.try_get("price")?;
    let price = price_text
        .parse::<f64>()
        .map_err(|e| decode_err("price", e))?;
    let ingredients_raw: String = row.try_get("ingredients")?;
    Ok(MenuRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category: row.try_get("category")?,
        calories: row.try_get("calories")?,
        price,
        ingredients: split_ingredients(&ingredients_raw),
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Spec for one live row by id.
fn by_id_spec(id: Uuid) -> SelectSpec {
    let mut spec = SelectSpec::new(TableRef::aliased(TABLE, ALIAS), select_columns());
    spec.conditions = vec![
        Cond::Eq("t.id".into(), SqlParam::Uuid(id)),
        Cond::Eq("t.deleted_at".into(), SqlParam::Null),
    ];
    spec.limit = Some(1);
    spec.offset = Some(0);
    spec
}

/// Assemble the search spec. Condition order is fixed: soft-delete guard,
/// category, price range, calories cap, name match. The same spec feeds
/// both the COUNT and the page SELECT; count construction ignores the sort
/// and page window.
pub(crate) fn search_spec(
    filters: &MenuFilters,
    sort: Option<(&str, SortDir)>,
    page: i64,
    per_page: i64,
) -> SelectSpec {
    let mut spec = SelectSpec::new(TableRef::aliased(TABLE, ALIAS), select_columns());
    spec.conditions
        .push(Cond::Eq("t.deleted_at".into(), SqlParam::Null));
    if let Some(category) = &filters.category {
        spec.conditions
            .push(Cond::Eq("t.category".into(), SqlParam::from(category.clone())));
    }
    match (filters.min_price, filters.max_price) {
        (Some(min), Some(max)) => spec.conditions.push(Cond::Between(
            "t.price".into(),
            SqlParam::Float(min),
            SqlParam::Float(max),
        )),
        (Some(min), None) => spec
            .conditions
            .push(Cond::Gte("t.price".into(), SqlParam::Float(min))),
        (None, Some(max)) => spec
            .conditions
            .push(Cond::Lte("t.price".into(), SqlParam::Float(max))),
        (None, None) => {}
    }
    if let Some(max_cal) = filters.max_calories {
        spec.conditions
            .push(Cond::Lte("t.calories".into(), SqlParam::Int(max_cal)));
    }
    if let Some(name) = &filters.name {
        spec.conditions
            .push(Cond::Like("t.name".into(), format!("%{}%", name)));
    }
    spec.sortable = SORTABLE.iter().map(|s| s.to_string()).collect();
    spec.order = sort.map(|(col, dir)| (format!("{}.{}", ALIAS, col), dir));
    spec.limit = Some(per_page);
    spec.offset = Some((page - 1) * per_page);
    spec
}

#[derive(Clone)]
pub struct MenuRepository {
    pool: PgPool,
}

impl MenuRepository {
    pub fn new(pool: PgPool) -> Self {
        MenuRepository { pool }
    }

    /// Insert a new row and return the canonical record as the database
    /// stored it (timestamps come from column defaults).
    pub async fn create(&self, id: Uuid, input: &CreateMenuInput) -> Result<MenuRecord, AppError> {
        let fields: Vec<(&str, SqlParam)> = vec![
            ("id", SqlParam::Uuid(id)),
            ("name", SqlParam::from(input.name.clone())),
            ("category", SqlParam::from(input.category.clone())),
            ("calories", SqlParam::Int(input.calories)),
            ("price", SqlParam::Float(input.price)),
            ("ingredients", SqlParam::from(join_ingredients(&input.ingredients))),
            ("description", SqlParam::from(input.description.clone())),
        ];
        let q = build_insert_returning_id(TABLE, &fields);
        let row = exec::fetch_optional(&self.pool, &q)
            .await?
            .ok_or(AppError::Store(sqlx::Error::RowNotFound))?;
        let stored_id: Uuid = row.try_get("id")?;
        self.get_by_id(stored_id)
            .await?
            .ok_or(AppError::Store(sqlx::Error::RowNotFound))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<MenuRecord>, AppError> {
        let q = build_select(&by_id_spec(id))?;
        match exec::fetch_optional(&self.pool, &q).await? {
            Some(row) => Ok(Some(row_to_menu(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> Result<Vec<MenuRecord>, AppError> {
        let mut spec = SelectSpec::new(TableRef::aliased(TABLE, ALIAS), select_columns());
        spec.conditions
            .push(Cond::Eq("t.deleted_at".into(), SqlParam::Null));
        let q = build_select(&spec)?;
        let rows = exec::fetch_all(&self.pool, &q).await?;
        rows.iter().map(row_to_menu).collect()
    }

    /// Write only the provided fields, then re-fetch the canonical row in
    /// the same transaction. Returns None when no live row matches.
    pub async fn update_by_id(
        &self,
        id: Uuid,
        input: &UpdateMenuInput,
    ) -> Result<Option<MenuRecord>, AppError> {
        if input.is_empty() {
            return self.get_by_id(id).await;
        }
        let mut fields: Vec<(&str, SqlParam)> = Vec::new();
        if let Some(name) = &input.name {
            fields.push(("name", SqlParam::from(name.clone())));
        }
        if let Some(category) = &input.category {
            fields.push(("category", SqlParam::from(category.clone())));
        }
        if let Some(calories) = input.calories {
            fields.push(("calories", SqlParam::Int(calories)));
        }
        if let Some(price) = input.price {
            fields.push(("price", SqlParam::Float(price)));
        }
        if let Some(ingredients) = &input.ingredients {
            fields.push(("ingredients", SqlParam::from(join_ingredients(ingredients))));
        }
        if let Some(description) = &input.description {
            fields.push(("description", SqlParam::from(description.clone())));
        }
        fields.push(("updated_at", SqlParam::DateTime(clock::now())));

        let conditions = vec![
            Cond::Eq("id".into(), SqlParam::Uuid(id)),
            Cond::Eq("deleted_at".into(), SqlParam::Null),
        ];
        let update = build_update(TABLE, &fields, &conditions)?;
        let fetch = build_select(&by_id_spec(id))?;

        let mut tx = exec::begin(&self.pool).await?;
        let affected = exec::execute_tx(&mut tx, &update).await?;
        if affected == 0 {
            return Ok(None);
        }
        let row = exec::fetch_optional_tx(&mut tx, &fetch).await?;
        tx.commit().await?;
        match row {
            Some(row) => Ok(Some(row_to_menu(&row)?)),
            None => Ok(None),
        }
    }

    /// Stamp `deleted_at`; the row stays in the table for audit. Returns
    /// false when no live row matched.
    pub async fn soft_delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let deleted_at = clock::now();
        let fields: Vec<(&str, SqlParam)> = vec![("deleted_at", SqlParam::DateTime(deleted_at))];
        let conditions = vec![
            Cond::Eq("id".into(), SqlParam::Uuid(id)),
            Cond::Eq("deleted_at".into(), SqlParam::Null),
        ];
        let q = build_update(TABLE, &fields, &conditions)?;
        let affected = exec::execute(&self.pool, &q).await?;
        if affected > 0 {
            tracing::debug!(%id, deleted_at = %clock::stamp(deleted_at), "row soft-deleted");
        }
        Ok(affected > 0)
    }

    /// Count over the filtered set first, then fetch the requested page.
    /// The count never sees the sort or the page window.
    pub async fn search(
        &self,
        filters: &MenuFilters,
        page: Option<i64>,
        per_page: Option<i64>,
        sort: Option<(&str, SortDir)>,
    ) -> Result<(Vec<MenuRecord>, Pagination), AppError> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
        let spec = search_spec(filters, sort, page, per_page);

        let total = exec::fetch_scalar_i64(&self.pool, &build_count(&spec)).await?;
        let q = build_select(&spec)?;
        let rows = exec::fetch_all(&self.pool, &q).await?;
        let data = rows.iter().map(row_to_menu).collect::<Result<Vec<_>, _>>()?;
        Ok((data, Pagination::new(total, page, per_page)))
    }

    /// Live-row count per category, keyed in category order.
    pub async fn count_by_category(&self) -> Result<BTreeMap<String, i64>, AppError> {
        let sql = "SELECT category, COUNT(*) AS total FROM public.menu \
                   WHERE deleted_at IS NULL GROUP BY category ORDER BY category";
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let mut out = BTreeMap::new();
        for row in &rows {
            let category: String = row.try_get("category")?;
            let total: i64 = row.try_get("total")?;
            out.insert(category, total);
        }
        Ok(out)
    }

    /// Up to `per_category` live rows per category, ranked by name within
    /// each category.
    pub async fn group_by_category(
        &self,
        per_category: i64,
    ) -> Result<BTreeMap<String, Vec<MenuRecord>>, AppError> {
        let sql = "SELECT id, name, category, calories, price::text AS price, ingredients, \
                   description, created_at, updated_at FROM (\
                   SELECT t.*, ROW_NUMBER() OVER (PARTITION BY t.category ORDER BY t.name) AS rank \
                   FROM public.menu t WHERE t.deleted_at IS NULL) ranked \
                   WHERE rank <= $1 ORDER BY category, name";
        tracing::debug!(sql = %sql, per_category, "query");
        let rows = sqlx::query(sql)
            .bind(per_category)
            .fetch_all(&self.pool)
            .await?;
        let mut out: BTreeMap<String, Vec<MenuRecord>> = BTreeMap::new();
        for row in &rows {
            let record = row_to_menu(row)?;
            out.entry(record.category.clone()).or_default().push(record);
        }
        Ok(out)
    }
}
