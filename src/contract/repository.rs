//! Rental-contract persistence. Same soft-delete discipline and builder
//! delegation as the menu repository, over a lighter surface.

use crate::clock;
use crate::contract::types::{ContractRecord, ContractStatus, UpdateContractInput, ValidContract};
use crate::error::AppError;
use crate::sql::{
    build_insert_returning_id, build_select, build_update, exec, Cond, SelectSpec, SqlParam,
    TableRef,
};
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const TABLE: &str = "public.rental_contract";
const ALIAS: &str = "t";

fn select_columns() -> Vec<String> {
    [
        "t.id",
        "t.tenant_id",
        "t.room_id",
        "t.contract_number",
        "t.monthly_rent::text AS monthly_rent",
        "t.start_date",
        "t.end_date",
        "t.status",
        "t.notes",
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

#[derive(Debug)]
struct UnknownStatus(String);

impl std::fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown contract status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

fn row_to_contract(row: &PgRow) -> Result<ContractRecord, AppError> {
    let rent_text: String = row.try_get("monthly_rent")?;
    let monthly_rent = rent_text
        .parse::<f64>()
        .map_err(|e| decode_err("monthly_rent", e))?;
    let status_text: String = row.try_get("status")?;
    let status = ContractStatus::parse(&status_text)
        .ok_or_else(|| decode_err("status", UnknownStatus(status_text.clone())))?;
    Ok(ContractRecord {
        id: row.try_get("id")?,
        tenant_id: row.try_get("tenant_id")?,
        room_id: row.try_get("room_id")?,
        contract_number: row.try_get("contract_number")?,
        monthly_rent,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        status,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

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

#[derive(Clone)]
pub struct ContractRepository {
    pool: PgPool,
}

impl ContractRepository {
    pub fn new(pool: PgPool) -> Self {
        ContractRepository { pool }
    }

    pub async fn create(
        &self,
        id: Uuid,
        input: &ValidContract,
    ) -> Result<ContractRecord, AppError> {
        let notes = match &input.notes {
            Some(n) => SqlParam::from(n.clone()),
            None => SqlParam::Null,
        };
        let fields: Vec<(&str, SqlParam)> = vec![
            ("id", SqlParam::Uuid(id)),
            ("tenant_id", SqlParam::Uuid(input.tenant_id)),
            ("room_id", SqlParam::Uuid(input.room_id)),
            ("contract_number", SqlParam::from(input.contract_number.clone())),
            ("monthly_rent", SqlParam::Float(input.monthly_rent)),
            ("start_date", SqlParam::Date(input.start_date)),
            ("end_date", SqlParam::Date(input.end_date)),
            ("status", SqlParam::from(input.status.as_str())),
            ("notes", notes),
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

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<ContractRecord>, AppError> {
        let q = build_select(&by_id_spec(id))?;
        match exec::fetch_optional(&self.pool, &q).await? {
            Some(row) => Ok(Some(row_to_contract(&row)?)),
            None => Ok(None),
        }
    }

    /// Live contracts, optionally restricted to one status.
    pub async fn list(
        &self,
        status: Option<ContractStatus>,
    ) -> Result<Vec<ContractRecord>, AppError> {
        let mut spec = SelectSpec::new(TableRef::aliased(TABLE, ALIAS), select_columns());
        spec.conditions
            .push(Cond::Eq("t.deleted_at".into(), SqlParam::Null));
        if let Some(status) = status {
            spec.conditions
                .push(Cond::Eq("t.status".into(), SqlParam::from(status.as_str())));
        }
        let q = build_select(&spec)?;
        let rows = exec::fetch_all(&self.pool, &q).await?;
        rows.iter().map(row_to_contract).collect()
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        input: &UpdateContractInput,
    ) -> Result<Option<ContractRecord>, AppError> {
        if input.is_empty() {
            return self.get_by_id(id).await;
        }
        let mut fields: Vec<(&str, SqlParam)> = Vec::new();
        if let Some(rent) = input.monthly_rent {
            fields.push(("monthly_rent", SqlParam::Float(rent)));
        }
        if let Some(start) = &input.start_date {
            if let Ok(date) = NaiveDate::parse_from_str(start, crate::contract::validation::DATE_FORMAT) {
                fields.push(("start_date", SqlParam::Date(date)));
            }
        }
        if let Some(end) = &input.end_date {
            if let Ok(date) = NaiveDate::parse_from_str(end, crate::contract::validation::DATE_FORMAT) {
                fields.push(("end_date", SqlParam::Date(date)));
            }
        }
        if let Some(status) = &input.status {
            if let Some(status) = ContractStatus::parse(status) {
                fields.push(("status", SqlParam::from(status.as_str())));
            }
        }
        if let Some(notes) = &input.notes {
            fields.push(("notes", SqlParam::from(notes.clone())));
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
            Some(row) => Ok(Some(row_to_contract(&row)?)),
            None => Ok(None),
        }
    }

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
}
