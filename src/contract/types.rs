//! Rental-contract records and request shapes.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Expired => "expired",
            ContractStatus::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ContractStatus::Active),
            "expired" => Some(ContractStatus::Expired),
            "terminated" => Some(ContractStatus::Terminated),
            _ => None,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ContractRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub contract_number: String,
    pub monthly_rent: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Raw create input: ids, dates, and status arrive as strings and are
/// checked field by field so every problem surfaces at once.
#[derive(Deserialize, Clone, Debug)]
pub struct CreateContractInput {
    pub tenant_id: String,
    pub room_id: String,
    pub contract_number: String,
    pub monthly_rent: f64,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct UpdateContractInput {
    pub monthly_rent: Option<f64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdateContractInput {
    pub fn is_empty(&self) -> bool {
        self.monthly_rent.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
            && self.notes.is_none()
    }
}

/// Create input after validation, with parsed field types.
#[derive(Clone, Debug)]
pub struct ValidContract {
    pub tenant_id: Uuid,
    pub room_id: Uuid,
    pub contract_number: String,
    pub monthly_rent: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ContractStatus,
    pub notes: Option<String>,
}
