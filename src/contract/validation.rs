//! Rental-contract input validation.

use crate::contract::types::{
    ContractStatus, CreateContractInput, UpdateContractInput, ValidContract,
};
use crate::error::{AppError, FieldError};
use chrono::NaiveDate;
use regex::Regex;
use uuid::Uuid;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const RENT_MAX: f64 = 999_999_999.0;
const CONTRACT_NUMBER_PATTERN: &str = r"^CTR-\d{4}-\d{3,}$";

fn check_uuid(field: &str, value: &str, errors: &mut Vec<FieldError>) -> Option<Uuid> {
    match Uuid::parse_str(value) {
        Ok(u) => Some(u),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{} must be a valid UUID", field),
            ));
            None
        }
    }
}

fn check_date(field: &str, value: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{} must be a date in YYYY-MM-DD format", field),
            ));
            None
        }
    }
}

fn check_status(value: &str, errors: &mut Vec<FieldError>) -> Option<ContractStatus> {
    match ContractStatus::parse(value) {
        Some(s) => Some(s),
        None => {
            errors.push(FieldError::new(
                "status",
                "status must be one of: active, expired, terminated",
            ));
            None
        }
    }
}

fn check_contract_number(value: &str, errors: &mut Vec<FieldError>) {
    let matches = Regex::new(CONTRACT_NUMBER_PATTERN)
        .map(|re| re.is_match(value))
        .unwrap_or(false);
    if !matches {
        errors.push(FieldError::new(
            "contract_number",
            "contract_number must look like CTR-2024-001",
        ));
    }
}

fn check_rent(value: f64, errors: &mut Vec<FieldError>) {
    if value <= 0.0 {
        errors.push(FieldError::new(
            "monthly_rent",
            "monthly_rent must be positive",
        ));
    } else if value > RENT_MAX {
        errors.push(FieldError::new("monthly_rent", "monthly_rent is too large"));
    }
}

pub fn validate_create(input: &CreateContractInput) -> Result<ValidContract, AppError> {
    let mut errors = Vec::new();
    let tenant_id = check_uuid("tenant_id", &input.tenant_id, &mut errors);
    let room_id = check_uuid("room_id", &input.room_id, &mut errors);
    check_contract_number(&input.contract_number, &mut errors);
    check_rent(input.monthly_rent, &mut errors);
    let start_date = check_date("start_date", &input.start_date, &mut errors);
    let end_date = check_date("end_date", &input.end_date, &mut errors);
    let status = check_status(&input.status, &mut errors);
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end <= start {
            errors.push(FieldError::new(
                "end_date",
                "end_date must be after start_date",
            ));
        }
    }
    match (tenant_id, room_id, start_date, end_date, status) {
        (Some(tenant_id), Some(room_id), Some(start_date), Some(end_date), Some(status))
            if errors.is_empty() =>
        {
            Ok(ValidContract {
                tenant_id,
                room_id,
                contract_number: input.contract_number.clone(),
                monthly_rent: input.monthly_rent,
                start_date,
                end_date,
                status,
                notes: input.notes.clone(),
            })
        }
        _ => Err(AppError::Validation(errors)),
    }
}

pub fn validate_update(input: &UpdateContractInput) -> Result<(), AppError> {
    let mut errors = Vec::new();
    if let Some(rent) = input.monthly_rent {
        check_rent(rent, &mut errors);
    }
    if let Some(start) = &input.start_date {
        check_date("start_date", start, &mut errors);
    }
    if let Some(end) = &input.end_date {
        check_date("end_date", end, &mut errors);
    }
    if let Some(status) = &input.status {
        check_status(status, &mut errors);
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateContractInput {
        CreateContractInput {
            tenant_id: "550e8400-e29b-41d4-a716-446655440000".into(),
            room_id: "123e4567-e89b-12d3-a456-426614174000".into(),
            contract_number: "CTR-2024-001".into(),
            monthly_rent: 2_500_000.0,
            start_date: "2024-12-01".into(),
            end_date: "2025-11-30".into(),
            status: "active".into(),
            notes: Some("annual lease".into()),
        }
    }

    fn field_errors(result: Result<ValidContract, AppError>) -> Vec<String> {
        match result {
            Err(AppError::Validation(errors)) => {
                errors.into_iter().map(|e| e.field).collect()
            }
            _ => panic!("expected validation error"),
        }
    }

    #[test]
    fn valid_input_parses_all_fields() {
        let valid = validate_create(&valid_input()).unwrap();
        assert_eq!(valid.status, ContractStatus::Active);
        assert_eq!(valid.start_date.to_string(), "2024-12-01");
    }

    #[test]
    fn rejects_malformed_uuid_and_date_together() {
        let mut input = valid_input();
        input.tenant_id = "not-a-uuid".into();
        input.start_date = "01/12/2024".into();
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["tenant_id", "start_date"]);
    }

    #[test]
    fn rejects_unknown_status() {
        let mut input = valid_input();
        input.status = "cancelled".into();
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["status"]);
    }

    #[test]
    fn rejects_bad_contract_number_shape() {
        let mut input = valid_input();
        input.contract_number = "2024-CTR-01".into();
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["contract_number"]);
    }

    #[test]
    fn rejects_end_date_not_after_start() {
        let mut input = valid_input();
        input.end_date = input.start_date.clone();
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["end_date"]);
    }

    #[test]
    fn rejects_non_positive_rent() {
        let mut input = valid_input();
        input.monthly_rent = 0.0;
        let fields = field_errors(validate_create(&input));
        assert_eq!(fields, vec!["monthly_rent"]);
    }

    #[test]
    fn update_accepts_partial_input() {
        let input = UpdateContractInput {
            status: Some("expired".into()),
            ..Default::default()
        };
        assert!(validate_update(&input).is_ok());
    }

    #[test]
    fn update_rejects_bad_date() {
        let input = UpdateContractInput {
            end_date: Some("30-11-2025".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_update(&input),
            Err(AppError::Validation(_))
        ));
    }
}
