//! Rental-contract orchestration.

use crate::contract::repository::ContractRepository;
use crate::contract::types::{
    ContractRecord, ContractStatus, CreateContractInput, UpdateContractInput,
};
use crate::contract::validation;
use crate::error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ContractService {
    repo: ContractRepository,
}

impl ContractService {
    pub fn new(pool: PgPool) -> Self {
        ContractService {
            repo: ContractRepository::new(pool),
        }
    }

    pub async fn create(&self, input: CreateContractInput) -> Result<ContractRecord, AppError> {
        let valid = validation::validate_create(&input)?;
        let id = Uuid::new_v4();
        let record = self.repo.create(id, &valid).await?;
        tracing::info!(id = %record.id, number = %record.contract_number, "contract created");
        Ok(record)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ContractRecord, AppError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("contract {}", id)))
    }

    pub async fn list(
        &self,
        status: Option<ContractStatus>,
    ) -> Result<Vec<ContractRecord>, AppError> {
        self.repo.list(status).await
    }

    pub async fn update_by_id(
        &self,
        id: Uuid,
        input: UpdateContractInput,
    ) -> Result<ContractRecord, AppError> {
        validation::validate_update(&input)?;
        let record = self
            .repo
            .update_by_id(id, &input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("contract {}", id)))?;
        tracing::info!(id = %record.id, "contract updated");
        Ok(record)
    }

    pub async fn soft_delete_by_id(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete_by_id(id).await? {
            return Err(AppError::NotFound(format!("contract {}", id)));
        }
        tracing::info!(%id, "contract soft-deleted");
        Ok(())
    }
}
