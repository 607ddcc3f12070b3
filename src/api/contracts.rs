use async_trait::async_trait;
use uuid::Uuid;

use crate::api::http::HttpApi;
use crate::error::ApiError;
use crate::models::{ConfirmContract, Contract, Role};

#[async_trait]
pub trait ContractsApi: Send + Sync {
    /// Contracts where the signed-in user plays the given role.
    async fn list_my_contracts(&self, role: Role) -> Result<Vec<Contract>, ApiError>;

    /// Provider schedules a pending contract, moving it to confirmed.
    async fn confirm_contract(
        &self,
        contract_id: Uuid,
        payload: &ConfirmContract,
    ) -> Result<Contract, ApiError>;

    async fn cancel_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError>;

    async fn complete_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError>;
}

#[async_trait]
impl ContractsApi for HttpApi {
    async fn list_my_contracts(&self, role: Role) -> Result<Vec<Contract>, ApiError> {
        self.personal_list(&format!("/contracts/my?role={role}")).await
    }

    async fn confirm_contract(
        &self,
        contract_id: Uuid,
        payload: &ConfirmContract,
    ) -> Result<Contract, ApiError> {
        self.post_json(&format!("/contracts/{contract_id}/confirm"), payload)
            .await
    }

    async fn cancel_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError> {
        self.post_empty(&format!("/contracts/{contract_id}/cancel"))
            .await
    }

    async fn complete_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError> {
        self.post_empty(&format!("/contracts/{contract_id}/complete"))
            .await
    }
}
