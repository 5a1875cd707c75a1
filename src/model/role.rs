use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Job role reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Role {
    #[schema(example = 1)]
    pub role_id: u64,
    #[schema(example = "Cashier")]
    pub role_name: String,
}

/// Employment category reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmploymentType {
    #[schema(example = 1)]
    pub employment_type_id: u64,
    #[schema(example = "Full-time")]
    pub type_name: String,
}
