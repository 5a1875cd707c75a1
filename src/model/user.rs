use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: u64,
    pub full_name: String,
    /// NULL for accounts created before passwords were introduced.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

/// Validated registration input, password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub password_hash: String,
    pub role_id: u64,
    pub employment_type_id: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "s3cret")]
    pub password: String,
    #[schema(example = 1)]
    pub role_id: u64,
    #[schema(example = 1)]
    pub employment_type_id: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "s3cret")]
    pub password: String,
}
