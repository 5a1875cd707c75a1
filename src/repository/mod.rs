//! Narrow persistence interface used by the handlers and the punch clock.

use async_trait::async_trait;

use crate::errors::AppResult;
use crate::model::punch::{NewPunch, PunchRecord, PunchReportRow, PunchType};
use crate::model::role::{EmploymentType, Role};
use crate::model::user::{NewUser, User};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[async_trait]
pub trait PunchClockRepository: Send + Sync {
    /// Inserts the user and its role assignment atomically; returns the new id.
    async fn insert_user_with_role(&self, user: NewUser) -> AppResult<u64>;

    async fn find_user_by_name(&self, full_name: &str) -> AppResult<Option<User>>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    async fn list_employment_types(&self) -> AppResult<Vec<EmploymentType>>;

    /// Appends a punch with a server-assigned time, provided the user's last
    /// punch type still equals `expected_last`. Fails with
    /// `PunchStateChanged` otherwise.
    async fn insert_punch(
        &self,
        punch: NewPunch,
        expected_last: Option<PunchType>,
    ) -> AppResult<PunchRecord>;

    async fn last_punch_for(&self, user_id: u64) -> AppResult<Option<PunchRecord>>;

    /// All punches of one user, no particular order.
    async fn punches_for_user(&self, user_id: u64) -> AppResult<Vec<PunchRecord>>;

    /// Every punch joined with user, role and employment type, newest first.
    async fn all_punches_joined(&self) -> AppResult<Vec<PunchReportRow>>;
}
