use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, info};

use super::PunchClockRepository;
use crate::attendance::state_machine::next_punch_time;
use crate::errors::{AppError, AppResult};
use crate::model::punch::{
    NewPunch, PunchRecord, PunchRecordSql, PunchReportRow, PunchReportSql, PunchType,
};
use crate::model::role::{EmploymentType, Role};
use crate::model::user::{NewUser, User};

const LAST_PUNCH_SQL: &str = r#"
    SELECT punch_id, user_id, punch_type, punch_time, location_lat, location_long
    FROM punch_records
    WHERE user_id = ?
    ORDER BY punch_time DESC, punch_id DESC
    LIMIT 1
"#;

pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn is_duplicate_key(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23000"))
}

#[async_trait]
impl PunchClockRepository for MySqlRepository {
    async fn insert_user_with_role(&self, user: NewUser) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let role_exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM roles WHERE role_id = ?)",
        )
        .bind(user.role_id)
        .fetch_one(&mut *tx)
        .await?;
        if role_exists == 0 {
            return Err(AppError::InvalidInput(format!(
                "Unknown role_id {}",
                user.role_id
            )));
        }

        let type_exists = sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM employment_types WHERE employment_type_id = ?)",
        )
        .bind(user.employment_type_id)
        .fetch_one(&mut *tx)
        .await?;
        if type_exists == 0 {
            return Err(AppError::InvalidInput(format!(
                "Unknown employment_type_id {}",
                user.employment_type_id
            )));
        }

        let inserted = sqlx::query("INSERT INTO users (full_name, password_hash) VALUES (?, ?)")
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::DuplicateOrEmptyInput("Name already registered".to_string())
                } else {
                    AppError::from(e)
                }
            })?;
        let user_id = inserted.last_insert_id();

        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, employment_type_id)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(user.role_id)
        .bind(user.employment_type_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(user_id, "User registered");
        Ok(user_id)
    }

    async fn find_user_by_name(&self, full_name: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, full_name, password_hash
            FROM users
            WHERE full_name = ?
            "#,
        )
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            "SELECT role_id, role_name FROM roles ORDER BY role_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(roles)
    }

    async fn list_employment_types(&self) -> AppResult<Vec<EmploymentType>> {
        let types = sqlx::query_as::<_, EmploymentType>(
            "SELECT employment_type_id, type_name FROM employment_types ORDER BY employment_type_id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    async fn insert_punch(
        &self,
        punch: NewPunch,
        expected_last: Option<PunchType>,
    ) -> AppResult<PunchRecord> {
        let mut tx = self.pool.begin().await?;

        // Serialises concurrent punches of the same user.
        sqlx::query("SELECT user_id FROM users WHERE user_id = ? FOR UPDATE")
            .bind(punch.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

        let last = sqlx::query_as::<_, PunchRecordSql>(LAST_PUNCH_SQL)
            .bind(punch.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .map(PunchRecord::try_from)
            .transpose()?;

        if last.as_ref().map(|p| p.punch_type) != expected_last {
            debug!(user_id = punch.user_id, "Last punch moved under us");
            return Err(AppError::PunchStateChanged);
        }

        let punch_time = next_punch_time(Utc::now(), last.map(|p| p.punch_time));

        let inserted = sqlx::query(
            r#"
            INSERT INTO punch_records (user_id, punch_type, punch_time, location_lat, location_long)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(punch.user_id)
        .bind(punch.punch_type.as_str())
        .bind(punch_time)
        .bind(punch.location_lat)
        .bind(punch.location_long)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PunchRecord {
            punch_id: inserted.last_insert_id(),
            user_id: punch.user_id,
            punch_type: punch.punch_type,
            punch_time,
            location_lat: Some(punch.location_lat),
            location_long: Some(punch.location_long),
        })
    }

    async fn last_punch_for(&self, user_id: u64) -> AppResult<Option<PunchRecord>> {
        sqlx::query_as::<_, PunchRecordSql>(LAST_PUNCH_SQL)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(PunchRecord::try_from)
            .transpose()
    }

    async fn punches_for_user(&self, user_id: u64) -> AppResult<Vec<PunchRecord>> {
        sqlx::query_as::<_, PunchRecordSql>(
            r#"
            SELECT punch_id, user_id, punch_type, punch_time, location_lat, location_long
            FROM punch_records
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PunchRecord::try_from)
        .collect()
    }

    async fn all_punches_joined(&self) -> AppResult<Vec<PunchReportRow>> {
        sqlx::query_as::<_, PunchReportSql>(
            r#"
            SELECT pr.punch_id, pr.user_id, u.full_name, r.role_name, et.type_name,
                   pr.punch_type, pr.punch_time, pr.location_lat, pr.location_long
            FROM punch_records pr
            JOIN users u ON pr.user_id = u.user_id
            LEFT JOIN user_roles ur ON ur.user_id = u.user_id
            LEFT JOIN roles r ON r.role_id = ur.role_id
            LEFT JOIN employment_types et ON et.employment_type_id = ur.employment_type_id
            ORDER BY pr.punch_time DESC, pr.punch_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PunchReportRow::try_from)
        .collect()
    }
}
