use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::PunchClockRepository;
use crate::attendance::state_machine::next_punch_time;
use crate::errors::{AppError, AppResult};
use crate::model::punch::{NewPunch, PunchRecord, PunchReportRow, PunchType};
use crate::model::role::{EmploymentType, Role};
use crate::model::user::{NewUser, User};

/// Row of `user_roles`: a user's single active assignment.
#[derive(Debug, Clone)]
pub struct UserRole {
    pub user_id: u64,
    pub role_id: u64,
    pub employment_type_id: u64,
}

/// In-memory stand-in for the MySQL repository.
pub struct InMemoryRepository {
    pub users: Mutex<Vec<User>>,
    pub user_roles: Mutex<Vec<UserRole>>,
    pub roles: Vec<Role>,
    pub employment_types: Vec<EmploymentType>,
    pub punches: Mutex<Vec<PunchRecord>>,
    pub punch_writes: AtomicU64,
    next_id: AtomicU64,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            user_roles: Mutex::new(Vec::new()),
            roles: vec![
                Role {
                    role_id: 1,
                    role_name: "Cashier".to_string(),
                },
                Role {
                    role_id: 2,
                    role_name: "Supervisor".to_string(),
                },
            ],
            employment_types: vec![
                EmploymentType {
                    employment_type_id: 1,
                    type_name: "Full-time".to_string(),
                },
                EmploymentType {
                    employment_type_id: 2,
                    type_name: "Part-time".to_string(),
                },
            ],
            punches: Mutex::new(Vec::new()),
            punch_writes: AtomicU64::new(0),
            next_id: AtomicU64::new(1),
        }
    }
}

impl InMemoryRepository {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Seeds a user without going through registration.
    pub fn seed_user(&self, full_name: &str, password_hash: Option<String>) -> u64 {
        let user_id = self.next_id();
        self.users.lock().unwrap().push(User {
            user_id,
            full_name: full_name.to_string(),
            password_hash,
        });
        user_id
    }

    fn last_of(punches: &[PunchRecord], user_id: u64) -> Option<PunchRecord> {
        punches
            .iter()
            .filter(|p| p.user_id == user_id)
            .max_by_key(|p| (p.punch_time, p.punch_id))
            .cloned()
    }
}

#[async_trait]
impl PunchClockRepository for InMemoryRepository {
    async fn insert_user_with_role(&self, user: NewUser) -> AppResult<u64> {
        if !self.roles.iter().any(|r| r.role_id == user.role_id) {
            return Err(AppError::InvalidInput(format!(
                "Unknown role_id {}",
                user.role_id
            )));
        }
        if !self
            .employment_types
            .iter()
            .any(|t| t.employment_type_id == user.employment_type_id)
        {
            return Err(AppError::InvalidInput(format!(
                "Unknown employment_type_id {}",
                user.employment_type_id
            )));
        }

        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.full_name == user.full_name) {
            return Err(AppError::DuplicateOrEmptyInput(
                "Name already registered".to_string(),
            ));
        }

        let user_id = self.next_id();
        users.push(User {
            user_id,
            full_name: user.full_name,
            password_hash: Some(user.password_hash),
        });
        self.user_roles.lock().unwrap().push(UserRole {
            user_id,
            role_id: user.role_id,
            employment_type_id: user.employment_type_id,
        });
        Ok(user_id)
    }

    async fn find_user_by_name(&self, full_name: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.full_name == full_name)
            .cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.clone())
    }

    async fn list_employment_types(&self) -> AppResult<Vec<EmploymentType>> {
        Ok(self.employment_types.clone())
    }

    async fn insert_punch(
        &self,
        punch: NewPunch,
        expected_last: Option<PunchType>,
    ) -> AppResult<PunchRecord> {
        let mut punches = self.punches.lock().unwrap();
        let last = Self::last_of(&punches, punch.user_id);
        if last.as_ref().map(|p| p.punch_type) != expected_last {
            return Err(AppError::PunchStateChanged);
        }

        let record = PunchRecord {
            punch_id: self.next_id(),
            user_id: punch.user_id,
            punch_type: punch.punch_type,
            punch_time: next_punch_time(Utc::now(), last.map(|p| p.punch_time)),
            location_lat: Some(punch.location_lat),
            location_long: Some(punch.location_long),
        };
        punches.push(record.clone());
        self.punch_writes.fetch_add(1, Ordering::Relaxed);
        Ok(record)
    }

    async fn last_punch_for(&self, user_id: u64) -> AppResult<Option<PunchRecord>> {
        Ok(Self::last_of(&self.punches.lock().unwrap(), user_id))
    }

    async fn punches_for_user(&self, user_id: u64) -> AppResult<Vec<PunchRecord>> {
        Ok(self
            .punches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn all_punches_joined(&self) -> AppResult<Vec<PunchReportRow>> {
        let users = self.users.lock().unwrap();
        let user_roles = self.user_roles.lock().unwrap();
        let mut rows: Vec<PunchReportRow> = self
            .punches
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| {
                let user = users.iter().find(|u| u.user_id == p.user_id)?;
                let assignment = user_roles.iter().find(|ur| ur.user_id == p.user_id);
                Some(PunchReportRow {
                    punch_id: p.punch_id,
                    user_id: p.user_id,
                    full_name: user.full_name.clone(),
                    role_name: assignment.and_then(|ur| {
                        self.roles
                            .iter()
                            .find(|r| r.role_id == ur.role_id)
                            .map(|r| r.role_name.clone())
                    }),
                    type_name: assignment.and_then(|ur| {
                        self.employment_types
                            .iter()
                            .find(|t| t.employment_type_id == ur.employment_type_id)
                            .map(|t| t.type_name.clone())
                    }),
                    punch_type: p.punch_type,
                    punch_time: p.punch_time,
                    location_lat: p.location_lat,
                    location_long: p.location_long,
                })
            })
            .collect();
        rows.sort_by_key(|r| std::cmp::Reverse((r.punch_time, r.punch_id)));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_punch(user_id: u64, punch_type: PunchType) -> NewPunch {
        NewPunch {
            user_id,
            punch_type,
            location_lat: 1.3521,
            location_long: 103.8198,
        }
    }

    #[actix_web::test]
    async fn registration_rejects_duplicates_and_unknown_references() {
        let repo = InMemoryRepository::default();
        let user = NewUser {
            full_name: "John Doe".to_string(),
            password_hash: "hash".to_string(),
            role_id: 1,
            employment_type_id: 2,
        };

        let id = repo.insert_user_with_role(user.clone()).await.unwrap();
        assert_eq!(repo.user_roles.lock().unwrap()[0].user_id, id);

        let dup = repo.insert_user_with_role(user.clone()).await;
        assert!(matches!(dup, Err(AppError::DuplicateOrEmptyInput(_))));

        let bad_role = repo
            .insert_user_with_role(NewUser {
                full_name: "Jane Roe".to_string(),
                role_id: 99,
                ..user
            })
            .await;
        assert!(matches!(bad_role, Err(AppError::InvalidInput(_))));
        assert_eq!(repo.users.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn insert_punch_is_a_compare_and_swap() {
        let repo = InMemoryRepository::default();
        let user_id = repo.seed_user("John Doe", None);

        let first = repo
            .insert_punch(new_punch(user_id, PunchType::In), None)
            .await
            .unwrap();
        assert_eq!(first.punch_type, PunchType::In);

        // A second writer that read the same empty state loses.
        let stale = repo
            .insert_punch(new_punch(user_id, PunchType::In), None)
            .await;
        assert!(matches!(stale, Err(AppError::PunchStateChanged)));

        let second = repo
            .insert_punch(new_punch(user_id, PunchType::Out), Some(PunchType::In))
            .await
            .unwrap();
        assert!(second.punch_time > first.punch_time);
        assert_eq!(
            repo.last_punch_for(user_id).await.unwrap().unwrap().punch_id,
            second.punch_id
        );
        assert_eq!(repo.punch_writes.load(Ordering::Relaxed), 2);
    }

    #[actix_web::test]
    async fn report_joins_names_and_sorts_newest_first() {
        let repo = InMemoryRepository::default();
        let id = repo
            .insert_user_with_role(NewUser {
                full_name: "John Doe".to_string(),
                password_hash: "hash".to_string(),
                role_id: 2,
                employment_type_id: 1,
            })
            .await
            .unwrap();
        repo.insert_punch(new_punch(id, PunchType::In), None)
            .await
            .unwrap();
        repo.insert_punch(new_punch(id, PunchType::Out), Some(PunchType::In))
            .await
            .unwrap();

        let rows = repo.all_punches_joined().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].punch_type, PunchType::Out);
        assert_eq!(rows[0].role_name.as_deref(), Some("Supervisor"));
        assert_eq!(rows[0].type_name.as_deref(), Some("Full-time"));
        assert_eq!(rows[1].full_name, "John Doe");
    }
}
