use serde::Serialize;
use std::time::Duration;
use tracing::info;
use utoipa::ToSchema;

use super::state_machine::{PunchButtons, PunchState};
use crate::errors::AppResult;
use crate::location::{LocationSource, capture_location};
use crate::model::punch::{NewPunch, PunchRecord, PunchType};
use crate::repository::PunchClockRepository;

#[derive(Debug, Serialize, ToSchema)]
pub struct ClockStatus {
    pub state: PunchState,
    #[schema(nullable = true)]
    pub last_punch: Option<PunchRecord>,
    pub admissible: PunchType,
    pub buttons: PunchButtons,
}

/// What the punch screen needs before rendering its buttons.
pub async fn clock_status(repo: &dyn PunchClockRepository, user_id: u64) -> AppResult<ClockStatus> {
    let last_punch = repo.last_punch_for(user_id).await?;
    let state = PunchState::from(last_punch.as_ref().map(|p| p.punch_type));

    Ok(ClockStatus {
        state,
        last_punch,
        admissible: state.admissible(),
        buttons: state.buttons(),
    })
}

/// Records `requested` for the user if it is the admissible action and a
/// location reading is available. Nothing is written on any failure.
pub async fn submit_punch(
    repo: &dyn PunchClockRepository,
    locations: &dyn LocationSource,
    user_id: u64,
    requested: PunchType,
    location_timeout: Duration,
) -> AppResult<PunchRecord> {
    let last = repo.last_punch_for(user_id).await?;
    let state = PunchState::from(last.map(|p| p.punch_type));
    let punch_type = state.admit(requested)?;

    let point = capture_location(locations, user_id, location_timeout).await?;

    let record = repo
        .insert_punch(
            NewPunch {
                user_id,
                punch_type,
                location_lat: point.lat,
                location_long: point.long,
            },
            state.last_punch(),
        )
        .await?;

    info!(
        user_id,
        punch_id = record.punch_id,
        punch_type = %record.punch_type,
        "Punch recorded"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::location::LocationError;
    use crate::location::fake::FixedLocation;
    use crate::repository::memory::InMemoryRepository;
    use std::sync::atomic::Ordering;

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[actix_web::test]
    async fn full_day_alternates_in_and_out() {
        let repo = InMemoryRepository::default();
        let gps = FixedLocation::at(1.3521, 103.8198);
        let user = repo.seed_user("John Doe", None);

        let status = clock_status(&repo, user).await.unwrap();
        assert_eq!(status.state, PunchState::None);
        assert!(status.buttons.punch_in_enabled);

        let punched_in = submit_punch(&repo, &gps, user, PunchType::In, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(punched_in.location_lat, Some(1.3521));
        assert_eq!(punched_in.location_long, Some(103.8198));

        let status = clock_status(&repo, user).await.unwrap();
        assert_eq!(status.state, PunchState::In);
        assert_eq!(status.admissible, PunchType::Out);
        assert_eq!(status.last_punch, Some(punched_in));

        submit_punch(&repo, &gps, user, PunchType::Out, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(
            clock_status(&repo, user).await.unwrap().state,
            PunchState::Out
        );
    }

    #[actix_web::test]
    async fn missing_location_writes_nothing() {
        let repo = InMemoryRepository::default();
        let user = repo.seed_user("John Doe", None);

        for source in [
            FixedLocation::failing(LocationError::Pending),
            FixedLocation::failing(LocationError::Unavailable("denied".to_string())),
        ] {
            let result = submit_punch(&repo, &source, user, PunchType::In, TIMEOUT).await;
            assert!(matches!(result, Err(AppError::LocationUnavailable)));
        }
        assert_eq!(repo.punch_writes.load(Ordering::Relaxed), 0);
        assert!(repo.last_punch_for(user).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn inadmissible_action_is_rejected_not_ignored() {
        let repo = InMemoryRepository::default();
        let gps = FixedLocation::at(0.0, 0.0);
        let user = repo.seed_user("John Doe", None);

        let result = submit_punch(&repo, &gps, user, PunchType::Out, TIMEOUT).await;
        assert!(matches!(
            result,
            Err(AppError::PunchNotAdmissible {
                requested: PunchType::Out,
                last: None
            })
        ));

        submit_punch(&repo, &gps, user, PunchType::In, TIMEOUT)
            .await
            .unwrap();
        let twice = submit_punch(&repo, &gps, user, PunchType::In, TIMEOUT).await;
        assert!(matches!(twice, Err(AppError::PunchNotAdmissible { .. })));
        assert_eq!(repo.punch_writes.load(Ordering::Relaxed), 1);
    }

    #[actix_web::test]
    async fn users_have_independent_state() {
        let repo = InMemoryRepository::default();
        let gps = FixedLocation::at(0.0, 0.0);
        let alice = repo.seed_user("Alice", None);
        let bob = repo.seed_user("Bob", None);

        submit_punch(&repo, &gps, alice, PunchType::In, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(clock_status(&repo, bob).await.unwrap().state, PunchState::None);
        submit_punch(&repo, &gps, bob, PunchType::In, TIMEOUT)
            .await
            .unwrap();
    }
}
