use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};
use crate::model::punch::PunchType;

/// Type of a user's most recent punch. There is no terminal state.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PunchState {
    None,
    In,
    Out,
}

impl From<Option<PunchType>> for PunchState {
    fn from(last: Option<PunchType>) -> Self {
        match last {
            None => PunchState::None,
            Some(PunchType::In) => PunchState::In,
            Some(PunchType::Out) => PunchState::Out,
        }
    }
}

impl PunchState {
    pub fn last_punch(self) -> Option<PunchType> {
        match self {
            PunchState::None => None,
            PunchState::In => Some(PunchType::In),
            PunchState::Out => Some(PunchType::Out),
        }
    }

    /// The one punch type allowed next.
    pub fn admissible(self) -> PunchType {
        match self.last_punch() {
            Some(last) => last.complement(),
            None => PunchType::In,
        }
    }

    pub fn admits(self, requested: PunchType) -> bool {
        self.admissible() == requested
    }

    /// Rejects the inadmissible action instead of ignoring it.
    pub fn admit(self, requested: PunchType) -> AppResult<PunchType> {
        if self.admits(requested) {
            Ok(requested)
        } else {
            Err(AppError::PunchNotAdmissible {
                requested,
                last: self.last_punch(),
            })
        }
    }

    pub fn buttons(self) -> PunchButtons {
        PunchButtons {
            punch_in_enabled: self.admits(PunchType::In),
            punch_out_enabled: self.admits(PunchType::Out),
        }
    }
}

/// Both buttons are always shown; exactly one is enabled.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
pub struct PunchButtons {
    pub punch_in_enabled: bool,
    pub punch_out_enabled: bool,
}

/// Server-assigned time for the next punch, strictly after the previous one.
/// Microsecond precision, matching the `TIMESTAMP(6)` column.
pub fn next_punch_time(now: DateTime<Utc>, last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(6);
    match last {
        Some(prev) if prev >= now => prev + Duration::microseconds(1),
        _ => now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_history_only_admits_punch_in() {
        let state = PunchState::from(None);
        assert_eq!(state, PunchState::None);
        assert_eq!(state.admissible(), PunchType::In);
        assert_eq!(
            state.buttons(),
            PunchButtons {
                punch_in_enabled: true,
                punch_out_enabled: false
            }
        );
    }

    #[test]
    fn last_in_only_admits_punch_out_and_vice_versa() {
        let after_in = PunchState::from(Some(PunchType::In));
        assert!(after_in.admits(PunchType::Out));
        assert!(!after_in.admits(PunchType::In));

        let after_out = PunchState::from(Some(PunchType::Out));
        assert!(after_out.admits(PunchType::In));
        assert!(!after_out.admits(PunchType::Out));
    }

    #[test]
    fn exactly_one_button_is_enabled_in_every_state() {
        for state in [PunchState::None, PunchState::In, PunchState::Out] {
            let b = state.buttons();
            assert_ne!(b.punch_in_enabled, b.punch_out_enabled, "{state:?}");
        }
    }

    #[test]
    fn inadmissible_action_is_rejected() {
        let err = PunchState::In.admit(PunchType::In).unwrap_err();
        assert!(matches!(
            err,
            AppError::PunchNotAdmissible {
                requested: PunchType::In,
                last: Some(PunchType::In)
            }
        ));
        assert_eq!(PunchState::In.admit(PunchType::Out).unwrap(), PunchType::Out);
    }

    #[test]
    fn punch_time_never_goes_backwards() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(next_punch_time(now, None), now);
        assert_eq!(next_punch_time(now, Some(now - Duration::hours(1))), now);

        let ahead = now + Duration::seconds(5);
        assert_eq!(
            next_punch_time(now, Some(ahead)),
            ahead + Duration::microseconds(1)
        );
        assert!(next_punch_time(now, Some(now)) > now);
    }

    #[test]
    fn punch_time_is_stored_precision() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let stamped = next_punch_time(now, None);
        assert_eq!(stamped.timestamp_subsec_nanos(), 123_456_000);

        let after = next_punch_time(now, Some(stamped));
        assert_eq!(after, stamped + Duration::microseconds(1));
    }
}
