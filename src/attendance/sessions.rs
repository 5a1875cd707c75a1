//! Pairs a user's punch history into worked sessions.

use crate::model::punch::{PunchRecord, PunchType};
use crate::model::session::Session;

/// Reconstructs IN -> OUT sessions from punch records in any order.
///
/// A second IN before an OUT replaces the pending one, an OUT with nothing
/// pending is dropped, and a trailing IN produces no session. Sessions come
/// back in the order of their OUT punch.
pub fn reconstruct_sessions(records: &[PunchRecord]) -> Vec<Session> {
    let mut sorted: Vec<&PunchRecord> = records.iter().collect();
    sorted.sort_by_key(|r| (r.punch_time, r.punch_id));

    let mut sessions = Vec::new();
    let mut open_in = None;

    for record in sorted {
        match record.punch_type {
            PunchType::In => open_in = Some(record.punch_time),
            PunchType::Out => {
                if let Some(in_time) = open_in.take() {
                    let seconds = (record.punch_time - in_time).num_seconds();
                    sessions.push(Session {
                        punch_in_time: in_time,
                        punch_out_time: record.punch_time,
                        hours_worked: round2(seconds as f64 / 3600.0),
                    });
                }
            }
        }
    }

    sessions
}

/// Sum of worked hours, rounded to two decimals.
pub fn total_hours(sessions: &[Session]) -> f64 {
    round2(sessions.iter().map(|s| s.hours_worked).sum())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
