use crate::attendance::date_key;
use crate::models::{PunchEvent, PunchKind, RawPunch};
use chrono::{DateTime, Datelike, TimeZone, Weekday};
use thiserror::Error;

pub const DAILY_PUNCH_LIMIT: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PunchError {
    #[error("already registered the maximum of {} punches today", DAILY_PUNCH_LIMIT)]
    DailyLimitReached,
}

/// Kind of the next punch given today's punches, newest first.
pub fn next_kind(today: &[PunchEvent]) -> PunchKind {
    match today.first().map(|punch| punch.kind) {
        Some(PunchKind::CheckIn) => PunchKind::CheckOut,
        _ => PunchKind::CheckIn,
    }
}

pub fn limit_reached(today: &[PunchEvent]) -> bool {
    today.len() >= DAILY_PUNCH_LIMIT
}

/// Builds the record to send to the backend for a punch made at `now`.
pub fn build_punch<Tz: TimeZone>(
    user_id: &str,
    now: &DateTime<Tz>,
    today: &[PunchEvent],
) -> Result<RawPunch, PunchError>
where
    Tz::Offset: std::fmt::Display,
{
    if limit_reached(today) {
        return Err(PunchError::DailyLimitReached);
    }

    let timestamp = now.timestamp_millis();
    Ok(RawPunch {
        id: Some(timestamp.to_string()),
        user_id: user_id.to_string(),
        label: punch_label(now),
        timestamp,
        date: date_key(now.date_naive()),
        kind: next_kind(today),
    })
}

/// `"<weekday> | HH:MM:SS"` with the weekday spelled in Portuguese.
pub fn punch_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} | {}", weekday_name(now.weekday()), now.format("%H:%M:%S"))
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}
