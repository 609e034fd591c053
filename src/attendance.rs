use crate::models::{DayRecord, MonthlyAttendance, PunchEvent, PunchKind};
use chrono::{Datelike, Months, NaiveDate, Weekday};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttendanceError {
    #[error("punch label {label:?} has no time-of-day after '|'")]
    MalformedLabel { label: String },
    #[error("punch date {date:?} is not YYYY-MM-DD")]
    MalformedDate { date: String },
    #[error("no calendar month contains {0}")]
    MonthOutOfRange(NaiveDate),
}

/// Builds the attendance mirror for the month containing `month`.
///
/// Events outside the month are ignored. Within a day the earliest check-in
/// and the latest check-out are kept. Every day of the month gets a record,
/// and weekdays with neither slot filled count as absences.
pub fn compute_monthly_attendance(
    events: &[PunchEvent],
    month: NaiveDate,
) -> Result<MonthlyAttendance, AttendanceError> {
    let (first, last) = month_bounds(month)?;
    let (start, end) = (date_key(first), date_key(last));

    let mut in_month: Vec<&PunchEvent> = events
        .iter()
        .filter(|event| {
            let date = event.date.as_str();
            date >= start.as_str() && date <= end.as_str()
        })
        .collect();
    // stable: equal timestamps keep input order
    in_month.sort_by_key(|event| event.timestamp);

    let mut days: BTreeMap<String, DayRecord> = BTreeMap::new();
    for event in in_month {
        let key = day_label(&event.date)?;
        let time = time_of_day(&event.label)?;
        let record = days
            .entry(key.clone())
            .or_insert_with(|| DayRecord::empty(key));
        match event.kind {
            PunchKind::CheckIn if record.check_in.is_empty() => record.check_in = time,
            PunchKind::CheckIn => {}
            PunchKind::CheckOut => record.check_out = time,
        }
    }

    let mut records = Vec::with_capacity(last.day() as usize);
    let mut absence_count = 0u32;
    for date in first.iter_days().take_while(|date| *date <= last) {
        let key = format!("{:02}/{:02}", date.day(), date.month());
        let record = days.remove(&key).unwrap_or_else(|| DayRecord::empty(key));
        if is_business_day(date) && record.is_blank() {
            absence_count += 1;
        }
        records.push(record);
    }

    Ok(MonthlyAttendance {
        records,
        absence_count,
    })
}

/// Punches recorded on `day`, newest first.
pub fn punches_for_day(events: &[PunchEvent], day: NaiveDate) -> Vec<PunchEvent> {
    let key = date_key(day);
    let mut punches: Vec<PunchEvent> = events
        .iter()
        .filter(|event| event.date == key)
        .cloned()
        .collect();
    punches.sort_by_key(|event| std::cmp::Reverse(event.timestamp));
    punches
}

pub fn month_bounds(month: NaiveDate) -> Result<(NaiveDate, NaiveDate), AttendanceError> {
    let first = month
        .with_day(1)
        .ok_or(AttendanceError::MonthOutOfRange(month))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or(AttendanceError::MonthOutOfRange(month))?;
    Ok((first, last))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn day_label(date: &str) -> Result<String, AttendanceError> {
    let malformed = || AttendanceError::MalformedDate {
        date: date.to_string(),
    };
    let mut parts = date.split('-');
    let (_, month, day) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => (year, month, day),
        _ => return Err(malformed()),
    };
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let day: u32 = day.parse().map_err(|_| malformed())?;
    Ok(format!("{day:02}/{month:02}"))
}

fn time_of_day(label: &str) -> Result<String, AttendanceError> {
    let time: String = label
        .split('|')
        .nth(1)
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if time.is_empty() {
        return Err(AttendanceError::MalformedLabel {
            label: label.to_string(),
        });
    }
    Ok(time)
}
