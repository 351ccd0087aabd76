use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::composer::NotificationChannel;
use crate::timezone::{DEFAULT_TIME_ZONE, normalize_time_zone, resolve_local_datetime_to_utc};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// 24-hour wall-clock time, `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub time_zone: Option<String>,
    pub content: String,
    pub channel: NotificationChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfirmation {
    pub status: String,
    pub scheduled_for: String,
    pub local_time: String,
    pub time_zone: String,
    pub channel: NotificationChannel,
    pub content: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("notification content must not be empty")]
    EmptyContent,
    #[error("date must be formatted as YYYY-MM-DD")]
    InvalidDate,
    #[error("time must be a 24-hour HH:MM value")]
    InvalidTime,
    #[error("time_zone is not a valid IANA timezone")]
    InvalidTimeZone,
    #[error("scheduled time {0} is in the past")]
    InPast(String),
}

pub fn parse_local_time_hhmm(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    let (hour, minute) = trimmed.split_once(':')?;
    if hour.len() != 2 || minute.len() != 2 {
        return None;
    }

    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Validates a scheduling request and returns the confirmation the UI shows.
/// Nothing is queued or delivered.
pub fn simulate_schedule(
    request: &ScheduleRequest,
    now_utc: DateTime<Utc>,
) -> Result<ScheduleConfirmation, ScheduleError> {
    let content = request.content.trim();
    if content.is_empty() {
        return Err(ScheduleError::EmptyContent);
    }

    let date = NaiveDate::parse_from_str(request.date.trim(), "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate)?;
    let time = parse_local_time_hhmm(&request.time).ok_or(ScheduleError::InvalidTime)?;

    let time_zone = match request.time_zone.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            normalize_time_zone(raw).ok_or(ScheduleError::InvalidTimeZone)?
        }
        _ => DEFAULT_TIME_ZONE.to_string(),
    };
    let tz = time_zone
        .parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimeZone)?;

    let local = date.and_time(time);
    let scheduled_for =
        resolve_local_datetime_to_utc(&tz, local).ok_or(ScheduleError::InvalidTime)?;
    if scheduled_for < now_utc {
        return Err(ScheduleError::InPast(
            scheduled_for.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
    }

    let local_time = local.format("%Y-%m-%d %H:%M").to_string();
    let message = format!(
        "{} notification scheduled for {local_time} ({time_zone}).",
        capitalized(request.channel.as_str())
    );

    Ok(ScheduleConfirmation {
        status: "scheduled".to_string(),
        scheduled_for: scheduled_for.to_rfc3339_opts(SecondsFormat::Secs, true),
        local_time,
        time_zone,
        channel: request.channel,
        content: content.to_string(),
        message,
    })
}

fn capitalized(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
