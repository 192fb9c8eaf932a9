use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// Stored exactly as the strings `High` / `Medium` / `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn from_label(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(AppError::invalid_input(format!(
                "priority must be high, medium or low, got '{other}'"
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub text: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub priority: Priority,
}

impl Task {
    /// Parses `date` (`YYYY-MM-DD`) and `time` (`HH:MM`) into the naive
    /// instant the record is scheduled for.
    pub fn scheduled_instant(&self) -> Result<PrimitiveDateTime, AppError> {
        let date_format = format_description!("[year]-[month]-[day]");
        let time_format = format_description!("[hour]:[minute]");
        let date = Date::parse(self.date.trim(), &date_format).map_err(|_| {
            AppError::invalid_data(format!("date must be YYYY-MM-DD, got '{}'", self.date))
        })?;
        let time = Time::parse(self.time.trim(), &time_format).map_err(|_| {
            AppError::invalid_data(format!("time must be HH:MM, got '{}'", self.time))
        })?;
        Ok(PrimitiveDateTime::new(date, time))
    }
}

pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

/// Advisory lateness marker. Never mutates or removes a task.
pub fn is_late(task: &Task) -> bool {
    is_late_at(task, now_local())
}

pub fn is_late_at(task: &Task, now: OffsetDateTime) -> bool {
    match task.scheduled_instant() {
        Ok(instant) => instant.assume_offset(now.offset()) < now,
        Err(_) => false,
    }
}
