use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Weekday names as the schedule table stores them. Deserializing a
/// request rejects anything outside the seven names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A weekly recurring slot for one batch. Overlapping slots are allowed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClassSchedule {
    pub id: String,
    pub course_id: String,
    pub class_id: String,
    pub day_of_week: DayOfWeek,
    /// "HH:MM", 24-hour.
    pub start_time: String,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewScheduleRequest {
    pub day_of_week: DayOfWeek,
    pub start_time: String,
    pub duration_minutes: i64,
}
