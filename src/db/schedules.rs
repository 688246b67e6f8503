use chrono::NaiveTime;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ClassSchedule, NewScheduleRequest};

/// All weekly slots for a batch. No explicit ordering beyond insertion
/// order; slots on the same weekday may appear in any order.
pub async fn fetch_schedules(
    db: &SqlitePool,
    class_id: &str,
) -> Result<Vec<ClassSchedule>, sqlx::Error> {
    sqlx::query_as::<_, ClassSchedule>(
        "SELECT id, course_id, class_id, day_of_week, start_time, duration_minutes
         FROM class_schedules
         WHERE class_id = ?",
    )
    .bind(class_id)
    .fetch_all(db)
    .await
}

/// Adds one slot. The course id is copied from the class rather than
/// taken from the request. Overlap with existing slots is allowed.
pub async fn insert_schedule(
    db: &SqlitePool,
    class_id: &str,
    req: NewScheduleRequest,
) -> Result<ClassSchedule, AppError> {
    if req.duration_minutes < 1 {
        return Err(AppError::BadRequest(
            "duration_minutes must be a positive integer".to_string(),
        ));
    }
    if NaiveTime::parse_from_str(&req.start_time, "%H:%M").is_err() {
        return Err(AppError::BadRequest(format!(
            "start_time must be HH:MM, got {:?}",
            req.start_time
        )));
    }

    let course_id: String = sqlx::query_scalar("SELECT course_id FROM classes WHERE id = ?")
        .bind(class_id)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO class_schedules
            (id, course_id, class_id, day_of_week, start_time, duration_minutes)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&course_id)
    .bind(class_id)
    .bind(req.day_of_week)
    .bind(&req.start_time)
    .bind(req.duration_minutes)
    .execute(db)
    .await?;

    Ok(ClassSchedule {
        id,
        course_id,
        class_id: class_id.to_string(),
        day_of_week: req.day_of_week,
        start_time: req.start_time,
        duration_minutes: req.duration_minutes,
    })
}

pub async fn delete_schedule(db: &SqlitePool, id: &str) -> Result<(), AppError> {
    let rows = sqlx::query("DELETE FROM class_schedules WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
