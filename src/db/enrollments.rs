use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{EnrollmentWithStudent, NewEnrollmentRequest, StudentProfile};

/// Roster for one batch, flattened with the student profile. Newest
/// enrollment first.
pub async fn fetch_enrollments(
    db: &SqlitePool,
    class_id: &str,
) -> Result<Vec<EnrollmentWithStudent>, sqlx::Error> {
    sqlx::query_as::<_, EnrollmentWithStudent>(
        "SELECT
            e.id, e.enrolled_at, e.progress,
            s.id AS student_id, s.full_name, s.email, s.avatar_url
         FROM enrollments e
         JOIN students s ON s.id = e.student_id
         WHERE e.class_id = ?
         ORDER BY e.enrolled_at DESC",
    )
    .bind(class_id)
    .fetch_all(db)
    .await
}

/// Count-only query, no row materialization.
pub async fn count_enrollments(db: &SqlitePool, class_id: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE class_id = ?")
        .bind(class_id)
        .fetch_one(db)
        .await
}

/// Enrolls a student into a batch. The capacity check and the insert run
/// in one transaction, so a full class cannot be oversubscribed by two
/// concurrent requests.
pub async fn insert_enrollment(
    db: &SqlitePool,
    class_id: &str,
    req: NewEnrollmentRequest,
) -> Result<EnrollmentWithStudent, AppError> {
    let mut tx = db.begin().await?;

    let capacity: i64 = sqlx::query_scalar("SELECT capacity FROM classes WHERE id = ?")
        .bind(class_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound)?;

    let enrolled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE class_id = ?")
        .bind(class_id)
        .fetch_one(&mut *tx)
        .await?;
    if enrolled >= capacity {
        return Err(AppError::Conflict(format!(
            "class is full ({enrolled}/{capacity})"
        )));
    }

    let student = sqlx::query_as::<_, StudentProfile>(
        "SELECT id AS student_id, full_name, email, avatar_url FROM students WHERE id = ?",
    )
    .bind(&req.student_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::BadRequest(format!("unknown student: {}", req.student_id)))?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO enrollments (id, class_id, student_id, enrolled_at, progress)
         VALUES (?, ?, ?, ?, 0)",
    )
    .bind(&id)
    .bind(class_id)
    .bind(&req.student_id)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(format!(
            "{} is already enrolled in this class",
            student.full_name
        )),
        _ => AppError::Database(e),
    })?;

    tx.commit().await?;

    Ok(EnrollmentWithStudent {
        id,
        enrolled_at: now,
        progress: 0,
        student,
    })
}

/// Removes a student from a batch. Deletes the enrollment record only,
/// never the student profile.
pub async fn remove_enrollment(db: &SqlitePool, id: &str) -> Result<(), AppError> {
    let rows = sqlx::query("DELETE FROM enrollments WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
