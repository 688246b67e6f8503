use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{ClassSummary, Course, NewClassRequest};

/// One aggregated query for the class list: course fields joined in and
/// the enrollment count grouped per class, instead of a count round trip
/// for every row.
const SUMMARY_SELECT: &str = "
    SELECT
        c.id, c.course_id, c.batch_name, c.batch_number, c.capacity, c.created_at,
        co.course_name, co.short_code, co.color, co.icon,
        COUNT(e.id) AS enrolled_count
    FROM classes c
    JOIN courses co ON co.id = c.course_id
    LEFT JOIN enrollments e ON e.class_id = c.id
";

/// Next sequential batch number for a course: max + 1, or 1 when the
/// course has no batches yet. Takes any executor so the create path can
/// allocate inside its transaction.
pub async fn next_batch_number(
    db: impl SqliteExecutor<'_>,
    course_id: &str,
) -> Result<i64, sqlx::Error> {
    let max: Option<i64> =
        sqlx::query_scalar("SELECT MAX(batch_number) FROM classes WHERE course_id = ?")
            .bind(course_id)
            .fetch_one(db)
            .await?;
    Ok(max.unwrap_or(0) + 1)
}

/// Newest batches first when listing globally; within one course, batches
/// in numeric order.
pub async fn fetch_class_summaries(
    db: &SqlitePool,
    course_id: Option<&str>,
) -> Result<Vec<ClassSummary>, sqlx::Error> {
    let rows = match course_id {
        Some(course_id) => {
            let sql = format!(
                "{SUMMARY_SELECT} WHERE c.course_id = ? GROUP BY c.id ORDER BY c.batch_number ASC"
            );
            sqlx::query_as::<_, ClassSummary>(&sql)
                .bind(course_id)
                .fetch_all(db)
                .await?
        }
        None => {
            let sql = format!("{SUMMARY_SELECT} GROUP BY c.id ORDER BY c.created_at DESC");
            sqlx::query_as::<_, ClassSummary>(&sql).fetch_all(db).await?
        }
    };

    Ok(rows.into_iter().map(ClassSummary::with_derived).collect())
}

pub async fn find_class_summary(
    db: &SqlitePool,
    id: &str,
) -> Result<Option<ClassSummary>, sqlx::Error> {
    let sql = format!("{SUMMARY_SELECT} WHERE c.id = ? GROUP BY c.id");
    let row = sqlx::query_as::<_, ClassSummary>(&sql)
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row.map(ClassSummary::with_derived))
}

/// Creates a batch. Allocation of the batch number and the insert happen
/// in one transaction, and the UNIQUE(course_id, batch_number) index
/// turns any race on a manual override into a conflict instead of a
/// duplicate.
pub async fn insert_class(
    db: &SqlitePool,
    req: NewClassRequest,
) -> Result<ClassSummary, AppError> {
    if req.capacity < 1 {
        return Err(AppError::BadRequest(
            "capacity must be a positive integer".to_string(),
        ));
    }
    if let Some(n) = req.batch_number {
        if n < 1 {
            return Err(AppError::BadRequest(
                "batch_number must be a positive integer".to_string(),
            ));
        }
    }

    let mut tx = db.begin().await?;

    let course = sqlx::query_as::<_, Course>(
        "SELECT id, course_name, short_code, color, icon, created_at
         FROM courses
         WHERE id = ?",
    )
    .bind(&req.course_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::BadRequest(format!("unknown course: {}", req.course_id)))?;

    let batch_number = match req.batch_number {
        Some(n) => n,
        None => next_batch_number(&mut *tx, &req.course_id).await?,
    };

    let batch_name = req
        .batch_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| default_batch_name(&course, batch_number));

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO classes (id, course_id, batch_name, batch_number, capacity, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.course_id)
    .bind(&batch_name)
    .bind(batch_number)
    .bind(req.capacity)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => AppError::Conflict(format!(
            "batch number {} already exists for course {}",
            batch_number, course.course_name
        )),
        _ => AppError::Database(e),
    })?;

    tx.commit().await?;

    let summary = ClassSummary {
        id,
        course_id: req.course_id,
        batch_name,
        batch_number,
        capacity: req.capacity,
        created_at: now,
        course_name: course.course_name,
        short_code: course.short_code,
        color: course.color,
        icon: course.icon,
        enrolled_count: 0,
        percentage: 0,
        is_full: false,
    };
    Ok(summary.with_derived())
}

/// Deletes a batch. Refused while any student is enrolled; the count and
/// the delete share a transaction so the guard cannot race an enrollment.
pub async fn delete_class(db: &SqlitePool, id: &str) -> Result<(), AppError> {
    let mut tx = db.begin().await?;

    let enrolled: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE class_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if enrolled > 0 {
        return Err(AppError::Conflict(format!(
            "cannot delete a class with {enrolled} enrolled students"
        )));
    }

    let rows = sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(AppError::NotFound);
    }

    tx.commit().await?;
    Ok(())
}

fn default_batch_name(course: &Course, batch_number: i64) -> String {
    match course.short_code.as_deref() {
        Some(code) if !code.trim().is_empty() => format!("{code} Batch {batch_number}"),
        _ => format!("{} Batch {}", course.course_name, batch_number),
    }
}
