use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewStudentRequest, Student};

pub async fn fetch_students(db: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, full_name, email, avatar_url, created_at
         FROM students
         ORDER BY full_name ASC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_student_by_id(db: &SqlitePool, id: &str) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, full_name, email, avatar_url, created_at
         FROM students
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_student(db: &SqlitePool, req: NewStudentRequest) -> Result<Student, AppError> {
    if req.full_name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::BadRequest(
            "full_name and email are required".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO students (id, full_name, email, avatar_url, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.full_name)
    .bind(&req.email)
    .bind(&req.avatar_url)
    .bind(&now)
    .execute(db)
    .await
    .map_err(|e| match e.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("a student with email {} already exists", req.email))
        }
        _ => AppError::Database(e),
    })?;

    Ok(Student {
        id,
        full_name: req.full_name,
        email: req.email,
        avatar_url: req.avatar_url,
        created_at: now,
    })
}
