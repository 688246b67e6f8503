use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Course, NewCourseRequest};

pub async fn fetch_courses(db: &SqlitePool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, course_name, short_code, color, icon, created_at
         FROM courses
         ORDER BY course_name ASC",
    )
    .fetch_all(db)
    .await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT id, course_name, short_code, color, icon, created_at
         FROM courses
         WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_course(
    db: &SqlitePool,
    req: NewCourseRequest,
) -> Result<Course, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO courses (id, course_name, short_code, color, icon, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&req.course_name)
    .bind(&req.short_code)
    .bind(&req.color)
    .bind(&req.icon)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Course {
        id,
        course_name: req.course_name,
        short_code: req.short_code,
        color: req.color,
        icon: req.icon,
        created_at: now,
    })
}
