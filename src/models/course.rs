use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reference data the batch screens join against. The batch workflow
/// never mutates courses beyond creating them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub course_name: String,
    pub short_code: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub course_name: String,
    pub short_code: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
}
