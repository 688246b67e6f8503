use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Student fields flattened out of the profile join. The enrollment id,
/// not the student id, identifies the row to unenroll.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentProfile {
    #[sqlx(rename = "student_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EnrollmentWithStudent {
    pub id: String,
    pub enrolled_at: String,
    pub progress: i64,
    #[sqlx(flatten)]
    pub student: StudentProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEnrollmentRequest {
    pub student_id: String,
}
