use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{delete, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use serde::{Deserialize, Serialize};

use crate::db::{classes, courses, enrollments, schedules, students};
use crate::error::AppError;
use crate::mailer::EmailMessage;
use crate::models::*;
use crate::state::AppState;

#[derive(Deserialize)]
struct ClassQueryParams {
    course_id: Option<String>,
    #[serde(default)]
    search: String,
}

#[derive(Debug, Serialize)]
struct SendEmailResponse {
    message: String,
}

/// Fields are optional at the wire level so that an absent field and an
/// empty one both answer 400 rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
struct SendEmailRequest {
    to: Option<String>,
    subject: Option<String>,
    html: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route("/students", get(list_students).post(create_student))
        .route("/classes", get(list_classes).post(create_class))
        .route("/classes/{id}", get(get_class).delete(delete_class))
        .route(
            "/classes/{id}/enrollments",
            get(list_enrollments).post(create_enrollment),
        )
        .route("/enrollments/{id}", delete(delete_enrollment))
        .route(
            "/classes/{id}/schedules",
            get(list_schedules).post(create_schedule),
        )
        .route("/schedules/{id}", delete(delete_schedule))
        .route("/email/send", post(send_email))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = courses::fetch_courses(&state.db).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    if req.course_name.trim().is_empty() {
        return Err(AppError::BadRequest("course_name is required".to_string()));
    }
    let course = courses::insert_course(&state.db, req).await?;
    Ok(Json(course))
}

async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = students::fetch_students(&state.db).await?;
    Ok(Json(students))
}

async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<NewStudentRequest>,
) -> Result<Json<Student>, AppError> {
    let student = students::insert_student(&state.db, req).await?;
    Ok(Json(student))
}

/// The course filter narrows the fetch (and switches to batch-number
/// order); the search text is applied in memory over the fetched
/// summaries, as the admin screen always did.
async fn list_classes(
    State(state): State<AppState>,
    Query(params): Query<ClassQueryParams>,
) -> Result<Json<Vec<ClassSummary>>, AppError> {
    let summaries =
        classes::fetch_class_summaries(&state.db, params.course_id.as_deref()).await?;
    let search = params.search.trim();
    let filtered = summaries
        .into_iter()
        .filter(|c| c.matches(search, None))
        .collect();
    Ok(Json(filtered))
}

async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<NewClassRequest>,
) -> Result<Json<ClassSummary>, AppError> {
    let class = classes::insert_class(&state.db, req).await?;
    Ok(Json(class))
}

async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClassSummary>, AppError> {
    let class = classes::find_class_summary(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(class))
}

async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    classes::delete_class(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_enrollments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EnrollmentWithStudent>>, AppError> {
    let roster = enrollments::fetch_enrollments(&state.db, &id).await?;
    Ok(Json(roster))
}

async fn create_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewEnrollmentRequest>,
) -> Result<Json<EnrollmentWithStudent>, AppError> {
    let enrollment = enrollments::insert_enrollment(&state.db, &id, req).await?;
    Ok(Json(enrollment))
}

async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    enrollments::remove_enrollment(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ClassSchedule>>, AppError> {
    let slots = schedules::fetch_schedules(&state.db, &id).await?;
    Ok(Json(slots))
}

async fn create_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NewScheduleRequest>,
) -> Result<Json<ClassSchedule>, AppError> {
    let slot = schedules::insert_schedule(&state.db, &id, req).await?;
    Ok(Json(slot))
}

async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    schedules::delete_schedule(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    let to = req.to.unwrap_or_default();
    let subject = req.subject.unwrap_or_default();
    let html = req.html.unwrap_or_default();
    if to.trim().is_empty() || subject.trim().is_empty() || html.trim().is_empty() {
        return Err(AppError::BadRequest(
            "to, subject and html are required".to_string(),
        ));
    }
    state.mailer.send(&EmailMessage { to, subject, html }).await?;
    Ok(Json(SendEmailResponse {
        message: "Email sent successfully".to_string(),
    }))
}
