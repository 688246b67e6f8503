use institute_backend::db::{classes, courses, enrollments, students};
use institute_backend::error::AppError;
use institute_backend::models::{
    NewClassRequest, NewCourseRequest, NewEnrollmentRequest, NewStudentRequest,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test db");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn new_class(course_id: &str, capacity: i64) -> NewClassRequest {
    NewClassRequest {
        course_id: course_id.to_string(),
        batch_name: None,
        batch_number: None,
        capacity,
    }
}

#[tokio::test]
async fn sequential_batches_get_derived_names() {
    let pool = setup_test_db().await;

    let course = courses::insert_course(
        &pool,
        NewCourseRequest {
            course_name: "Web Dev".to_string(),
            short_code: None,
            color: None,
            icon: None,
        },
    )
    .await
    .expect("Failed to insert course");

    let first = classes::insert_class(&pool, new_class(&course.id, 30))
        .await
        .expect("Failed to insert class");
    assert_eq!(first.batch_number, 1);
    assert_eq!(first.batch_name, "Web Dev Batch 1");

    let second = classes::insert_class(&pool, new_class(&course.id, 30))
        .await
        .expect("Failed to insert class");
    assert_eq!(second.batch_number, 2);
    assert_eq!(second.batch_name, "Web Dev Batch 2");
}

#[tokio::test]
async fn full_batch_lifecycle() {
    let pool = setup_test_db().await;

    let course = courses::insert_course(
        &pool,
        NewCourseRequest {
            course_name: "Web Dev".to_string(),
            short_code: None,
            color: None,
            icon: None,
        },
    )
    .await
    .expect("Failed to insert course");

    let class = classes::insert_class(&pool, new_class(&course.id, 30))
        .await
        .expect("Failed to insert class");

    // Fill the batch to capacity.
    for i in 0..30 {
        let student = students::insert_student(
            &pool,
            NewStudentRequest {
                full_name: format!("Student {i}"),
                email: format!("student{i}@example.com"),
                avatar_url: None,
            },
        )
        .await
        .expect("Failed to insert student");

        enrollments::insert_enrollment(
            &pool,
            &class.id,
            NewEnrollmentRequest {
                student_id: student.id,
            },
        )
        .await
        .expect("Failed to enroll");
    }

    let summary = classes::find_class_summary(&pool, &class.id)
        .await
        .expect("Failed to fetch class")
        .expect("Class not found");
    assert_eq!(summary.enrolled_count, 30);
    assert!(summary.is_full);
    assert_eq!(summary.percentage, 100);

    // Delete must be refused while students are enrolled.
    let err = classes::delete_class(&pool, &class.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(
        enrollments::count_enrollments(&pool, &class.id).await.unwrap(),
        30
    );

    // Unenroll one student; the class is no longer full.
    let roster = enrollments::fetch_enrollments(&pool, &class.id)
        .await
        .expect("Failed to list enrollments");
    enrollments::remove_enrollment(&pool, &roster[0].id)
        .await
        .expect("Failed to unenroll");

    let summary = classes::find_class_summary(&pool, &class.id)
        .await
        .expect("Failed to fetch class")
        .expect("Class not found");
    assert_eq!(summary.enrolled_count, 29);
    assert!(!summary.is_full);
    assert_eq!(summary.percentage, 97);

    // Still not empty, still protected.
    let err = classes::delete_class(&pool, &class.id).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Empty the roster, then the delete succeeds.
    let roster = enrollments::fetch_enrollments(&pool, &class.id)
        .await
        .expect("Failed to list enrollments");
    for enrollment in roster {
        enrollments::remove_enrollment(&pool, &enrollment.id)
            .await
            .expect("Failed to unenroll");
    }

    classes::delete_class(&pool, &class.id)
        .await
        .expect("Failed to delete class");
    assert!(classes::find_class_summary(&pool, &class.id)
        .await
        .expect("Failed to fetch class")
        .is_none());
}

#[tokio::test]
async fn global_listing_is_newest_first_with_counts() {
    let pool = setup_test_db().await;

    let web = courses::insert_course(
        &pool,
        NewCourseRequest {
            course_name: "Web Dev".to_string(),
            short_code: None,
            color: None,
            icon: None,
        },
    )
    .await
    .expect("Failed to insert course");
    let python = courses::insert_course(
        &pool,
        NewCourseRequest {
            course_name: "Python".to_string(),
            short_code: Some("PY".to_string()),
            color: None,
            icon: None,
        },
    )
    .await
    .expect("Failed to insert course");

    let web_class = classes::insert_class(&pool, new_class(&web.id, 10))
        .await
        .expect("Failed to insert class");
    classes::insert_class(&pool, new_class(&python.id, 20))
        .await
        .expect("Failed to insert class");

    let student = students::insert_student(
        &pool,
        NewStudentRequest {
            full_name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            avatar_url: None,
        },
    )
    .await
    .expect("Failed to insert student");
    enrollments::insert_enrollment(
        &pool,
        &web_class.id,
        NewEnrollmentRequest {
            student_id: student.id,
        },
    )
    .await
    .expect("Failed to enroll");

    let all = classes::fetch_class_summaries(&pool, None)
        .await
        .expect("Failed to list classes");
    assert_eq!(all.len(), 2);

    let web_summary = all.iter().find(|c| c.id == web_class.id).unwrap();
    assert_eq!(web_summary.course_name, "Web Dev");
    assert_eq!(web_summary.enrolled_count, 1);
    assert_eq!(web_summary.percentage, 10);

    let python_summary = all.iter().find(|c| c.id != web_class.id).unwrap();
    assert_eq!(python_summary.enrolled_count, 0);
    assert_eq!(python_summary.batch_name, "PY Batch 1");

    // The filter predicate picks the exact subset.
    let matches: Vec<&str> = all
        .iter()
        .filter(|c| c.matches("web", None))
        .map(|c| c.course_name.as_str())
        .collect();
    assert_eq!(matches, vec!["Web Dev"]);

    let matches: Vec<&str> = all
        .iter()
        .filter(|c| c.matches("batch", Some(python.id.as_str())))
        .map(|c| c.batch_name.as_str())
        .collect();
    assert_eq!(matches, vec!["PY Batch 1"]);
}
