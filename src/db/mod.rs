pub mod classes;
pub mod courses;
pub mod enrollments;
pub mod schedules;
pub mod students;
