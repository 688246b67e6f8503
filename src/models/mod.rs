pub mod class;
pub mod course;
pub mod enrollment;
pub mod schedule;
pub mod student;

pub use class::{ClassSummary, NewClassRequest};
pub use course::{Course, NewCourseRequest};
pub use enrollment::{EnrollmentWithStudent, NewEnrollmentRequest, StudentProfile};
pub use schedule::{ClassSchedule, DayOfWeek, NewScheduleRequest};
pub use student::{NewStudentRequest, Student};
