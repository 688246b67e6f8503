use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A class ("batch") joined with its course, plus the quantities derived
/// from the enrollment roster at read time. Nothing derived is stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClassSummary {
    pub id: String,
    pub course_id: String,
    pub batch_name: String,
    pub batch_number: i64,
    pub capacity: i64,
    pub created_at: String,
    pub course_name: String,
    pub short_code: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub enrolled_count: i64,
    #[sqlx(default)]
    pub percentage: u32,
    #[sqlx(default)]
    pub is_full: bool,
}

impl ClassSummary {
    /// Fills in `percentage` and `is_full` from the fetched counts.
    /// A zero capacity cannot be created, but if one ever appears the
    /// class counts as full at 100% rather than dividing by zero.
    pub fn with_derived(mut self) -> Self {
        self.is_full = self.enrolled_count >= self.capacity;
        self.percentage = if self.capacity <= 0 {
            100
        } else {
            (self.enrolled_count as f64 / self.capacity as f64 * 100.0).round() as u32
        };
        self
    }

    /// The list-screen filter: the search text must appear in the batch
    /// name or the joined course name (case-insensitive), and the course
    /// filter, when set, must match exactly.
    pub fn matches(&self, search: &str, course_id: Option<&str>) -> bool {
        let search_ok = search.is_empty() || {
            let needle = search.to_lowercase();
            self.batch_name.to_lowercase().contains(&needle)
                || self.course_name.to_lowercase().contains(&needle)
        };
        let course_ok = course_id.is_none_or(|c| self.course_id == c);
        search_ok && course_ok
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassRequest {
    pub course_id: String,
    /// Defaults to "<course> Batch <n>" when omitted.
    pub batch_name: Option<String>,
    /// Defaults to the next sequential number for the course.
    pub batch_number: Option<i64>,
    pub capacity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(batch_name: &str, course_id: &str, course_name: &str) -> ClassSummary {
        ClassSummary {
            id: "c1".to_string(),
            course_id: course_id.to_string(),
            batch_name: batch_name.to_string(),
            batch_number: 1,
            capacity: 30,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            course_name: course_name.to_string(),
            short_code: None,
            color: None,
            icon: None,
            enrolled_count: 0,
            percentage: 0,
            is_full: false,
        }
    }

    #[test]
    fn matches_batch_name_case_insensitively() {
        let s = summary("WD Batch 3", "course-1", "Web Dev");
        assert!(s.matches("batch 3", None));
        assert!(s.matches("wd", None));
        assert!(!s.matches("python", None));
    }

    #[test]
    fn matches_joined_course_name() {
        let s = summary("Batch 1", "course-1", "Web Dev");
        assert!(s.matches("web", None));
        assert!(s.matches("WEB DEV", None));
    }

    #[test]
    fn course_filter_must_match_exactly() {
        let s = summary("Batch 1", "course-1", "Web Dev");
        assert!(s.matches("", Some("course-1")));
        assert!(!s.matches("", Some("course-2")));
        // Both conditions apply together.
        assert!(!s.matches("web", Some("course-2")));
        assert!(s.matches("web", Some("course-1")));
    }

    #[test]
    fn empty_search_matches_everything() {
        let s = summary("Batch 1", "course-1", "Web Dev");
        assert!(s.matches("", None));
    }

    #[test]
    fn derived_counts() {
        let mut s = summary("Batch 1", "course-1", "Web Dev");
        s.capacity = 30;
        s.enrolled_count = 15;
        let s = s.with_derived();
        assert_eq!(s.percentage, 50);
        assert!(!s.is_full);

        let mut s = summary("Batch 1", "course-1", "Web Dev");
        s.capacity = 30;
        s.enrolled_count = 30;
        let s = s.with_derived();
        assert_eq!(s.percentage, 100);
        assert!(s.is_full);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        let mut s = summary("Batch 1", "course-1", "Web Dev");
        s.capacity = 3;
        s.enrolled_count = 1;
        assert_eq!(s.with_derived().percentage, 33);

        let mut s = summary("Batch 1", "course-1", "Web Dev");
        s.capacity = 3;
        s.enrolled_count = 2;
        assert_eq!(s.with_derived().percentage, 67);
    }

    #[test]
    fn zero_capacity_is_full_at_one_hundred_percent() {
        // Unreachable through the create path (capacity >= 1 is enforced),
        // pinned here so the division-by-zero case stays defined.
        let mut s = summary("Batch 1", "course-1", "Web Dev");
        s.capacity = 0;
        s.enrolled_count = 0;
        let s = s.with_derived();
        assert_eq!(s.percentage, 100);
        assert!(s.is_full);
    }
}
