//! Course and enrollment models.
//!
//! Maps onto the Supabase `courses` and `course_enrollments` tables.
//! `teacher_id` and `student_id` are bare identifiers; referential
//! integrity is the external data store's concern.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Unique short code, e.g. `MATH-101`.
    pub code: String,
    /// References profiles.id of the teaching profile.
    pub teacher_id: Uuid,
    pub academic_year: String,
    pub semester: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// One row per (course, student) pair; the table's composite unique
/// constraint rejects duplicate enrollments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseEnrollment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    pub teacher_id: Uuid,
    #[validate(length(min = 1, max = 20))]
    pub academic_year: String,
    #[validate(length(min = 1, max = 20))]
    pub semester: String,
}
