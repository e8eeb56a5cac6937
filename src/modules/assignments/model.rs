//! Assignment and submission models.
//!
//! Maps onto the Supabase `assignments` and `assignment_submissions`
//! tables. One submission per (assignment, student).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Assignment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub max_score: f64,
    pub is_published: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AssignmentSubmission {
    pub id: Uuid,
    pub assignment_id: Uuid,
    pub student_id: Uuid,
    pub content: Option<String>,
    pub file_url: Option<String>,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AssignmentSubmission {
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssignmentDto {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(range(min = 0.0, max = 999.99))]
    pub max_score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitAssignmentDto {
    pub content: Option<String>,
    #[validate(url(message = "file_url must be a valid URL"))]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GradeSubmissionDto {
    #[validate(range(min = 0.0))]
    pub score: f64,
    pub feedback: Option<String>,
}
