use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::assignments::model::{
    Assignment, AssignmentSubmission, CreateAssignmentDto, GradeSubmissionDto, SubmitAssignmentDto,
};
use crate::utils::errors::AppError;

const ASSIGNMENT_COLUMNS: &str =
    "id, course_id, title, description, due_date, max_score, is_published, created_at, updated_at";

const SUBMISSION_COLUMNS: &str =
    "id, assignment_id, student_id, content, file_url, score, feedback, submitted_at, graded_at";

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db, dto))]
    pub async fn create_assignment(
        db: &PgPool,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let query = format!(
            "INSERT INTO assignments (course_id, title, description, due_date, max_score)
             VALUES ($1, $2, $3, $4, COALESCE($5, 100.00))
             RETURNING {}",
            ASSIGNMENT_COLUMNS
        );

        let assignment = sqlx::query_as::<_, Assignment>(&query)
            .bind(dto.course_id)
            .bind(&dto.title)
            .bind(&dto.description)
            .bind(dto.due_date)
            .bind(dto.max_score)
            .fetch_one(db)
            .await?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn get_assignments_for_course(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<Assignment>, AppError> {
        let query = format!(
            "SELECT {} FROM assignments WHERE course_id = $1 ORDER BY created_at DESC",
            ASSIGNMENT_COLUMNS
        );

        let assignments = sqlx::query_as::<_, Assignment>(&query)
            .bind(course_id)
            .fetch_all(db)
            .await?;

        Ok(assignments)
    }

    /// One submission per (assignment, student); resubmission fails with
    /// 409 from the composite constraint.
    #[instrument(skip(db, dto))]
    pub async fn submit_assignment(
        db: &PgPool,
        assignment_id: Uuid,
        student_id: Uuid,
        dto: SubmitAssignmentDto,
    ) -> Result<AssignmentSubmission, AppError> {
        let query = format!(
            "INSERT INTO assignment_submissions (assignment_id, student_id, content, file_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            SUBMISSION_COLUMNS
        );

        let submission = sqlx::query_as::<_, AssignmentSubmission>(&query)
            .bind(assignment_id)
            .bind(student_id)
            .bind(&dto.content)
            .bind(&dto.file_url)
            .fetch_one(db)
            .await?;

        Ok(submission)
    }

    #[instrument(skip(db, dto))]
    pub async fn grade_submission(
        db: &PgPool,
        submission_id: Uuid,
        dto: GradeSubmissionDto,
    ) -> Result<AssignmentSubmission, AppError> {
        let query = format!(
            "UPDATE assignment_submissions
             SET score = $2, feedback = $3, graded_at = now()
             WHERE id = $1
             RETURNING {}",
            SUBMISSION_COLUMNS
        );

        sqlx::query_as::<_, AssignmentSubmission>(&query)
            .bind(submission_id)
            .bind(dto.score)
            .bind(&dto.feedback)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow::anyhow!(
                    "Submission with id {} not found",
                    submission_id
                ))
            })
    }

    #[instrument(skip(db))]
    pub async fn get_submissions(
        db: &PgPool,
        assignment_id: Uuid,
    ) -> Result<Vec<AssignmentSubmission>, AppError> {
        let query = format!(
            "SELECT {} FROM assignment_submissions WHERE assignment_id = $1 ORDER BY submitted_at DESC",
            SUBMISSION_COLUMNS
        );

        let submissions = sqlx::query_as::<_, AssignmentSubmission>(&query)
            .bind(assignment_id)
            .fetch_all(db)
            .await?;

        Ok(submissions)
    }
}
