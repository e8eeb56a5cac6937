use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::courses::model::{Course, CourseEnrollment, CreateCourseDto};
use crate::utils::errors::AppError;

const COURSE_COLUMNS: &str =
    "id, name, description, code, teacher_id, academic_year, semester, is_active, \
     created_at, updated_at";

pub struct CourseService;

impl CourseService {
    /// Duplicate course codes surface as 409 from the unique constraint.
    #[instrument(skip(db, dto))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let query = format!(
            "INSERT INTO courses (name, description, code, teacher_id, academic_year, semester)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            COURSE_COLUMNS
        );

        let course = sqlx::query_as::<_, Course>(&query)
            .bind(&dto.name)
            .bind(&dto.description)
            .bind(&dto.code)
            .bind(dto.teacher_id)
            .bind(&dto.academic_year)
            .bind(&dto.semester)
            .fetch_one(db)
            .await?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: Uuid) -> Result<Course, AppError> {
        let query = format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS);

        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course with id {} not found", id)))
    }

    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let query = format!(
            "SELECT {} FROM courses ORDER BY created_at DESC",
            COURSE_COLUMNS
        );

        let courses = sqlx::query_as::<_, Course>(&query).fetch_all(db).await?;

        Ok(courses)
    }

    /// Enrolls a student in a course. One enrollment per (course, student);
    /// a second attempt fails with 409 from the composite constraint.
    #[instrument(skip(db))]
    pub async fn enroll_student(
        db: &PgPool,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<CourseEnrollment, AppError> {
        let enrollment = sqlx::query_as::<_, CourseEnrollment>(
            "INSERT INTO course_enrollments (course_id, student_id)
             VALUES ($1, $2)
             RETURNING id, course_id, student_id, enrolled_at",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(db)
        .await?;

        Ok(enrollment)
    }

    #[instrument(skip(db))]
    pub async fn get_enrollments(
        db: &PgPool,
        course_id: Uuid,
    ) -> Result<Vec<CourseEnrollment>, AppError> {
        let enrollments = sqlx::query_as::<_, CourseEnrollment>(
            "SELECT id, course_id, student_id, enrolled_at
             FROM course_enrollments
             WHERE course_id = $1
             ORDER BY enrolled_at",
        )
        .bind(course_id)
        .fetch_all(db)
        .await?;

        Ok(enrollments)
    }
}
