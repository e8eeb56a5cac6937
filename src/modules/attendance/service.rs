use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{Attendance, RecordAttendanceDto};
use crate::utils::errors::AppError;

const ATTENDANCE_COLUMNS: &str =
    "id, course_id, student_id, date, status, notes, recorded_by, created_at";

pub struct AttendanceService;

impl AttendanceService {
    /// Records attendance for one student on one date. A second record for
    /// the same (course, student, date) key fails with 409 from the
    /// composite constraint.
    #[instrument(skip(db, dto))]
    pub async fn record_attendance(
        db: &PgPool,
        dto: RecordAttendanceDto,
    ) -> Result<Attendance, AppError> {
        let query = format!(
            "INSERT INTO attendance (course_id, student_id, date, status, notes, recorded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            ATTENDANCE_COLUMNS
        );

        let record = sqlx::query_as::<_, Attendance>(&query)
            .bind(dto.course_id)
            .bind(dto.student_id)
            .bind(dto.date)
            .bind(dto.status)
            .bind(&dto.notes)
            .bind(dto.recorded_by)
            .fetch_one(db)
            .await?;

        Ok(record)
    }

    #[instrument(skip(db))]
    pub async fn get_course_attendance(
        db: &PgPool,
        course_id: Uuid,
        date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<Attendance>, AppError> {
        let query = format!(
            "SELECT {} FROM attendance
             WHERE course_id = $1 AND ($2::date IS NULL OR date = $2)
             ORDER BY date DESC",
            ATTENDANCE_COLUMNS
        );

        let records = sqlx::query_as::<_, Attendance>(&query)
            .bind(course_id)
            .bind(date)
            .fetch_all(db)
            .await?;

        Ok(records)
    }
}
