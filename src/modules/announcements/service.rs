use sqlx::PgPool;
use tracing::instrument;

use crate::modules::announcements::model::{Announcement, CreateAnnouncementDto};
use crate::utils::errors::AppError;

const ANNOUNCEMENT_COLUMNS: &str =
    "id, title, content, author_id, target_roles, priority, is_published, created_at, updated_at";

pub struct AnnouncementService;

impl AnnouncementService {
    #[instrument(skip(db, dto))]
    pub async fn create_announcement(
        db: &PgPool,
        dto: CreateAnnouncementDto,
    ) -> Result<Announcement, AppError> {
        let query = format!(
            "INSERT INTO announcements (title, content, author_id, target_roles, priority, is_published)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            ANNOUNCEMENT_COLUMNS
        );

        let announcement = sqlx::query_as::<_, Announcement>(&query)
            .bind(&dto.title)
            .bind(&dto.content)
            .bind(dto.author_id)
            .bind(&dto.target_roles)
            .bind(dto.priority)
            .bind(dto.is_published)
            .fetch_one(db)
            .await?;

        Ok(announcement)
    }

    /// Published announcements visible to a role: targeted at it, or
    /// untargeted (null/empty `target_roles`).
    #[instrument(skip(db))]
    pub async fn get_published_for_role(
        db: &PgPool,
        role: &str,
    ) -> Result<Vec<Announcement>, AppError> {
        let query = format!(
            "SELECT {} FROM announcements
             WHERE is_published
               AND (target_roles IS NULL
                    OR cardinality(target_roles) = 0
                    OR $1 = ANY(target_roles))
             ORDER BY created_at DESC",
            ANNOUNCEMENT_COLUMNS
        );

        let announcements = sqlx::query_as::<_, Announcement>(&query)
            .bind(role)
            .fetch_all(db)
            .await?;

        Ok(announcements)
    }
}
