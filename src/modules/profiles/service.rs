use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::profiles::model::{Profile, UpdateProfileDto};
use crate::utils::errors::AppError;

const PROFILE_COLUMNS: &str =
    "id, user_id, email, first_name, last_name, role, phone, avatar_url, is_active, \
     created_at, updated_at";

pub struct ProfileService;

impl ProfileService {
    /// Fetches the profile belonging to an account. This is the only lookup
    /// path the profile endpoints use, so a caller can never read another
    /// account's profile.
    #[instrument(skip(db))]
    pub async fn get_by_user_id(db: &PgPool, user_id: Uuid) -> Result<Profile, AppError> {
        let query = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);

        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow::anyhow!("Profile not found for this account"))
            })
    }

    /// Applies a partial update to the caller's profile. Absent fields keep
    /// their current value; `updated_at` always bumps.
    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<Profile, AppError> {
        let query = format!(
            "UPDATE profiles
             SET role = COALESCE($2, role),
                 phone = COALESCE($3, phone),
                 avatar_url = COALESCE($4, avatar_url),
                 is_active = COALESCE($5, is_active),
                 updated_at = now()
             WHERE user_id = $1
             RETURNING {}",
            PROFILE_COLUMNS
        );

        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(dto.role)
            .bind(dto.phone)
            .bind(dto.avatar_url)
            .bind(dto.is_active)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| {
                AppError::not_found(anyhow::anyhow!("Profile not found for this account"))
            })
    }
}
