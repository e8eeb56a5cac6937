use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::profiles::model::{Profile, UserRole};
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_access_token, create_refresh_token, verify_refresh_token};
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequestDto};

const PROFILE_COLUMNS: &str =
    "p.id, p.user_id, p.email, p.first_name, p.last_name, p.role, p.phone, p.avatar_url, \
     p.is_active, p.created_at, p.updated_at";

#[derive(sqlx::FromRow)]
struct AccountCredentials {
    password: String,
    account_active: bool,
    id: Uuid,
    user_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    phone: Option<String>,
    avatar_url: Option<String>,
    is_active: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl AccountCredentials {
    fn into_profile(self) -> Profile {
        Profile {
            id: self.id,
            user_id: self.user_id,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
            phone: self.phone,
            avatar_url: self.avatar_url,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub struct AuthService;

impl AuthService {
    /// Creates the account row and its profile row in a single transaction.
    /// Any failure rolls both back; no partial state survives.
    #[instrument(skip(db, dto))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<Profile, AppError> {
        let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(db)
            .await?;

        if existing.is_some() {
            return Err(AppError::conflict(anyhow::anyhow!("Email already exists")));
        }

        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        // A concurrent registration of the same email loses here on the
        // unique constraint, which surfaces as 409 through the error mapping.
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id",
        )
        .bind(&dto.email)
        .bind(&hashed_password)
        .fetch_one(&mut *tx)
        .await?;

        // Role stays at the column default: every self-registered account
        // is a student. Admin profiles are provisioned from the CLI only.
        let query = format!(
            "INSERT INTO profiles AS p (user_id, email, first_name, last_name, phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&dto.email)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(&dto.phone)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(profile)
    }

    /// Validates credentials and mints a token pair. Unknown email, wrong
    /// password, and deactivated accounts all fail with the same message.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let query = format!(
            "SELECT u.password, u.is_active AS account_active, {}
             FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE u.email = $1",
            PROFILE_COLUMNS
        );

        let account = sqlx::query_as::<_, AccountCredentials>(&query)
            .bind(&dto.email)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::unauthorized(anyhow::anyhow!("Invalid email or password")))?;

        let is_valid = verify_password(&dto.password, &account.password)?;

        if !is_valid || !account.account_active {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let profile = account.into_profile();
        let access = create_access_token(&profile, jwt_config)?;
        let refresh = create_refresh_token(&profile, jwt_config)?;

        Ok(LoginResponse {
            access,
            refresh,
            user: profile,
        })
    }

    /// Exchanges a valid refresh token for a new access token. The account
    /// is re-read so the new token carries the current role and deactivated
    /// accounts fail closed.
    #[instrument(skip(db, dto, jwt_config))]
    pub async fn refresh_token(
        db: &PgPool,
        dto: RefreshRequest,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claims = verify_refresh_token(&dto.refresh, jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid or expired refresh token")))?;

        let query = format!(
            "SELECT u.password, u.is_active AS account_active, {}
             FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE u.id = $1",
            PROFILE_COLUMNS
        );

        let account = sqlx::query_as::<_, AccountCredentials>(&query)
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(anyhow::anyhow!("Invalid or expired refresh token"))
            })?;

        if !account.account_active {
            return Err(AppError::unauthorized(anyhow::anyhow!(
                "Invalid or expired refresh token"
            )));
        }

        let access = create_access_token(&account.into_profile(), jwt_config)?;

        Ok(RefreshResponse { access })
    }
}
