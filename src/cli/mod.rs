use sqlx::PgPool;
use uuid::Uuid;

use crate::modules::profiles::model::UserRole;
use crate::utils::password::hash_password;

/// Bootstraps an admin account directly against the database. This is the
/// only way admin profiles come into existence; the registration endpoint
/// always provisions students.
pub async fn create_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(db)
        .await?;

    if existing.is_some() {
        return Err("An account with this email already exists".into());
    }

    // Same two-row shape as registration: account + profile, one transaction.
    let mut tx = db.begin().await?;

    let user_id: Uuid =
        sqlx::query_scalar("INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id")
            .bind(email)
            .bind(&hashed_password)
            .fetch_one(&mut *tx)
            .await?;

    sqlx::query(
        "INSERT INTO profiles (user_id, email, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(UserRole::Admin)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(())
}
