use lacampina_api::utils::password::hash_password;
#[allow(unused_imports)]
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestAccount {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub email: String,
    pub password: String,
}

/// Create an account + profile pair the way registration does.
/// role should be one of: "admin", "teacher", "student", "parent"
#[allow(dead_code)]
pub async fn create_test_account(
    tx: &mut Transaction<'_, Postgres>,
    email: &str,
    password: &str,
    role: &str,
    active: bool,
) -> TestAccount {
    let hashed = hash_password(password).unwrap();

    let user_id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (email, password, is_active) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(email)
    .bind(&hashed)
    .bind(active)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    let profile_id: Uuid = sqlx::query_scalar(
        "INSERT INTO profiles (user_id, email, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(user_id)
    .bind(email)
    .bind("Test")
    .bind("User")
    .bind(role)
    .fetch_one(&mut **tx)
    .await
    .unwrap();

    TestAccount {
        user_id,
        profile_id,
        email: email.to_string(),
        password: password.to_string(),
    }
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
