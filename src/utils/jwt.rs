use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{Claims, TokenType};
use crate::modules::profiles::model::Profile;
use crate::utils::errors::AppError;

fn create_token(
    profile: &Profile,
    token_type: TokenType,
    expiry: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now.saturating_add_signed(expiry as isize);

    let claims = Claims {
        sub: profile.user_id.to_string(),
        email: profile.email.clone(),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        role: profile.role,
        token_type,
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Short-lived token presented on every authenticated request.
pub fn create_access_token(profile: &Profile, jwt_config: &JwtConfig) -> Result<String, AppError> {
    create_token(
        profile,
        TokenType::Access,
        jwt_config.access_token_expiry,
        jwt_config,
    )
}

/// Long-lived token exchanged for new access tokens only.
pub fn create_refresh_token(profile: &Profile, jwt_config: &JwtConfig) -> Result<String, AppError> {
    create_token(
        profile,
        TokenType::Refresh,
        jwt_config.refresh_token_expiry,
        jwt_config,
    )
}

/// Decodes and expiry-validates a token of either type.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow::anyhow!("Invalid or expired token")))
}

/// Verifies an access token, rejecting refresh tokens presented as bearer
/// credentials.
pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let claims = verify_token(token, jwt_config)?;
    if claims.token_type != TokenType::Access {
        return Err(AppError::unauthorized(anyhow::anyhow!(
            "Invalid or expired token"
        )));
    }
    Ok(claims)
}

/// Verifies a refresh token. Access tokens cannot be replayed here.
pub fn verify_refresh_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let claims = verify_token(token, jwt_config)?;
    if claims.token_type != TokenType::Refresh {
        return Err(AppError::unauthorized(anyhow::anyhow!(
            "Invalid or expired refresh token"
        )));
    }
    Ok(claims)
}
