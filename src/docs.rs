use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequestDto,
};
use crate::modules::profiles::model::{Profile, UpdateProfileDto, UserRole};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::register_user,
        crate::modules::profiles::controller::get_profile,
        crate::modules::profiles::controller::update_profile,
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            RegisterRequestDto,
            Profile,
            UpdateProfileDto,
            UserRole,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, refresh, and registration"),
        (name = "Profile", description = "The authenticated caller's profile")
    ),
    info(
        title = "La Campiña API",
        version = "0.1.0",
        description = "School management backend with JWT authentication over a Supabase-owned schema.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
