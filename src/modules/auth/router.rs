use axum::{Router, routing::post};

use super::controller::{login_user, refresh_token, register_user};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
        .route("/register", post(register_user))
}
