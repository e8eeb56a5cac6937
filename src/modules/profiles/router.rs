use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{get_profile, update_profile};
use crate::state::AppState;

pub fn init_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/update", put(update_profile))
}
