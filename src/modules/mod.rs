pub mod announcements;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod profiles;

pub use self::auth::model::LoginRequest;
pub use self::profiles::model::Profile;
