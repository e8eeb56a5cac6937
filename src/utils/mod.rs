//! Utility modules shared throughout the application.
//!
//! - [`errors`]: Application error type and HTTP mapping
//! - [`jwt`]: JWT token creation and verification
//! - [`password`]: Password hashing and verification

pub mod errors;
pub mod jwt;
pub mod password;
