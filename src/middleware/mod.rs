//! Middleware modules for request processing.
//!
//! # Authentication Flow
//!
//! 1. Client sends a request with `Authorization: Bearer <token>`
//! 2. The [`auth::AuthUser`] extractor validates the JWT and exposes its
//!    claims to the handler
//! 3. Missing, malformed, expired, or refresh-typed tokens are rejected
//!    with 401 before the handler runs

pub mod auth;
