//! Shared authentication library for LinkUp services
//!
//! All services validate the same HS256 tokens issued by identity-service.
//! `jwt` holds key storage and token operations; `extract` provides the
//! actix-web extractor handlers use to read the authenticated caller.

pub mod extract;
pub mod jwt;

pub use extract::AuthUser;
pub use jwt::{Claims, TokenPair};
