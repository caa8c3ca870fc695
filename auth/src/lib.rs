//! Authentication utilities library
//!
//! Provides reusable credential infrastructure:
//! - Password hashing (Argon2id, tunable cost)
//! - JWT signing and validation across two independent domains (access, refresh)
//!
//! Services define their own token payloads and storage; this crate knows
//! nothing about users, databases or HTTP.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashingParams, PasswordHasher};
//!
//! let hasher = PasswordHasher::new(HashingParams::development()).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password").unwrap());
//! assert!(!hasher.verify(&hash, "other_password").unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Claims, TokenIssuer, TokenIssuerConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Payload {
//!     sub: String,
//! }
//!
//! let issuer = TokenIssuer::new(&TokenIssuerConfig {
//!     access_secret: "access_secret_key_at_least_32_bytes!".to_string(),
//!     refresh_secret: "refresh_secret_key_at_least_32_bytes".to_string(),
//!     access_expires_in: "15m".to_string(),
//!     refresh_expires_in: "7d".to_string(),
//! })
//! .unwrap();
//!
//! let tokens = issuer.generate_tokens(&Payload { sub: "user123".to_string() }).unwrap();
//! let claims: Claims<Payload> = issuer.verify_access_token(&tokens.access_token).unwrap();
//! assert_eq!(claims.payload.sub, "user123");
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use issuer::GeneratedTokens;
pub use issuer::TokenIssuer;
pub use issuer::TokenIssuerConfig;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::HashingParams;
pub use password::PasswordError;
pub use password::PasswordHasher;
