//! Accounts and sessions
//!
//! Form validation happens here before any provider call; the provider
//! itself only sees well-formed input.

pub mod provider;
pub mod validation;

pub use provider::{AuthEvent, AuthProvider, AuthSession, AuthUser, DatabaseAuthProvider};
pub use validation::{validate_reset_request, validate_sign_in, validate_sign_up, SignUpForm};
