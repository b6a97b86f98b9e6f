//! Bearer token signing, verification and claims.

pub mod claims;
pub mod error;
pub mod signer;
pub mod verifier;

pub use claims::Claims;
pub use error::TokenError;
pub use signer::{SignedToken, TokenSigner};
pub use verifier::TokenVerifier;
