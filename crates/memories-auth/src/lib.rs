//! # Memories Auth
//!
//! Bearer tokens for the Memories API.
//!
//! Two token shapes are accepted, told apart by an explicit tag rather than
//! by their length:
//!
//! - **Local** tokens are issued by [`create_access_token`], signed with
//!   HS256 and tagged with `kid = JwtConfig::key_id` in the JOSE header.
//!   The acting user is the `id` claim.
//! - **Federated** tokens are everything else. They are verified against the
//!   configured identity-provider key, issuer and audience. The acting user
//!   is the `sub` claim.
//!
//! ```ignore
//! use memories_auth::{authenticate, create_access_token, parse_bearer};
//!
//! let token = create_access_token(&user_id, &email, &name, &jwt_config)?;
//! let principal = authenticate(parse_bearer(header)?, &jwt_config, &federated_config)?;
//! ```

pub mod claims;
pub mod jwt;
pub mod principal;
pub mod token;

pub use claims::{FederatedClaims, LocalClaims};
pub use jwt::{authenticate, create_access_token, verify_federated_token, verify_local_token};
pub use principal::Principal;
pub use token::{TokenKind, classify, parse_bearer};
