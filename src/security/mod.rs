//! Bearer authentication pipeline.
//!
//! extractor -> backend -> context/handlers -> continuation
//!
//! The filter never rejects a request. It only annotates the request with a
//! [`SecurityContext`] (always) and an [`AuthenticatedPrincipal`] (on success);
//! refusing unauthenticated requests is left to downstream handlers.

pub mod backend;
pub mod context;
pub mod credential;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod handler;
pub mod jwt;
pub mod settings;

pub use backend::AuthenticationBackend;
pub use context::{AuthenticatedPrincipal, SecurityContext};
pub use credential::{Principal, PreAuthenticationRequest, RawCredential, VerifiedIdentity};
pub use error::{AuthenticationFailure, MalformedSource, RejectReason};
pub use extractor::{
    BearerHeaderExtractor, ChainExtractor, CookieExtractor, CredentialExtractor, QueryExtractor,
};
pub use filter::{JwtAuthFilter, JwtAuthFilterBuilder};
pub use handler::{AuthenticationFailureHandler, AuthenticationSuccessHandler};
pub use jwt::{Audience, JwtBackend, LoaderError, PrincipalLoader, TokenClaims};
pub use settings::{FilterSettings, SigningKey};
