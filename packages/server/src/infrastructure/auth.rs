//! Identity resolution at connection establishment.
//!
//! The connection query string carries either `bearer=<token>` (a JWT
//! issued by the external login service) or `name=<displayName>` for an
//! ephemeral identity. Resolution is a pure derivation with no side
//! effects; failures refuse the connection before it ever becomes active.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    DisplayName, IdentityFactory, UserId, UserIdentity, ValueObjectError,
};

/// Claims the relay expects inside a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct BearerClaims {
    /// Stable user id
    pub sub: String,
    /// Display name
    pub name: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: u64,
}

/// Identity resolution failures. All of them refuse the upgrade.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("neither bearer nor name credential was provided")]
    MissingCredential,

    #[error("bearer token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("bearer tokens are not accepted: no verification secret configured")]
    BearerNotConfigured,

    #[error("invalid credential field: {0}")]
    InvalidField(#[from] ValueObjectError),
}

/// Maps connect-time credentials to a [`UserIdentity`].
#[derive(Clone)]
pub struct IdentityResolver {
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl IdentityResolver {
    /// Build a resolver. Without a secret every bearer connect is refused;
    /// name-based connects still work.
    pub fn new(jwt_secret: Option<&str>) -> Self {
        Self {
            decoding_key: jwt_secret.map(|secret| DecodingKey::from_secret(secret.as_bytes())),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Resolve the identity for a connecting request.
    ///
    /// Bearer wins when both credentials are present (the login middleware
    /// of the external collaborator checks bearer first).
    pub fn resolve(
        &self,
        bearer: Option<&str>,
        name: Option<&str>,
    ) -> Result<UserIdentity, AuthError> {
        if let Some(token) = bearer {
            return self.resolve_bearer(token);
        }
        if let Some(name) = name {
            let display_name = DisplayName::new(name.to_string())?;
            return Ok(IdentityFactory::ephemeral(display_name));
        }
        Err(AuthError::MissingCredential)
    }

    fn resolve_bearer(&self, token: &str) -> Result<UserIdentity, AuthError> {
        let Some(key) = &self.decoding_key else {
            return Err(AuthError::BearerNotConfigured);
        };
        // Signature and expiry are both checked here.
        let data = decode::<BearerClaims>(token, key, &self.validation)?;
        let id = UserId::new(data.claims.sub)?;
        let name = DisplayName::new(data.claims.name)?;
        Ok(UserIdentity::new(id, name))
    }
}
