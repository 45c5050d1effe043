use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use password_hash::rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::ports::credentials::{CredentialService, IssuedToken, TokenIdentity};

/// Tokens are valid for one hour after issuance.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub struct Argon2JwtCredentials {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl Argon2JwtCredentials {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, TOKEN_TTL_SECS)
    }

    pub fn with_ttl(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

impl CredentialService for Argon2JwtCredentials {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    fn verify_password(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(anyhow::anyhow!(e.to_string())),
        }
    }

    fn issue_token(&self, user_id: Uuid, email: &str) -> anyhow::Result<IssuedToken> {
        let expires_at = chrono::Utc::now() + chrono::Duration::seconds(self.ttl_secs);
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: expires_at.timestamp().max(0) as usize,
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)?;
        Ok(IssuedToken { token, expires_at })
    }

    fn validate_token(&self, token: &str) -> anyhow::Result<TokenIdentity> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(TokenIdentity {
            user_id: Uuid::parse_str(&data.claims.sub)?,
            email: data.claims.email,
        })
    }
}
