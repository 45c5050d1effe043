use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub user_id: Uuid,
    pub email: String,
}

/// Password hashing and bearer-token issuance.
pub trait CredentialService: Send + Sync {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String>;
    fn verify_password(&self, plain: &str, hash: &str) -> anyhow::Result<bool>;
    fn issue_token(&self, user_id: Uuid, email: &str) -> anyhow::Result<IssuedToken>;
    fn validate_token(&self, token: &str) -> anyhow::Result<TokenIdentity>;
}
