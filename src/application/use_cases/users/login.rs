use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::credentials::CredentialService;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::users::AuthSession;
use crate::application::validation;

pub struct Login<'a, R, C>
where
    R: UserRepository + ?Sized,
    C: CredentialService + ?Sized,
{
    pub repo: &'a R,
    pub credentials: &'a C,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R, C> Login<'a, R, C>
where
    R: UserRepository + ?Sized,
    C: CredentialService + ?Sized,
{
    /// Unknown email and wrong password fail with the same `InvalidCredentials`.
    pub async fn execute(&self, req: &LoginRequest) -> ServiceResult<AuthSession> {
        let email = validation::normalize_email(&req.email);
        validation::require_non_empty("email", &email)?;
        validation::require_min_len("password", &req.password, validation::MIN_PASSWORD_LEN)?;

        let Some(found) = self.repo.find_by_email(&email).await? else {
            return Err(ServiceError::InvalidCredentials);
        };
        if !self
            .credentials
            .verify_password(&req.password, &found.password_hash)?
        {
            return Err(ServiceError::InvalidCredentials);
        }

        let issued = self.credentials.issue_token(found.user.id, &found.user.email)?;
        tracing::info!(user_id = %found.user.id, expires_at = %issued.expires_at, "user_logged_in");
        Ok(AuthSession {
            user_id: found.user.id,
            email: found.user.email,
            token: issued.token,
        })
    }
}
