use crate::application::error::{ServiceError, ServiceResult};
use crate::application::ports::credentials::CredentialService;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::users::AuthSession;
use crate::application::validation;
use crate::domain::users::user::NewUser;

pub struct Signup<'a, R, C>
where
    R: UserRepository + ?Sized,
    C: CredentialService + ?Sized,
{
    pub repo: &'a R,
    pub credentials: &'a C,
}

#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
}

impl<'a, R, C> Signup<'a, R, C>
where
    R: UserRepository + ?Sized,
    C: CredentialService + ?Sized,
{
    pub async fn execute(&self, req: &SignupRequest) -> ServiceResult<AuthSession> {
        validation::require_non_empty("name", &req.name)?;
        let email = validation::normalize_email(&req.email);
        validation::require_email(&email)?;
        validation::require_min_len("password", &req.password, validation::MIN_PASSWORD_LEN)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict);
        }
        let password_hash = self.credentials.hash_password(&req.password)?;
        // The unique index still decides races between two signups for one email.
        let user = self
            .repo
            .create_user(&NewUser {
                name: req.name.trim().to_string(),
                email,
                password_hash,
                image: req.image.clone(),
            })
            .await?
            .ok_or(ServiceError::Conflict)?;

        let issued = self.credentials.issue_token(user.id, &user.email)?;
        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "user_signed_up");
        Ok(AuthSession {
            user_id: user.id,
            email: user.email,
            token: issued.token,
        })
    }
}
