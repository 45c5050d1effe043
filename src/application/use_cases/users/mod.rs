use uuid::Uuid;

pub mod list_users;
pub mod login;
pub mod signup;

/// What signup and login hand back to the caller.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}
