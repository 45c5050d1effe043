use crate::application::ports::geocoder::GeocodeError;

/// Which record a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Place,
    User,
    UserPlaces,
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{}", missing_message(*.0))]
    NotFound(Missing),
    #[error("you are not allowed to modify this place")]
    Unauthorized,
    #[error("user exists already, please login instead")]
    Conflict,
    #[error("invalid credentials, could not log you in")]
    InvalidCredentials,
    #[error(transparent)]
    Geocode(#[from] GeocodeError),
    #[error("something went wrong, please try again")]
    Internal(#[from] anyhow::Error),
}

fn missing_message(missing: Missing) -> &'static str {
    match missing {
        Missing::Place => "could not find a place for the provided id",
        Missing::User => "could not find a user for the provided id",
        Missing::UserPlaces => "could not find places for the provided user id",
    }
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
