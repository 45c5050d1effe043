use uuid::Uuid;

use crate::application::error::{Missing, ServiceError, ServiceResult};
use crate::application::ports::place_repository::PlaceRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::domain::places::place::Place;

pub struct ListUserPlaces<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: PlaceRepository + ?Sized,
{
    pub users: &'a U,
    pub places: &'a R,
}

impl<'a, U, R> ListUserPlaces<'a, U, R>
where
    U: UserRepository + ?Sized,
    R: PlaceRepository + ?Sized,
{
    /// Unknown users fail with `Missing::User`; users without any place fail
    /// with `Missing::UserPlaces`.
    pub async fn execute(&self, user_id: Uuid) -> ServiceResult<Vec<Place>> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(ServiceError::NotFound(Missing::User));
        }
        let places = self.places.list_by_creator(user_id).await?;
        if places.is_empty() {
            return Err(ServiceError::NotFound(Missing::UserPlaces));
        }
        Ok(places)
    }
}
