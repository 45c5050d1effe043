use uuid::Uuid;

use crate::application::error::{Missing, ServiceError, ServiceResult};
use crate::application::ports::place_repository::PlaceRepository;
use crate::domain::places::place::Place;

pub struct GetPlace<'a, R: PlaceRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: PlaceRepository + ?Sized> GetPlace<'a, R> {
    pub async fn execute(&self, place_id: Uuid) -> ServiceResult<Place> {
        self.repo
            .get_by_id(place_id)
            .await?
            .ok_or(ServiceError::NotFound(Missing::Place))
    }
}
