use uuid::Uuid;

use crate::application::access;
use crate::application::error::{Missing, ServiceError, ServiceResult};
use crate::application::ports::place_repository::PlaceRepository;
use crate::application::validation;
use crate::domain::places::place::Place;

pub struct UpdatePlace<'a, R: PlaceRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

impl<'a, R: PlaceRepository + ?Sized> UpdatePlace<'a, R> {
    // Creator, location and image are immutable; only title and description change.
    pub async fn execute(
        &self,
        user_id: Uuid,
        place_id: Uuid,
        req: &UpdatePlaceRequest,
    ) -> ServiceResult<Place> {
        validation::place_details(&req.title, &req.description)?;
        let place = self
            .repo
            .get_by_id(place_id)
            .await?
            .ok_or(ServiceError::NotFound(Missing::Place))?;
        access::ensure_owner(&place, user_id)?;
        self.repo
            .update_details(place_id, req.title.trim(), req.description.trim())
            .await?
            .ok_or(ServiceError::NotFound(Missing::Place))
    }
}
