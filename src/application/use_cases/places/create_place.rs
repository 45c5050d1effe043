use uuid::Uuid;

use crate::application::error::{Missing, ServiceError, ServiceResult};
use crate::application::ports::geocoder::Geocoder;
use crate::application::ports::place_unit_of_work::{PlaceTransaction, PlaceUnitOfWork};
use crate::application::validation;
use crate::domain::places::place::{NewPlace, Place};

pub struct CreatePlace<'a, G, U>
where
    G: Geocoder + ?Sized,
    U: PlaceUnitOfWork + ?Sized,
{
    pub geocoder: &'a G,
    pub uow: &'a U,
}

#[derive(Debug, Clone)]
pub struct CreatePlaceRequest {
    pub title: String,
    pub description: String,
    pub address: String,
    pub image: String,
}

impl<'a, G, U> CreatePlace<'a, G, U>
where
    G: Geocoder + ?Sized,
    U: PlaceUnitOfWork + ?Sized,
{
    pub async fn execute(&self, user_id: Uuid, req: &CreatePlaceRequest) -> ServiceResult<Place> {
        validation::place_details(&req.title, &req.description)?;
        validation::require_non_empty("address", &req.address)?;

        // Resolve before opening the transaction so a geocoding failure never
        // touches the store.
        let location = self.geocoder.coordinates_for(req.address.trim()).await?;
        let new_place = NewPlace {
            title: req.title.trim().to_string(),
            description: req.description.trim().to_string(),
            address: req.address.trim().to_string(),
            location,
            image: req.image.clone(),
            creator_id: user_id,
        };

        let mut tx = self.uow.begin().await?;
        match stage(tx.as_mut(), &new_place).await {
            Ok(place) => {
                tx.commit().await?;
                tracing::info!(user_id = %user_id, place_id = %place.id, "place_created");
                Ok(place)
            }
            Err(err) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(user_id = %user_id, error = ?rb, "create_place_rollback_failed");
                }
                Err(err)
            }
        }
    }
}

async fn stage(tx: &mut dyn PlaceTransaction, new_place: &NewPlace) -> ServiceResult<Place> {
    let user_id = new_place.creator_id;
    if tx.lock_user(user_id).await?.is_none() {
        return Err(ServiceError::NotFound(Missing::User));
    }
    let place = tx.insert_place(new_place).await?;
    if !tx.link_place(user_id, place.id).await? {
        return Err(anyhow::anyhow!("user {user_id} vanished while linking place {}", place.id).into());
    }
    Ok(place)
}
