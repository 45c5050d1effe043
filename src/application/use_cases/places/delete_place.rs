use uuid::Uuid;

use crate::application::access;
use crate::application::error::{Missing, ServiceError, ServiceResult};
use crate::application::ports::image_store::ImageStore;
use crate::application::ports::place_unit_of_work::{PlaceTransaction, PlaceUnitOfWork};

pub struct DeletePlace<'a, U, I>
where
    U: PlaceUnitOfWork + ?Sized,
    I: ImageStore + ?Sized,
{
    pub uow: &'a U,
    pub images: &'a I,
}

impl<'a, U, I> DeletePlace<'a, U, I>
where
    U: PlaceUnitOfWork + ?Sized,
    I: ImageStore + ?Sized,
{
    pub async fn execute(&self, user_id: Uuid, place_id: Uuid) -> ServiceResult<()> {
        let mut tx = self.uow.begin().await?;
        let image = match stage(tx.as_mut(), user_id, place_id).await {
            Ok(image) => {
                tx.commit().await?;
                image
            }
            Err(err) => {
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(place_id = %place_id, error = ?rb, "delete_place_rollback_failed");
                }
                return Err(err);
            }
        };
        tracing::info!(user_id = %user_id, place_id = %place_id, "place_deleted");

        // The image is not part of the place/user invariant; a failed removal
        // is logged by the store and never surfaced.
        self.images.discard_image(&image);
        Ok(())
    }
}

// Returns the image reference of the removed place.
async fn stage(
    tx: &mut dyn PlaceTransaction,
    user_id: Uuid,
    place_id: Uuid,
) -> ServiceResult<String> {
    let place = tx
        .lock_place(place_id)
        .await?
        .ok_or(ServiceError::NotFound(Missing::Place))?;
    access::ensure_owner(&place, user_id)?;

    let owner = place.creator_id;
    if tx.lock_user(owner).await?.is_none() {
        return Err(anyhow::anyhow!("creator {owner} of place {place_id} does not exist").into());
    }
    if !tx.delete_place(place_id).await? {
        return Err(ServiceError::NotFound(Missing::Place));
    }
    if !tx.unlink_place(owner, place_id).await? {
        return Err(
            anyhow::anyhow!("place {place_id} missing from the place set of {owner}").into(),
        );
    }
    Ok(place.image)
}
