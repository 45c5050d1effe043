use uuid::Uuid;

use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::places::place::Place;

// Only the creator of a place may change or remove it. Update and delete both
// call this, comparing against the stored creator id.
pub fn ensure_owner(place: &Place, user_id: Uuid) -> ServiceResult<()> {
    if place.creator_id == user_id {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}
