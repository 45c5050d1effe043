use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::places::place::Place;

/// Single-collection reads and writes on places. Writes that also touch the
/// owner's place set go through `PlaceUnitOfWork` instead.
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Place>>;

    async fn list_by_creator(&self, creator_id: Uuid) -> anyhow::Result<Vec<Place>>;

    // Returns None when the place vanished between the ownership check and the write.
    async fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
    ) -> anyhow::Result<Option<Place>>;
}
