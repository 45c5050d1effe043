use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::places::place::{NewPlace, Place};
use crate::domain::users::user::User;

/// Opens transactions spanning the places collection and users' place sets.
#[async_trait]
pub trait PlaceUnitOfWork: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn PlaceTransaction>>;
}

/// One open transaction. Nothing is visible to other readers until `commit`;
/// dropping the transaction without committing discards every write.
#[async_trait]
pub trait PlaceTransaction: Send {
    /// Loads the user and holds its row until the transaction ends.
    async fn lock_user(&mut self, user_id: Uuid) -> anyhow::Result<Option<User>>;

    /// Loads the place and holds its row until the transaction ends.
    async fn lock_place(&mut self, place_id: Uuid) -> anyhow::Result<Option<Place>>;

    async fn insert_place(&mut self, place: &NewPlace) -> anyhow::Result<Place>;

    async fn delete_place(&mut self, place_id: Uuid) -> anyhow::Result<bool>;

    /// Adds `place_id` to the user's place set. Returns false if the user is gone.
    async fn link_place(&mut self, user_id: Uuid, place_id: Uuid) -> anyhow::Result<bool>;

    /// Removes `place_id` from the user's place set. Returns false if it was not there.
    async fn unlink_place(&mut self, user_id: Uuid, place_id: Uuid) -> anyhow::Result<bool>;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;

    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}
