use async_trait::async_trait;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::application::ports::place_unit_of_work::{PlaceTransaction, PlaceUnitOfWork};
use crate::domain::places::place::{NewPlace, Place};
use crate::domain::users::user::User;
use crate::infrastructure::db::PgPool;
use crate::infrastructure::db::repositories::place_repository_sqlx::{
    PLACE_COLUMNS, place_from_row,
};
use crate::infrastructure::db::repositories::user_repository_sqlx::{
    USER_COLUMNS, user_from_row,
};

pub struct SqlxPlaceUnitOfWork {
    pub pool: PgPool,
}

impl SqlxPlaceUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceUnitOfWork for SqlxPlaceUnitOfWork {
    async fn begin(&self) -> anyhow::Result<Box<dyn PlaceTransaction>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(SqlxPlaceTransaction { tx }))
    }
}

// Dropping an uncommitted sqlx transaction rolls it back.
pub struct SqlxPlaceTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PlaceTransaction for SqlxPlaceTransaction {
    async fn lock_user(&mut self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn lock_place(&mut self, place_id: Uuid) -> anyhow::Result<Option<Place>> {
        let row = sqlx::query(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE id = $1 FOR UPDATE"
        ))
        .bind(place_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(row.as_ref().map(place_from_row))
    }

    async fn insert_place(&mut self, place: &NewPlace) -> anyhow::Result<Place> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO places (title, description, address, lat, lng, image, creator_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {PLACE_COLUMNS}"#
        ))
        .bind(&place.title)
        .bind(&place.description)
        .bind(&place.address)
        .bind(place.location.lat)
        .bind(place.location.lng)
        .bind(&place.image)
        .bind(place.creator_id)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(place_from_row(&row))
    }

    async fn delete_place(&mut self, place_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(place_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn link_place(&mut self, user_id: Uuid, place_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE users SET place_ids = array_append(place_ids, $2)
               WHERE id = $1 AND NOT ($2 = ANY(place_ids))"#,
        )
        .bind(user_id)
        .bind(place_id)
        .execute(&mut *self.tx)
        .await?;
        if res.rows_affected() > 0 {
            return Ok(true);
        }
        // Either the user is gone or the id was already linked.
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_one(&mut *self.tx)
                .await?;
        Ok(exists > 0)
    }

    async fn unlink_place(&mut self, user_id: Uuid, place_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"UPDATE users SET place_ids = array_remove(place_ids, $2)
               WHERE id = $1 AND $2 = ANY(place_ids)"#,
        )
        .bind(user_id)
        .bind(place_id)
        .execute(&mut *self.tx)
        .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
