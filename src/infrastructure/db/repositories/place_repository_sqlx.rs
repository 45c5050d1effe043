use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::place_repository::PlaceRepository;
use crate::domain::places::place::{Coordinates, Place};
use crate::infrastructure::db::PgPool;

pub(crate) const PLACE_COLUMNS: &str =
    "id, title, description, address, lat, lng, image, creator_id, created_at, updated_at";

pub(crate) fn place_from_row(r: &PgRow) -> Place {
    Place {
        id: r.get("id"),
        title: r.get("title"),
        description: r.get("description"),
        address: r.get("address"),
        location: Coordinates {
            lat: r.get("lat"),
            lng: r.get("lng"),
        },
        image: r.get("image"),
        creator_id: r.get("creator_id"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
    }
}

pub struct SqlxPlaceRepository {
    pub pool: PgPool,
}

impl SqlxPlaceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceRepository for SqlxPlaceRepository {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Place>> {
        let row = sqlx::query(&format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(place_from_row))
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> anyhow::Result<Vec<Place>> {
        let rows = sqlx::query(&format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE creator_id = $1 ORDER BY created_at ASC"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(place_from_row).collect())
    }

    async fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
    ) -> anyhow::Result<Option<Place>> {
        let row = sqlx::query(&format!(
            r#"UPDATE places SET title = $2, description = $3, updated_at = now()
               WHERE id = $1
               RETURNING {PLACE_COLUMNS}"#
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(place_from_row))
    }
}
