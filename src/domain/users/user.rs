use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    // Ids of the places this user created; order carries no meaning.
    pub place_ids: Vec<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn owns_place(&self, place_id: Uuid) -> bool {
        self.place_ids.contains(&place_id)
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: String,
}
