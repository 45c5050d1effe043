use uuid::Uuid;

/// Geographic position resolved from a place's address.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A geotagged record owned by exactly one user.
///
/// `location`, `image` and `creator_id` are fixed at creation; only the title
/// and description change afterwards.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    pub creator_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub image: String,
    pub creator_id: Uuid,
}
