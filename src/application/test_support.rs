//! In-memory implementations of the application ports for unit tests.
//!
//! `InMemoryStore` serializes transactions through one async mutex: a
//! transaction owns the lock from `begin` until it commits or is dropped, and
//! only a successful commit publishes its working copy.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::application::ports::geocoder::{GeocodeError, Geocoder};
use crate::application::ports::image_store::{ImageStore, StoredImage};
use crate::application::ports::place_repository::PlaceRepository;
use crate::application::ports::place_unit_of_work::{PlaceTransaction, PlaceUnitOfWork};
use crate::application::ports::user_repository::{UserCredentials, UserRepository};
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::places::place::{Coordinates, NewPlace, Place};
use crate::domain::users::user::{NewUser, User};
use crate::infrastructure::crypto::Argon2JwtCredentials;

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub users: HashMap<Uuid, UserCredentials>,
    pub places: HashMap<Uuid, Place>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    InsertPlace,
    LinkPlace,
    DeletePlace,
    UnlinkPlace,
    Commit,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
    fail_at: Arc<StdMutex<Option<FailPoint>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_at(&self, point: FailPoint) {
        *self.fail_at.lock().unwrap() = Some(point);
    }

    pub async fn snapshot(&self) -> StoreState {
        self.state.lock().await.clone()
    }

    pub async fn seed_user(&self, name: &str, email: &str) -> User {
        self.create_user(&NewUser {
            name: name.into(),
            email: email.into(),
            password_hash: "not-a-real-hash".into(),
            image: format!("images/{name}.png"),
        })
        .await
        .unwrap()
        .unwrap()
    }

    pub async fn user(&self, id: Uuid) -> Option<User> {
        self.state.lock().await.users.get(&id).map(|c| c.user.clone())
    }

    pub async fn place(&self, id: Uuid) -> Option<Place> {
        self.state.lock().await.places.get(&id).cloned()
    }
}

#[async_trait]
impl PlaceRepository for InMemoryStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Place>> {
        Ok(self.place(id).await)
    }

    async fn list_by_creator(&self, creator_id: Uuid) -> anyhow::Result<Vec<Place>> {
        let state = self.state.lock().await;
        let mut places: Vec<Place> = state
            .places
            .values()
            .filter(|p| p.creator_id == creator_id)
            .cloned()
            .collect();
        places.sort_by_key(|p| p.created_at);
        Ok(places)
    }

    async fn update_details(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
    ) -> anyhow::Result<Option<Place>> {
        let mut state = self.state.lock().await;
        Ok(state.places.get_mut(&id).map(|p| {
            p.title = title.to_string();
            p.description = description.to_string();
            p.updated_at = chrono::Utc::now();
            p.clone()
        }))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create_user(&self, new_user: &NewUser) -> anyhow::Result<Option<User>> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|c| c.user.email == new_user.email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name.clone(),
            email: new_user.email.clone(),
            image: new_user.image.clone(),
            place_ids: Vec::new(),
            created_at: chrono::Utc::now(),
        };
        state.users.insert(
            user.id,
            UserCredentials {
                user: user.clone(),
                password_hash: new_user.password_hash.clone(),
            },
        );
        Ok(Some(user))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserCredentials>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|c| c.user.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.user(id).await)
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        let state = self.state.lock().await;
        let mut users: Vec<User> = state.users.values().map(|c| c.user.clone()).collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        Ok(users)
    }
}

#[async_trait]
impl PlaceUnitOfWork for InMemoryStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn PlaceTransaction>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            working,
            fail_at: self.fail_at.clone(),
        }))
    }
}

struct InMemoryTransaction {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
    fail_at: Arc<StdMutex<Option<FailPoint>>>,
}

impl InMemoryTransaction {
    fn check(&self, point: FailPoint) -> anyhow::Result<()> {
        if *self.fail_at.lock().unwrap() == Some(point) {
            bail!("injected failure at {point:?}");
        }
        Ok(())
    }
}

#[async_trait]
impl PlaceTransaction for InMemoryTransaction {
    async fn lock_user(&mut self, user_id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.working.users.get(&user_id).map(|c| c.user.clone()))
    }

    async fn lock_place(&mut self, place_id: Uuid) -> anyhow::Result<Option<Place>> {
        Ok(self.working.places.get(&place_id).cloned())
    }

    async fn insert_place(&mut self, place: &NewPlace) -> anyhow::Result<Place> {
        self.check(FailPoint::InsertPlace)?;
        let now = chrono::Utc::now();
        let stored = Place {
            id: Uuid::new_v4(),
            title: place.title.clone(),
            description: place.description.clone(),
            address: place.address.clone(),
            location: place.location,
            image: place.image.clone(),
            creator_id: place.creator_id,
            created_at: now,
            updated_at: now,
        };
        self.working.places.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_place(&mut self, place_id: Uuid) -> anyhow::Result<bool> {
        self.check(FailPoint::DeletePlace)?;
        Ok(self.working.places.remove(&place_id).is_some())
    }

    async fn link_place(&mut self, user_id: Uuid, place_id: Uuid) -> anyhow::Result<bool> {
        self.check(FailPoint::LinkPlace)?;
        let Some(creds) = self.working.users.get_mut(&user_id) else {
            return Ok(false);
        };
        if !creds.user.place_ids.contains(&place_id) {
            creds.user.place_ids.push(place_id);
        }
        Ok(true)
    }

    async fn unlink_place(&mut self, user_id: Uuid, place_id: Uuid) -> anyhow::Result<bool> {
        self.check(FailPoint::UnlinkPlace)?;
        let Some(creds) = self.working.users.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = creds.user.place_ids.len();
        creds.user.place_ids.retain(|id| *id != place_id);
        Ok(creds.user.place_ids.len() < before)
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.check(FailPoint::Commit)?;
        let this = *self;
        let mut guard = this.guard;
        *guard = this.working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> anyhow::Result<()> {
        Ok(())
    }
}

pub enum StubGeocoder {
    Found(Coordinates),
    NoResults,
    Unavailable,
}

impl StubGeocoder {
    pub fn ifc() -> Self {
        Self::Found(Coordinates {
            lat: 22.28588,
            lng: 114.158131,
        })
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn coordinates_for(&self, _address: &str) -> Result<Coordinates, GeocodeError> {
        match self {
            Self::Found(c) => Ok(*c),
            Self::NoResults => Err(GeocodeError::NotFound),
            Self::Unavailable => Err(GeocodeError::Transport(anyhow::anyhow!(
                "connection refused"
            ))),
        }
    }
}

#[derive(Default)]
pub struct RecordingImageStore {
    discarded: StdMutex<Vec<String>>,
}

impl RecordingImageStore {
    pub fn discarded(&self) -> Vec<String> {
        self.discarded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn store_image(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<StoredImage> {
        Ok(StoredImage {
            reference: format!("images/{}.{extension}", Uuid::new_v4()),
            size: bytes.len() as i64,
        })
    }

    fn discard_image(&self, reference: &str) {
        self.discarded.lock().unwrap().push(reference.to_string());
    }
}

pub fn credentials() -> Argon2JwtCredentials {
    Argon2JwtCredentials::new("test-secret-for-unit-tests")
}

/// Wires an `AppContext` whose ports are all backed by `store`.
pub fn app_context(store: &InMemoryStore, geocoder: StubGeocoder) -> AppContext {
    app_context_with_images(store, geocoder, Arc::new(RecordingImageStore::default()))
}

/// Like `app_context`, but the caller keeps a handle on the image store.
pub fn app_context_with_images(
    store: &InMemoryStore,
    geocoder: StubGeocoder,
    images: Arc<RecordingImageStore>,
) -> AppContext {
    let services = AppServices::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(geocoder),
        Arc::new(credentials()),
        images,
    );
    let cfg = Config::from_lookup(|_| None).unwrap();
    AppContext::new(cfg, services)
}
