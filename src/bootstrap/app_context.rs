use std::sync::Arc;

use crate::application::ports::credentials::CredentialService;
use crate::application::ports::geocoder::Geocoder;
use crate::application::ports::image_store::ImageStore;
use crate::application::ports::place_repository::PlaceRepository;
use crate::application::ports::place_unit_of_work::PlaceUnitOfWork;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    place_repo: Arc<dyn PlaceRepository>,
    user_repo: Arc<dyn UserRepository>,
    place_uow: Arc<dyn PlaceUnitOfWork>,
    geocoder: Arc<dyn Geocoder>,
    credentials: Arc<dyn CredentialService>,
    images: Arc<dyn ImageStore>,
}

impl AppServices {
    pub fn new(
        place_repo: Arc<dyn PlaceRepository>,
        user_repo: Arc<dyn UserRepository>,
        place_uow: Arc<dyn PlaceUnitOfWork>,
        geocoder: Arc<dyn Geocoder>,
        credentials: Arc<dyn CredentialService>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            place_repo,
            user_repo,
            place_uow,
            geocoder,
            credentials,
            images,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn place_repo(&self) -> Arc<dyn PlaceRepository> {
        self.services.place_repo.clone()
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn place_uow(&self) -> Arc<dyn PlaceUnitOfWork> {
        self.services.place_uow.clone()
    }

    pub fn geocoder(&self) -> Arc<dyn Geocoder> {
        self.services.geocoder.clone()
    }

    pub fn credentials(&self) -> Arc<dyn CredentialService> {
        self.services.credentials.clone()
    }

    pub fn images(&self) -> Arc<dyn ImageStore> {
        self.services.images.clone()
    }
}
