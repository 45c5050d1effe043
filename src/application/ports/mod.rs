pub mod credentials;
pub mod geocoder;
pub mod image_store;
pub mod place_repository;
pub mod place_unit_of_work;
pub mod user_repository;
