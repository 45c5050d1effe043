pub mod create_place;
pub mod delete_place;
pub mod get_place;
pub mod list_user_places;
pub mod update_place;
