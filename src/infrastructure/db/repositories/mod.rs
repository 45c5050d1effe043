pub mod place_repository_sqlx;
pub mod place_unit_of_work_sqlx;
pub mod user_repository_sqlx;
