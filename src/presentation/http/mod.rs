use crate::bootstrap::config::Config;

pub mod auth;
pub mod error;
pub mod health;
pub mod places;
pub mod upload;
pub mod users;

/// Public URL for a stored image reference (`images/<file>`).
pub(crate) fn image_url(cfg: &Config, reference: &str) -> String {
    let relative = reference.trim_start_matches('/');
    match cfg.public_base_url.as_deref() {
        Some(base) => format!("{}/uploads/{}", base.trim_end_matches('/'), relative),
        None => format!("/uploads/{}", relative),
    }
}
