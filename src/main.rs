use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use places_api::bootstrap::app_context::{AppContext, AppServices};
use places_api::bootstrap::config::Config;
use places_api::infrastructure::crypto::Argon2JwtCredentials;
use places_api::infrastructure::db::repositories::place_repository_sqlx::SqlxPlaceRepository;
use places_api::infrastructure::db::repositories::place_unit_of_work_sqlx::SqlxPlaceUnitOfWork;
use places_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use places_api::infrastructure::geocoding::MapboxGeocoder;
use places_api::infrastructure::storage::FsImageStore;

#[derive(OpenApi)]
#[openapi(
        paths(
            places_api::presentation::http::users::list_users,
            places_api::presentation::http::users::signup,
            places_api::presentation::http::users::login,
            places_api::presentation::http::places::get_place,
            places_api::presentation::http::places::list_user_places,
            places_api::presentation::http::places::create_place,
            places_api::presentation::http::places::update_place,
            places_api::presentation::http::places::delete_place,
            places_api::presentation::http::health::health,
        ),
        components(schemas(
            places_api::presentation::http::error::ErrorBody,
            places_api::presentation::http::users::UserItem,
            places_api::presentation::http::users::UsersResponse,
            places_api::presentation::http::users::LoginRequest,
            places_api::presentation::http::users::AuthResponse,
            places_api::presentation::http::users::SignupMultipart,
            places_api::presentation::http::places::Location,
            places_api::presentation::http::places::Place,
            places_api::presentation::http::places::PlaceResponse,
            places_api::presentation::http::places::PlacesResponse,
            places_api::presentation::http::places::MessageResponse,
            places_api::presentation::http::places::UpdatePlaceRequest,
            places_api::presentation::http::places::CreatePlaceMultipart,
            places_api::presentation::http::health::HealthStatus,
        )),
        tags(
            (name = "Users", description = "Signup, login and user listing"),
            (name = "Places", description = "Places management"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

fn cors_layer(cfg: &Config) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]);

    match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => base.allow_origin(origin).allow_credentials(true),
        Some(Err(_)) => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
        // Production requires FRONTEND_URL; deny everything if it is somehow absent.
        None if cfg.is_production => base.allow_origin(AllowOrigin::exact(
            HeaderValue::from_static("http://invalid"),
        )),
        None => base
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "places_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting places backend");

    // Database
    let pool = places_api::infrastructure::db::connect_pool(
        &cfg.database_url,
        cfg.database_max_connections,
    )
    .await?;
    places_api::infrastructure::db::migrate(&pool).await?;

    let images = Arc::new(FsImageStore::new(&cfg.uploads_dir));
    let images_dir = images.images_dir();
    if let Err(e) = tokio::fs::create_dir_all(&images_dir).await {
        tracing::warn!(error = ?e, dir = %images_dir.display(), "Failed to create images dir");
    }

    let geocoder = Arc::new(MapboxGeocoder::new(
        &cfg.geocoder_base_url,
        &cfg.mapbox_api_key,
        Duration::from_secs(cfg.geocoder_timeout_secs),
    )?);

    let services = AppServices::new(
        Arc::new(SqlxPlaceRepository::new(pool.clone())),
        Arc::new(SqlxUserRepository::new(pool.clone())),
        Arc::new(SqlxPlaceUnitOfWork::new(pool.clone())),
        geocoder,
        Arc::new(Argon2JwtCredentials::new(&cfg.jwt_secret)),
        images,
    );
    let ctx = AppContext::new(cfg.clone(), services);

    let app = Router::new()
        .nest(
            "/api",
            places_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api",
            places_api::presentation::http::users::routes(ctx.clone()),
        )
        .nest(
            "/api",
            places_api::presentation::http::places::routes(ctx.clone()),
        )
        .nest_service("/uploads/images", ServeDir::new(images_dir))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&cfg))
        // Multipart bodies carry the image plus a few short text fields.
        .layer(DefaultBodyLimit::max(cfg.upload_max_bytes + 64 * 1024))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = ?e, "shutdown_signal_failed");
            }
        })
        .await?;
    Ok(())
}
