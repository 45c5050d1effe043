use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::places::create_place::{CreatePlace, CreatePlaceRequest};
use crate::application::use_cases::places::delete_place::DeletePlace;
use crate::application::use_cases::places::get_place::GetPlace;
use crate::application::use_cases::places::list_user_places::ListUserPlaces;
use crate::application::use_cases::places::update_place::{
    UpdatePlace, UpdatePlaceRequest as UpdatePlaceDto,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::places::place as domain;
use crate::presentation::http::auth::{self, Bearer};
use crate::presentation::http::error::ApiError;
use crate::presentation::http::{image_url, upload};

#[derive(Debug, Serialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Location,
    pub image: String,
    pub creator: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Place {
    fn from_domain(cfg: &Config, p: domain::Place) -> Self {
        Self {
            id: p.id,
            title: p.title,
            description: p.description,
            address: p.address,
            location: Location {
                lat: p.location.lat,
                lng: p.location.lng,
            },
            image: image_url(cfg, &p.image),
            creator: p.creator_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlaceResponse {
    pub place: Place,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlaceRequest {
    pub title: String,
    pub description: String,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreatePlaceMultipart {
    title: String,
    description: String,
    address: String,
    /// PNG or JPEG image
    #[schema(value_type = String, format = Binary)]
    image: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/places", post(create_place))
        .route(
            "/places/:pid",
            get(get_place).patch(update_place).delete(delete_place),
        )
        .route("/users/:uid/places", get(list_user_places))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/places/{pid}", tag = "Places",
    params(("pid" = Uuid, Path, description = "Place ID")),
    responses((status = 200, body = PlaceResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn get_place(
    State(ctx): State<AppContext>,
    Path(pid): Path<Uuid>,
) -> Result<Json<PlaceResponse>, ApiError> {
    let repo = ctx.place_repo();
    let uc = GetPlace {
        repo: repo.as_ref(),
    };
    let place = uc.execute(pid).await?;
    Ok(Json(PlaceResponse {
        place: Place::from_domain(&ctx.cfg, place),
    }))
}

#[utoipa::path(get, path = "/api/users/{uid}/places", tag = "Places",
    params(("uid" = Uuid, Path, description = "User ID")),
    responses((status = 200, body = PlacesResponse), (status = 404, body = crate::presentation::http::error::ErrorBody)))]
pub async fn list_user_places(
    State(ctx): State<AppContext>,
    Path(uid): Path<Uuid>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let users = ctx.user_repo();
    let places = ctx.place_repo();
    let uc = ListUserPlaces {
        users: users.as_ref(),
        places: places.as_ref(),
    };
    let items = uc.execute(uid).await?;
    Ok(Json(PlacesResponse {
        places: items
            .into_iter()
            .map(|p| Place::from_domain(&ctx.cfg, p))
            .collect(),
    }))
}

#[utoipa::path(post, path = "/api/places", tag = "Places",
    request_body(content = CreatePlaceMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = PlaceResponse),
        (status = 401, body = crate::presentation::http::error::ErrorBody),
        (status = 404, body = crate::presentation::http::error::ErrorBody),
        (status = 422, body = crate::presentation::http::error::ErrorBody),
        (status = 502, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn create_place(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PlaceResponse>), ApiError> {
    let user_id = auth::require_user(&ctx, bearer)?;
    let mut form = upload::read_image_form(multipart, ctx.cfg.upload_max_bytes).await?;
    let image = form.take_image()?;
    let reference = upload::store_image(&ctx, &image).await?;

    let geocoder = ctx.geocoder();
    let uow = ctx.place_uow();
    let uc = CreatePlace {
        geocoder: geocoder.as_ref(),
        uow: uow.as_ref(),
    };
    let req = CreatePlaceRequest {
        title: form.text("title"),
        description: form.text("description"),
        address: form.text("address"),
        image: reference.clone(),
    };
    let place = match uc.execute(user_id, &req).await {
        Ok(place) => place,
        Err(err) => {
            ctx.images().discard_image(&reference);
            return Err(err.into());
        }
    };
    Ok((
        StatusCode::CREATED,
        Json(PlaceResponse {
            place: Place::from_domain(&ctx.cfg, place),
        }),
    ))
}

#[utoipa::path(patch, path = "/api/places/{pid}", tag = "Places", request_body = UpdatePlaceRequest,
    params(("pid" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, body = PlaceResponse),
        (status = 401, body = crate::presentation::http::error::ErrorBody),
        (status = 403, body = crate::presentation::http::error::ErrorBody),
        (status = 404, body = crate::presentation::http::error::ErrorBody),
        (status = 422, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn update_place(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(pid): Path<Uuid>,
    Json(req): Json<UpdatePlaceRequest>,
) -> Result<Json<PlaceResponse>, ApiError> {
    let user_id = auth::require_user(&ctx, bearer)?;
    let repo = ctx.place_repo();
    let uc = UpdatePlace {
        repo: repo.as_ref(),
    };
    let dto = UpdatePlaceDto {
        title: req.title,
        description: req.description,
    };
    let place = uc.execute(user_id, pid, &dto).await?;
    Ok(Json(PlaceResponse {
        place: Place::from_domain(&ctx.cfg, place),
    }))
}

#[utoipa::path(delete, path = "/api/places/{pid}", tag = "Places",
    params(("pid" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 401, body = crate::presentation::http::error::ErrorBody),
        (status = 403, body = crate::presentation::http::error::ErrorBody),
        (status = 404, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn delete_place(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    Path(pid): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user_id = auth::require_user(&ctx, bearer)?;
    let uow = ctx.place_uow();
    let images = ctx.images();
    let uc = DeletePlace {
        uow: uow.as_ref(),
        images: images.as_ref(),
    };
    uc.execute(user_id, pid).await?;
    Ok(Json(MessageResponse {
        message: "Deleted place.".into(),
    }))
}
