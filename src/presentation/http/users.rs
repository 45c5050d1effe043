use axum::{
    Json, Router,
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::users::AuthSession;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::login::{Login, LoginRequest as LoginInput};
use crate::application::use_cases::users::signup::{Signup, SignupRequest};
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::ApiError;
use crate::presentation::http::{image_url, upload};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserItem {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    /// Ids of the places this user created
    pub places: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UsersResponse {
    pub users: Vec<UserItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(s: AuthSession) -> Self {
        Self {
            user_id: s.user_id,
            email: s.email,
            token: s.token,
        }
    }
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct SignupMultipart {
    name: String,
    email: String,
    password: String,
    /// PNG or JPEG avatar
    #[schema(value_type = String, format = Binary)]
    image: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/signup", post(signup))
        .route("/users/login", post(login))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users", tag = "Users",
    responses((status = 200, body = UsersResponse)))]
pub async fn list_users(State(ctx): State<AppContext>) -> Result<Json<UsersResponse>, ApiError> {
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let users = uc
        .execute()
        .await?
        .into_iter()
        .map(|u| UserItem {
            image: image_url(&ctx.cfg, &u.image),
            id: u.id,
            name: u.name,
            email: u.email,
            places: u.place_ids,
        })
        .collect();
    Ok(Json(UsersResponse { users }))
}

#[utoipa::path(post, path = "/api/users/signup", tag = "Users",
    request_body(content = SignupMultipart, content_type = "multipart/form-data"),
    responses(
        (status = 201, body = AuthResponse),
        (status = 409, body = crate::presentation::http::error::ErrorBody),
        (status = 413, body = crate::presentation::http::error::ErrorBody),
        (status = 422, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn signup(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let mut form = upload::read_image_form(multipart, ctx.cfg.upload_max_bytes).await?;
    let image = form.take_image()?;
    let reference = upload::store_image(&ctx, &image).await?;

    let repo = ctx.user_repo();
    let credentials = ctx.credentials();
    let uc = Signup {
        repo: repo.as_ref(),
        credentials: credentials.as_ref(),
    };
    let req = SignupRequest {
        name: form.text("name"),
        email: form.text("email"),
        password: form.text("password"),
        image: reference.clone(),
    };
    match uc.execute(&req).await {
        Ok(session) => Ok((StatusCode::CREATED, Json(session.into()))),
        Err(err) => {
            ctx.images().discard_image(&reference);
            Err(err.into())
        }
    }
}

#[utoipa::path(post, path = "/api/users/login", tag = "Users", request_body = LoginRequest,
    responses(
        (status = 200, body = AuthResponse),
        (status = 401, body = crate::presentation::http::error::ErrorBody),
        (status = 422, body = crate::presentation::http::error::ErrorBody)
    ))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let repo = ctx.user_repo();
    let credentials = ctx.credentials();
    let uc = Login {
        repo: repo.as_ref(),
        credentials: credentials.as_ref(),
    };
    let session = uc
        .execute(&LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;
    Ok(Json(session.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::test_support::{
        InMemoryStore, RecordingImageStore, StubGeocoder, app_context, app_context_with_images,
    };
    use crate::presentation::http::upload::test_forms::{multipart, png};

    async fn registered() -> (AppContext, Uuid) {
        let store = InMemoryStore::new();
        let ctx = app_context(&store, StubGeocoder::ifc());
        let repo = ctx.user_repo();
        let credentials = ctx.credentials();
        let session = Signup {
            repo: repo.as_ref(),
            credentials: credentials.as_ref(),
        }
        .execute(&SignupRequest {
            name: "Peter".into(),
            email: "a@x.com".into(),
            password: "test123".into(),
            image: "images/peter.png".into(),
        })
        .await
        .unwrap();
        (ctx, session.user_id)
    }

    fn login_body(email: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            email: email.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn login_returns_user_id_and_token() {
        let (ctx, user_id) = registered().await;

        let Json(body) = login(State(ctx.clone()), login_body(" A@X.com ", "test123"))
            .await
            .unwrap();

        assert_eq!(body.user_id, user_id);
        assert_eq!(body.email, "a@x.com");
        let identity = ctx.credentials().validate_token(&body.token).unwrap();
        assert_eq!(identity.user_id, user_id);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (ctx, _) = registered().await;

        let wrong_password = login(State(ctx.clone()), login_body("a@x.com", "test124"))
            .await
            .unwrap_err();
        let unknown_email = login(State(ctx), login_body("b@x.com", "test123"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.status(), unknown_email.status());
        assert_eq!(wrong_password.message(), unknown_email.message());
    }

    #[tokio::test]
    async fn listing_exposes_image_urls_and_no_password_material() {
        let (ctx, user_id) = registered().await;

        let Json(body) = list_users(State(ctx)).await.unwrap();

        assert_eq!(body.users.len(), 1);
        assert_eq!(body.users[0].id, user_id);
        assert_eq!(body.users[0].image, "/uploads/images/peter.png");
        assert!(body.users[0].places.is_empty());
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("password"));
    }

    #[test]
    fn auth_response_uses_camel_case() {
        let json = serde_json::to_value(AuthResponse {
            user_id: Uuid::nil(),
            email: "a@x.com".into(),
            token: "t".into(),
        })
        .unwrap();
        assert!(json.get("userId").is_some());
    }

    const SIGNUP_FIELDS: [(&str, &str); 3] = [
        ("name", "Peter"),
        ("email", "A@x.com"),
        ("password", "test123"),
    ];

    #[tokio::test]
    async fn signup_handler_creates_the_user_with_its_avatar() {
        let store = InMemoryStore::new();
        let images = Arc::new(RecordingImageStore::default());
        let ctx = app_context_with_images(&store, StubGeocoder::ifc(), images.clone());
        let form = multipart(&SIGNUP_FIELDS, Some(png(b"\x89PNG"))).await;

        let (status, Json(body)) = signup(State(ctx), form).await.unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.email, "a@x.com");
        let user = store.user(body.user_id).await.unwrap();
        assert!(user.image.starts_with("images/"));
        assert!(images.discarded().is_empty());
    }

    #[tokio::test]
    async fn duplicate_signup_discards_the_uploaded_avatar() {
        let store = InMemoryStore::new();
        let images = Arc::new(RecordingImageStore::default());
        let ctx = app_context_with_images(&store, StubGeocoder::ifc(), images.clone());
        store.seed_user("peter", "a@x.com").await;
        let form = multipart(&SIGNUP_FIELDS, Some(png(b"\x89PNG"))).await;

        let err = signup(State(ctx), form).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(images.discarded().len(), 1);
        assert_eq!(store.snapshot().await.users.len(), 1);
    }

    #[tokio::test]
    async fn signup_with_oversized_avatar_is_413() {
        let store = InMemoryStore::new();
        let images = Arc::new(RecordingImageStore::default());
        let mut ctx = app_context_with_images(&store, StubGeocoder::ifc(), images.clone());
        ctx.cfg.upload_max_bytes = 16;
        let big = [0u8; 17];
        let form = multipart(&SIGNUP_FIELDS, Some(png(&big))).await;

        let err = signup(State(ctx), form).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(images.discarded().is_empty());
        assert!(store.snapshot().await.users.is_empty());
    }
}
