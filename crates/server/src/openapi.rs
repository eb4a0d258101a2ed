use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequestDoc { pub email: String, pub password: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayloadDoc { pub email: String, pub access_token: String, pub refresh_token: String }

#[derive(ToSchema)]
pub struct AuthResultDoc {
    pub succeeded: bool,
    pub message: String,
    pub data: Option<LoginPayloadDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequestDoc,
            LoginPayloadDoc,
            AuthResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth")
    )
)]
pub struct ApiDoc;
