use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(ToSchema)]
pub struct CreateGenreInputDoc {
    pub name: String,
    pub description: String,
}

#[derive(ToSchema)]
pub struct GenrePatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateDeveloperInputDoc {
    pub name: String,
    pub description: String,
}

#[derive(ToSchema)]
pub struct DeveloperPatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateGameInputDoc {
    pub name: String,
    pub description: String,
    pub year: i32,
    pub grade: String,
    pub genre_id: Uuid,
    pub developer_id: Uuid,
}

#[derive(ToSchema)]
pub struct GamePatchDoc {
    pub name: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub grade: Option<String>,
    pub genre_id: Option<Uuid>,
    pub developer_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct AddressDoc {
    pub street: String,
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

#[derive(ToSchema)]
pub struct UpdateUserInputDoc {
    pub name: Option<String>,
    pub email: Option<String>,
    pub address: Option<AddressDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::genres::create,
        crate::routes::genres::search,
        crate::routes::genres::list,
        crate::routes::genres::get_by_id,
        crate::routes::genres::update,
        crate::routes::genres::remove,
        crate::routes::genres::export_excel,
        crate::routes::developers::create,
        crate::routes::developers::search,
        crate::routes::developers::list,
        crate::routes::developers::get_by_id,
        crate::routes::developers::update,
        crate::routes::developers::remove,
        crate::routes::developers::export_excel,
        crate::routes::games::create,
        crate::routes::games::search,
        crate::routes::games::list,
        crate::routes::games::get_by_id,
        crate::routes::games::update,
        crate::routes::games::remove,
        crate::routes::games::upload_photo,
        crate::routes::games::download_photo,
        crate::routes::games::export_excel,
        crate::routes::users::me,
        crate::routes::users::update_me,
        crate::routes::users::delete_me,
        crate::routes::users::change_password,
        crate::routes::users::reset_password,
        crate::routes::users::upload_photo,
        crate::routes::users::download_photo,
        crate::routes::users::export_excel,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ChangePasswordRequest,
            CreateGenreInputDoc,
            GenrePatchDoc,
            CreateDeveloperInputDoc,
            DeveloperPatchDoc,
            CreateGameInputDoc,
            GamePatchDoc,
            AddressDoc,
            UpdateUserInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "genre"),
        (name = "developer"),
        (name = "game"),
        (name = "user"),
    )
)]
pub struct ApiDoc;
